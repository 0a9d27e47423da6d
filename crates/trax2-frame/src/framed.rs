//! `tokio_util` codec over the same scan engine as [`Decoder`].

use bytes::{Bytes, BytesMut};
use tokio_util::codec;

use crate::codec::FrameConfig;
use crate::decoder::Decoder;
use crate::error::FrameError;
use crate::response::DecodedFrame;

/// Decodes response frames from, and writes encoded commands to, an async
/// byte stream. Use with `tokio_util::codec::Framed`.
///
/// Incoming bytes are moved into the inner decoder on every call, so the
/// framed read buffer never holds a partial frame.
#[derive(Debug, Default)]
pub struct TraxCodec {
    decoder: Decoder,
}

impl TraxCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            decoder: Decoder::with_config(config),
        }
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }
}

impl codec::Decoder for TraxCodec {
    type Item = DecodedFrame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if !src.is_empty() {
            self.decoder.absorb(src);
        }
        Ok(self.decoder.next_frame())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let frame = self.decode(src)?;
        if frame.is_none() && self.decoder.pending_len() > 0 {
            tracing::debug!(
                pending = self.decoder.pending_len(),
                "stream ended with partial frame"
            );
            self.decoder.reset();
        }
        Ok(frame)
    }
}

impl codec::Encoder<Bytes> for TraxCodec {
    type Error = FrameError;

    fn encode(&mut self, command: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;
    use crate::encoder::Encoder;
    use crate::response::Response;

    const SERIAL_NUMBER: [u8; 9] = [0x00, 0x09, 0x35, 0x00, 0x0F, 0xBE, 0x43, 0x0E, 0xCF];
    const SET_CONFIG_DONE: [u8; 5] = [0x00, 0x05, 0x13, 0xDD, 0xA7];

    #[tokio::test]
    async fn stream_of_frames() {
        let mut wire = vec![0x7F];
        wire.extend_from_slice(&SERIAL_NUMBER);
        wire.extend_from_slice(&SET_CONFIG_DONE);

        let frames: Vec<_> = FramedRead::new(wire.as_slice(), TraxCodec::new())
            .map(|r| r.unwrap().response)
            .collect()
            .await;

        assert_eq!(
            frames,
            vec![Response::SerialNumber(1_031_747), Response::SetConfigDone]
        );
    }

    #[tokio::test]
    async fn partial_tail_ends_stream_quietly() {
        let mut wire = SET_CONFIG_DONE.to_vec();
        wire.extend_from_slice(&SERIAL_NUMBER[..4]);

        let mut framed = FramedRead::new(wire.as_slice(), TraxCodec::new());
        let first = framed.next().await.unwrap().unwrap();
        assert_eq!(first.response, Response::SetConfigDone);
        assert!(framed.next().await.is_none());
        assert_eq!(framed.decoder().decoder().pending_len(), 0);
    }

    #[tokio::test]
    async fn commands_written_verbatim() {
        let enc = Encoder::new();
        let mut out = Vec::new();
        {
            let mut sink = FramedWrite::new(&mut out, TraxCodec::new());
            sink.send(enc.get_module_info()).await.unwrap();
            sink.send(enc.get_data()).await.unwrap();
        }
        assert_eq!(
            out,
            vec![0x00, 0x05, 0x01, 0xEF, 0xD4, 0x00, 0x05, 0x04, 0xBF, 0x71]
        );
    }

    #[test]
    fn decode_across_calls() {
        use tokio_util::codec::Decoder as _;

        let mut codec = TraxCodec::new();
        let mut buf = BytesMut::from(&SERIAL_NUMBER[..3]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert!(buf.is_empty());

        buf.extend_from_slice(&SERIAL_NUMBER[3..]);
        let frame = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(frame.response, Response::SerialNumber(1_031_747));
    }
}
