use std::io::{ErrorKind, Read};

use crate::codec::FrameConfig;
use crate::decoder::Decoder;
use crate::error::{FrameError, Result};
use crate::response::DecodedFrame;

const READ_CHUNK_SIZE: usize = 1024;

/// Reads decoded response frames from any `Read` stream.
///
/// Partial reads and line noise are absorbed by the inner [`Decoder`];
/// callers only ever see complete, recognized frames.
pub struct FrameReader<T> {
    inner: T,
    decoder: Decoder,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            decoder: Decoder::with_config(config),
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached,
    /// whether or not a partial frame was pending.
    pub fn read_frame(&mut self) -> Result<DecodedFrame> {
        loop {
            if let Some(frame) = self.decoder.next_frame() {
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                if self.decoder.pending_len() > 0 {
                    tracing::debug!(
                        pending = self.decoder.pending_len(),
                        "stream closed with partial frame"
                    );
                }
                return Err(FrameError::ConnectionClosed);
            }

            self.decoder.push(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// The decoder holding any partial frame.
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut Decoder {
        &mut self.decoder
    }
}
