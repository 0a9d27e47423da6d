use bytes::{Buf, BytesMut};

use crate::codec::{declared_length, FrameConfig, CRC_SIZE, LENGTH_SIZE, MIN_FRAME_LEN};
use crate::crc::crc16;
use crate::dispatch::Handlers;
use crate::endian::ByteOrder;
use crate::protocol::FrameId;
use crate::registry::{self, LengthRule};
use crate::response::DecodedFrame;

const INITIAL_BUFFER_CAPACITY: usize = 512;

/// Result of examining one cursor position of the input.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// A complete, recognized frame starts here.
    Parsed(DecodedFrame),
    /// Fewer than two bytes remain, or the declared length runs past the
    /// end of the available input.
    NeedMoreData,
    /// The bytes here are not a frame we accept; skip one byte and retry.
    Invalid(Reject),
}

/// Why a candidate frame was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Reject {
    #[error("zero length field")]
    ZeroLength,

    #[error("length {0} is below the {MIN_FRAME_LEN}-byte minimum")]
    TooShort(usize),

    #[error("crc mismatch (trailer {expected:#06x}, computed {computed:#06x})")]
    ChecksumMismatch { expected: u16, computed: u16 },

    #[error("unrecognized frame id {0:#04x}")]
    UnknownFrame(u8),

    #[error("{id} requires length {expected}, got {actual}")]
    LengthMismatch {
        id: FrameId,
        expected: LengthRule,
        actual: usize,
    },

    #[error("unsupported config id {0:#04x}")]
    UnknownConfig(u8),

    #[error("a complete {0} frame starts one byte later")]
    Overlapped(FrameId),
}

/// Examine the frame candidate at the start of `window`.
///
/// The CRC is computed over the candidate's own bytes (up to its trailer),
/// so any number of frames may share one input buffer.
///
/// An incomplete candidate is rejected without waiting for the rest of it
/// when its frame id is already visible and either unknown or paired with
/// a length that id never has. Completing such a candidate could only end
/// in the same rejection.
///
/// A candidate is also rejected, complete or not, when a complete
/// checksum-valid response frame starts one byte later and ends inside the
/// candidate's declared length. This is the shape of a stray byte in front
/// of a short frame, e.g. `01 00 05 13 DD A7` reads as a 256-byte data
/// frame. The inner frame lies inside the candidate's span, so it is
/// always visible no later than the candidate is complete and the verdict
/// does not depend on how the input was chunked.
pub fn parse_frame(window: &[u8], config: &FrameConfig) -> ParseOutcome {
    let Some(length) = declared_length(window) else {
        return ParseOutcome::NeedMoreData;
    };
    if length == 0 {
        return ParseOutcome::Invalid(Reject::ZeroLength);
    }
    if length < MIN_FRAME_LEN {
        return ParseOutcome::Invalid(Reject::TooShort(length));
    }
    if length > window.len() {
        let Some(&frame_id) = window.get(LENGTH_SIZE) else {
            return ParseOutcome::NeedMoreData;
        };
        return match registry::lookup(frame_id) {
            None => ParseOutcome::Invalid(Reject::UnknownFrame(frame_id)),
            Some(spec) => match spec.check_length(length) {
                Ok(()) => match frame_one_byte_in(window, length, config.byte_order) {
                    Some(inner) => ParseOutcome::Invalid(Reject::Overlapped(inner)),
                    None => ParseOutcome::NeedMoreData,
                },
                Err(reject) => ParseOutcome::Invalid(reject),
            },
        };
    }

    let frame = &window[..length];
    let (body, trailer) = frame.split_at(length - CRC_SIZE);
    let crc16_expected = ByteOrder::Big.u16_from_bytes([trailer[0], trailer[1]]);
    let computed = crc16(body);
    let crc16_error_status = computed != crc16_expected;
    if crc16_error_status && config.skip_on_checksum_error {
        return ParseOutcome::Invalid(Reject::ChecksumMismatch {
            expected: crc16_expected,
            computed,
        });
    }

    let frame_id = frame[LENGTH_SIZE];
    let Some(spec) = registry::lookup(frame_id) else {
        return ParseOutcome::Invalid(Reject::UnknownFrame(frame_id));
    };
    if spec.check_length(length).is_ok() {
        if let Some(inner) = frame_one_byte_in(window, length, config.byte_order) {
            return ParseOutcome::Invalid(Reject::Overlapped(inner));
        }
    }

    match spec.decode(frame, config.byte_order) {
        Ok(response) => ParseOutcome::Parsed(DecodedFrame {
            id: spec.id,
            length: length as u16,
            crc16_expected,
            crc16_error_status,
            response,
        }),
        Err(reject) => ParseOutcome::Invalid(reject),
    }
}

/// Id of a complete, checksum-valid response frame that starts at
/// `window[1]` and ends within the first `length` bytes of `window`.
fn frame_one_byte_in(window: &[u8], length: usize, order: ByteOrder) -> Option<FrameId> {
    let inner = window.get(1..length.min(window.len()))?;
    let inner_len = declared_length(inner)?;
    if inner_len < MIN_FRAME_LEN || inner_len > inner.len() {
        return None;
    }

    let frame = &inner[..inner_len];
    let (body, trailer) = frame.split_at(inner_len - CRC_SIZE);
    if crc16(body) != ByteOrder::Big.u16_from_bytes([trailer[0], trailer[1]]) {
        return None;
    }
    let spec = registry::lookup(frame[LENGTH_SIZE])?;
    spec.decode(frame, order).ok().map(|_| spec.id)
}

/// Streaming decoder for device responses.
///
/// Bytes are pushed in whatever chunks the transport delivers. Complete
/// frames are pulled out in wire order; an incomplete tail stays buffered
/// until the next push. Anything that does not parse as a recognized frame
/// is skipped one byte at a time until alignment is recovered.
///
/// One instance per byte stream. `&mut self` on every decode call keeps a
/// single stream's calls serialized.
#[derive(Debug)]
pub struct Decoder {
    pending: BytesMut,
    frames_seen: u64,
    config: FrameConfig,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create a decoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    /// Create a decoder with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            pending: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            frames_seen: 0,
            config,
        }
    }

    /// Current decoder configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Choose between dropping (true) and flagging (false) frames whose
    /// checksum does not match.
    pub fn set_skip_on_checksum_error(&mut self, skip: bool) {
        self.config.skip_on_checksum_error = skip;
    }

    /// Number of complete frame candidates examined so far, whether or not
    /// they were accepted. Zero-length candidates are not counted.
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Bytes held over for the next call.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop any buffered partial frame.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Append raw bytes from the transport.
    pub fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    /// Move every byte of `src` into the pending buffer.
    pub(crate) fn absorb(&mut self, src: &mut BytesMut) {
        if self.pending.is_empty() {
            std::mem::swap(&mut self.pending, src);
        } else {
            self.pending.extend_from_slice(src);
            src.clear();
        }
    }

    /// Pull the next complete frame out of the pending buffer.
    ///
    /// Returns `None` once the buffer holds no complete frame candidate;
    /// the remaining bytes wait for more input.
    pub fn next_frame(&mut self) -> Option<DecodedFrame> {
        loop {
            match parse_frame(&self.pending, &self.config) {
                ParseOutcome::NeedMoreData => return None,
                ParseOutcome::Invalid(reject) => {
                    if reject != Reject::ZeroLength {
                        self.frames_seen += 1;
                    }
                    match &reject {
                        Reject::ChecksumMismatch { .. } | Reject::UnknownFrame(_) => {
                            tracing::debug!(reason = %reject, "skipping byte to resynchronize");
                        }
                        _ => tracing::trace!(reason = %reject, "skipping byte to resynchronize"),
                    }
                    self.pending.advance(1);
                }
                ParseOutcome::Parsed(frame) => {
                    self.frames_seen += 1;
                    self.pending.advance(usize::from(frame.length));
                    if frame.crc16_error_status {
                        tracing::debug!(
                            frame_id = %frame.id,
                            crc16_expected = frame.crc16_expected,
                            "delivering frame with crc error"
                        );
                    }
                    tracing::trace!(frame_id = %frame.id, length = frame.length, "frame decoded");
                    return Some(frame);
                }
            }
        }
    }

    /// Feed a chunk and invoke `deliver` for every frame it completes, in
    /// wire order, before returning.
    pub fn decode_with<F>(&mut self, chunk: &[u8], mut deliver: F)
    where
        F: FnMut(DecodedFrame),
    {
        self.push(chunk);
        while let Some(frame) = self.next_frame() {
            deliver(frame);
        }
    }

    /// Feed a chunk and collect every frame it completes.
    pub fn decode(&mut self, chunk: &[u8]) -> Vec<DecodedFrame> {
        let mut frames = Vec::new();
        self.decode_with(chunk, |frame| frames.push(frame));
        frames
    }

    /// Feed a chunk and route completed frames through `handlers`.
    ///
    /// Frames whose category has no registered handler are returned to the
    /// caller instead of being dropped.
    pub fn decode_into(&mut self, chunk: &[u8], handlers: &mut Handlers<'_>) -> Vec<DecodedFrame> {
        let mut unhandled = Vec::new();
        self.decode_with(chunk, |frame| {
            if let Some(frame) = handlers.dispatch(frame) {
                unhandled.push(frame);
            }
        });
        unhandled
    }
}
