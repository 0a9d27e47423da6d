use bytes::{BufMut, BytesMut};

use crate::crc::crc16;
use crate::endian::ByteOrder;
use crate::error::{FrameError, Result};

/// Size of the big-endian length prefix.
pub const LENGTH_SIZE: usize = 2;

/// Frame header: length (2) + frame id (1) = 3 bytes.
pub const HEADER_SIZE: usize = LENGTH_SIZE + 1;

/// Size of the big-endian CRC trailer.
pub const CRC_SIZE: usize = 2;

/// Bytes every frame carries besides its payload.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + CRC_SIZE;

/// Smallest legal value of the length field (an empty payload).
pub const MIN_FRAME_LEN: usize = FRAME_OVERHEAD;

/// Largest payload that still fits the 16-bit length field.
pub const MAX_PAYLOAD: usize = u16::MAX as usize - FRAME_OVERHEAD;

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────┬──────────────────┬──────────────┐
/// │ Length       │ Frame id │ Payload          │ CRC16        │
/// │ (2B BE)      │ (1B)     │ (Length - 5 B)   │ (2B BE)      │
/// └──────────────┴──────────┴──────────────────┴──────────────┘
/// ```
///
/// Length counts the whole frame; the CRC covers every byte before it.
pub fn encode_frame(frame_id: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    put_frame(frame_id, payload, dst);
    Ok(())
}

/// Append a frame whose payload is already known to fit.
pub(crate) fn put_frame(frame_id: u8, payload: &[u8], dst: &mut BytesMut) {
    debug_assert!(payload.len() <= MAX_PAYLOAD);
    let start = dst.len();
    dst.reserve(FRAME_OVERHEAD + payload.len());
    dst.put_u16((payload.len() + FRAME_OVERHEAD) as u16);
    dst.put_u8(frame_id);
    dst.put_slice(payload);
    let crc = crc16(&dst[start..]);
    dst.put_u16(crc);
}

/// Read the declared frame length at the start of `src`.
///
/// Returns `None` when fewer than two bytes are available.
pub fn declared_length(src: &[u8]) -> Option<usize> {
    match src {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo]) as usize),
        _ => None,
    }
}

/// Configuration shared by the encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Drop frames whose CRC trailer disagrees with the computed value and
    /// resynchronize. When false, such frames are still decoded and
    /// delivered with `crc16_error_status` set. Default: true.
    pub skip_on_checksum_error: bool,
    /// Byte order of multi-byte payload fields. Default: big-endian.
    pub byte_order: ByteOrder,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            skip_on_checksum_error: true,
            byte_order: ByteOrder::Big,
        }
    }
}
