//! Static table of the response frames the decoder recognizes.
//!
//! Each entry ties a frame id to its length rule and to the routine that
//! turns the payload into a [`Response`]. Frames not listed here are
//! treated as noise by the decoder.

use std::fmt;

use crate::codec::{CRC_SIZE, HEADER_SIZE};
use crate::decoder::Reject;
use crate::endian::ByteOrder;
use crate::protocol::{ComponentId, ComponentKind, ConfigId, FrameId};
use crate::response::{
    AcquisitionParams, Component, ComponentValue, FrameCategory, ModuleInfo, Response,
};

/// Total frame length of a declination `GetConfigResp`.
const DECLINATION_FRAME_LEN: usize = 10;

/// Longest data frame whose declared components can all be read: a count
/// byte plus 255 quaternion-sized entries.
pub const MAX_DATA_FRAME_LEN: usize = HEADER_SIZE + 1 + 255 * 17 + CRC_SIZE;

/// Allowed values of the length field for a frame id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    Exact(usize),
    Range { min: usize, max: usize },
}

impl LengthRule {
    pub fn accepts(self, length: usize) -> bool {
        match self {
            LengthRule::Exact(n) => length == n,
            LengthRule::Range { min, max } => (min..=max).contains(&length),
        }
    }

    pub fn min(self) -> usize {
        match self {
            LengthRule::Exact(n) => n,
            LengthRule::Range { min, .. } => min,
        }
    }
}

impl fmt::Display for LengthRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthRule::Exact(n) => write!(f, "exactly {n}"),
            LengthRule::Range { min, max } => write!(f, "{min}..={max}"),
        }
    }
}

// Parsers only ever see payloads whose frame length passed the entry's
// `LengthRule`, so fixed offsets inside that minimum are always present.
type ParseFn = fn(&[u8], ByteOrder) -> Result<Response, Reject>;

/// One registry entry.
pub struct FrameSpec {
    pub id: FrameId,
    pub category: FrameCategory,
    pub length: LengthRule,
    parse: ParseFn,
}

impl FrameSpec {
    /// Check a declared length against this frame's rule.
    pub fn check_length(&self, length: usize) -> Result<(), Reject> {
        if self.length.accepts(length) {
            Ok(())
        } else {
            Err(Reject::LengthMismatch {
                id: self.id,
                expected: self.length,
                actual: length,
            })
        }
    }

    /// Decode a complete frame (header through trailer) of this kind.
    ///
    /// The checksum is not looked at here; that is the decoder's job.
    pub fn decode(&self, frame: &[u8], order: ByteOrder) -> Result<Response, Reject> {
        self.check_length(frame.len())?;
        let payload = &frame[HEADER_SIZE..frame.len() - CRC_SIZE];
        (self.parse)(payload, order)
    }
}

impl fmt::Debug for FrameSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameSpec")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("length", &self.length)
            .finish()
    }
}

static RESPONSE_FRAMES: [FrameSpec; 8] = [
    FrameSpec {
        id: FrameId::GetModInfoResp,
        category: FrameCategory::ModuleInfo,
        length: LengthRule::Exact(13),
        parse: parse_module_info,
    },
    FrameSpec {
        id: FrameId::SerialNumberResp,
        category: FrameCategory::SerialNumber,
        length: LengthRule::Exact(9),
        parse: parse_serial_number,
    },
    FrameSpec {
        id: FrameId::SetConfigDone,
        category: FrameCategory::SetConfigDone,
        length: LengthRule::Exact(5),
        parse: parse_set_config_done,
    },
    FrameSpec {
        id: FrameId::SetAcqParamsDone,
        category: FrameCategory::SetAcqParamsDone,
        length: LengthRule::Exact(5),
        parse: parse_set_acq_params_done,
    },
    FrameSpec {
        id: FrameId::GetAcqParamsResp,
        category: FrameCategory::AcquisitionParams,
        length: LengthRule::Exact(15),
        parse: parse_acquisition_params,
    },
    FrameSpec {
        id: FrameId::GetFunctionalModeResp,
        category: FrameCategory::FunctionalMode,
        length: LengthRule::Exact(6),
        parse: parse_functional_mode,
    },
    FrameSpec {
        id: FrameId::GetDataResp,
        category: FrameCategory::Data,
        length: LengthRule::Range {
            min: 6,
            max: MAX_DATA_FRAME_LEN,
        },
        parse: parse_data,
    },
    FrameSpec {
        id: FrameId::GetConfigResp,
        category: FrameCategory::Declination,
        length: LengthRule::Range {
            min: 7,
            max: DECLINATION_FRAME_LEN,
        },
        parse: parse_config,
    },
];

/// Every response frame the decoder understands.
pub fn response_frames() -> &'static [FrameSpec] {
    &RESPONSE_FRAMES
}

/// Find the entry for a frame id byte.
pub fn lookup(frame_id: u8) -> Option<&'static FrameSpec> {
    RESPONSE_FRAMES
        .iter()
        .find(|spec| spec.id.as_u8() == frame_id)
}

fn parse_module_info(payload: &[u8], _: ByteOrder) -> Result<Response, Reject> {
    Ok(Response::ModuleInfo(ModuleInfo {
        name: String::from_utf8_lossy(&payload[0..4]).into_owned(),
        revision: String::from_utf8_lossy(&payload[4..8]).into_owned(),
    }))
}

fn parse_set_config_done(_: &[u8], _: ByteOrder) -> Result<Response, Reject> {
    Ok(Response::SetConfigDone)
}

fn parse_set_acq_params_done(_: &[u8], _: ByteOrder) -> Result<Response, Reject> {
    Ok(Response::SetAcqParamsDone)
}

fn parse_functional_mode(payload: &[u8], _: ByteOrder) -> Result<Response, Reject> {
    Ok(Response::FunctionalMode {
        ahrs: payload[0] != 0,
    })
}

fn parse_serial_number(payload: &[u8], order: ByteOrder) -> Result<Response, Reject> {
    Ok(Response::SerialNumber(order.u32_at(payload, 0)))
}

// Payload: poll flag, flush flag, 4 reserved bytes, sample delay.
fn parse_acquisition_params(payload: &[u8], order: ByteOrder) -> Result<Response, Reject> {
    Ok(Response::AcquisitionParams(AcquisitionParams {
        poll_mode: payload[0] != 0,
        flush_filters: payload[1] != 0,
        sample_delay: order.f32_at(payload, 6),
    }))
}

fn parse_data(payload: &[u8], order: ByteOrder) -> Result<Response, Reject> {
    let declared = payload[0];
    let mut rest = &payload[1..];

    let mut components = Vec::with_capacity(usize::from(declared));
    for _ in 0..declared {
        let Some((&raw_id, tail)) = rest.split_first() else {
            break;
        };
        let Some(id) = ComponentId::from_u8(raw_id) else {
            tracing::debug!(component_id = raw_id, "unknown component, truncating list");
            break;
        };
        let width = id.value_width();
        if tail.len() < width {
            tracing::debug!(%id, available = tail.len(), "component value cut short");
            break;
        }
        let (block, tail) = tail.split_at(width);
        components.push(Component {
            id,
            value: component_value(id.kind(), block, order),
        });
        rest = tail;
    }

    Ok(Response::Data(components))
}

// `block` is exactly `kind.value_width()` bytes.
fn component_value(kind: ComponentKind, block: &[u8], order: ByteOrder) -> ComponentValue {
    match kind {
        ComponentKind::Status => ComponentValue::Status(block[0]),
        ComponentKind::Scalar => ComponentValue::Scalar(order.f32_at(block, 0)),
        ComponentKind::Quaternion => ComponentValue::Quaternion([
            order.f32_at(block, 0),
            order.f32_at(block, 4),
            order.f32_at(block, 8),
            order.f32_at(block, 12),
        ]),
    }
}

// Only the declination config id is understood.
fn parse_config(payload: &[u8], order: ByteOrder) -> Result<Response, Reject> {
    let config_id = payload[0];
    match ConfigId::from_u8(config_id) {
        Some(ConfigId::Declination) => {
            let frame_len = payload.len() + HEADER_SIZE + CRC_SIZE;
            if frame_len != DECLINATION_FRAME_LEN {
                return Err(Reject::LengthMismatch {
                    id: FrameId::GetConfigResp,
                    expected: LengthRule::Exact(DECLINATION_FRAME_LEN),
                    actual: frame_len,
                });
            }
            Ok(Response::Declination(order.f32_at(payload, 1)))
        }
        _ => Err(Reject::UnknownConfig(config_id)),
    }
}
