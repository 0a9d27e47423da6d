//! Typed results produced by the decoder.

use crate::protocol::{ComponentId, FrameId};

/// One frame delivered by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    /// Frame id byte of the response.
    pub id: FrameId,
    /// Total wire length, as declared by the length field.
    pub length: u16,
    /// CRC trailer as read from the wire.
    pub crc16_expected: u16,
    /// True when the computed CRC disagrees with the trailer. Only ever
    /// set when the decoder is configured to keep such frames.
    pub crc16_error_status: bool,
    pub response: Response,
}

impl DecodedFrame {
    pub fn category(&self) -> FrameCategory {
        self.response.category()
    }
}

/// Decoded payload of a recognized response frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    ModuleInfo(ModuleInfo),
    SerialNumber(u32),
    SetConfigDone,
    SetAcqParamsDone,
    AcquisitionParams(AcquisitionParams),
    /// Components in wire order. May hold fewer entries than the frame
    /// declared when the list was cut short by an unknown id or by running
    /// out of payload.
    Data(Vec<Component>),
    /// Magnetic declination in degrees.
    Declination(f32),
    FunctionalMode { ahrs: bool },
}

impl Response {
    pub fn category(&self) -> FrameCategory {
        match self {
            Response::ModuleInfo(_) => FrameCategory::ModuleInfo,
            Response::SerialNumber(_) => FrameCategory::SerialNumber,
            Response::SetConfigDone => FrameCategory::SetConfigDone,
            Response::SetAcqParamsDone => FrameCategory::SetAcqParamsDone,
            Response::AcquisitionParams(_) => FrameCategory::AcquisitionParams,
            Response::Data(_) => FrameCategory::Data,
            Response::Declination(_) => FrameCategory::Declination,
            Response::FunctionalMode { .. } => FrameCategory::FunctionalMode,
        }
    }
}

/// Device type and firmware revision, four ASCII characters each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub revision: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquisitionParams {
    /// Polled (true) or continuous (false) acquisition.
    pub poll_mode: bool,
    /// Flush the FIR filter after every measurement.
    pub flush_filters: bool,
    /// Delay between data sets in continuous mode, seconds.
    pub sample_delay: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    pub value: ComponentValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentValue {
    Status(u8),
    Scalar(f32),
    Quaternion([f32; 4]),
}

impl ComponentValue {
    /// Flatten the value into a list of numbers.
    pub fn values(&self) -> Vec<f64> {
        match self {
            ComponentValue::Status(v) => vec![f64::from(*v)],
            ComponentValue::Scalar(v) => vec![f64::from(*v)],
            ComponentValue::Quaternion(q) => q.iter().map(|v| f64::from(*v)).collect(),
        }
    }
}

/// Response categories a handler can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameCategory {
    ModuleInfo,
    SerialNumber,
    SetConfigDone,
    SetAcqParamsDone,
    AcquisitionParams,
    Data,
    Declination,
    FunctionalMode,
}

impl FrameCategory {
    pub const COUNT: usize = 8;

    pub const ALL: [FrameCategory; Self::COUNT] = [
        FrameCategory::ModuleInfo,
        FrameCategory::SerialNumber,
        FrameCategory::SetConfigDone,
        FrameCategory::SetAcqParamsDone,
        FrameCategory::AcquisitionParams,
        FrameCategory::Data,
        FrameCategory::Declination,
        FrameCategory::FunctionalMode,
    ];

    /// Dense index in `0..COUNT`.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            FrameCategory::ModuleInfo => "module-info",
            FrameCategory::SerialNumber => "serial-number",
            FrameCategory::SetConfigDone => "set-config-done",
            FrameCategory::SetAcqParamsDone => "set-acq-params-done",
            FrameCategory::AcquisitionParams => "acq-params",
            FrameCategory::Data => "data",
            FrameCategory::Declination => "declination",
            FrameCategory::FunctionalMode => "functional-mode",
        }
    }
}

impl std::fmt::Display for FrameCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_indices_are_dense() {
        for (i, category) in FrameCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn response_categories() {
        assert_eq!(Response::SetConfigDone.category(), FrameCategory::SetConfigDone);
        assert_eq!(Response::Data(Vec::new()).category(), FrameCategory::Data);
        assert_eq!(
            Response::FunctionalMode { ahrs: true }.category(),
            FrameCategory::FunctionalMode
        );
    }

    #[test]
    fn component_values_flatten() {
        assert_eq!(ComponentValue::Status(3).values(), vec![3.0]);
        assert_eq!(ComponentValue::Scalar(0.5).values(), vec![0.5]);
        assert_eq!(
            ComponentValue::Quaternion([0.5, -0.5, 0.25, 1.0]).values(),
            vec![0.5, -0.5, 0.25, 1.0]
        );
    }
}
