use bytes::{Bytes, BytesMut};

use crate::codec::{put_frame, FRAME_OVERHEAD};
use crate::endian::ByteOrder;
use crate::protocol::{ComponentId, ConfigId, FrameId};

/// The count byte of `SetDataComponents` caps the list.
const MAX_DATA_COMPONENTS: usize = u8::MAX as usize;

/// Builds framed, checksummed command buffers.
///
/// Stateless apart from the payload byte order, so one instance can be
/// shared freely. Every method is total: numeric arguments are encoded as
/// given, without range checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoder {
    byte_order: ByteOrder,
}

impl Encoder {
    /// Big-endian encoder, matching the device's power-on default.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_byte_order(byte_order: ByteOrder) -> Self {
        Self { byte_order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn get_module_info(&self) -> Bytes {
        self.command(FrameId::GetModInfo, &[])
    }

    pub fn get_serial_number(&self) -> Bytes {
        self.command(FrameId::SerialNumber, &[])
    }

    /// Select the components returned by subsequent data frames, in order.
    ///
    /// Only the first 255 ids are sent.
    pub fn set_data_components(&self, components: &[ComponentId]) -> Bytes {
        let components = &components[..components.len().min(MAX_DATA_COMPONENTS)];
        let mut payload = Vec::with_capacity(components.len() + 1);
        payload.push(components.len() as u8);
        payload.extend(components.iter().map(|id| id.as_u8()));
        self.command(FrameId::SetDataComponents, &payload)
    }

    /// Payload: poll flag, flush flag, four reserved zero bytes, then the
    /// sample delay in seconds as a float32.
    pub fn set_acquisition_params(
        &self,
        poll_mode: bool,
        flush_filters: bool,
        sample_delay: f32,
    ) -> Bytes {
        let mut payload = [0u8; 10];
        payload[0] = u8::from(poll_mode);
        payload[1] = u8::from(flush_filters);
        payload[6..].copy_from_slice(&self.byte_order.f32_to_bytes(sample_delay));
        self.command(FrameId::SetAcqParams, &payload)
    }

    pub fn get_acquisition_params(&self) -> Bytes {
        self.command(FrameId::GetAcqParams, &[])
    }

    /// Request one data set. Only meaningful in polled acquisition mode.
    pub fn get_data(&self) -> Bytes {
        self.command(FrameId::GetData, &[])
    }

    pub fn start_continuous_mode(&self) -> Bytes {
        self.command(FrameId::StartContinuousMode, &[])
    }

    pub fn stop_continuous_mode(&self) -> Bytes {
        self.command(FrameId::StopContinuousMode, &[])
    }

    /// Set magnetic declination, in degrees.
    pub fn set_declination(&self, degrees: f32) -> Bytes {
        let mut payload = [0u8; 5];
        payload[0] = ConfigId::Declination.as_u8();
        payload[1..].copy_from_slice(&self.byte_order.f32_to_bytes(degrees));
        self.command(FrameId::SetConfig, &payload)
    }

    pub fn get_declination(&self) -> Bytes {
        self.command(FrameId::GetConfig, &[ConfigId::Declination.as_u8()])
    }

    /// Re-reference the AHRS heading.
    pub fn reset_reference(&self) -> Bytes {
        self.command(FrameId::SetResetRef, &[])
    }

    /// Switch between AHRS (true) and compass (false) operation.
    pub fn set_functional_mode(&self, ahrs: bool) -> Bytes {
        self.command(FrameId::SetFunctionalMode, &[u8::from(ahrs)])
    }

    pub fn get_functional_mode(&self) -> Bytes {
        self.command(FrameId::GetFunctionalMode, &[])
    }

    /// Persist the current configuration to non-volatile memory.
    pub fn save(&self) -> Bytes {
        self.command(FrameId::Save, &[])
    }

    // Payloads built above are at most 256 bytes, well inside the length field.
    fn command(&self, frame_id: FrameId, payload: &[u8]) -> Bytes {
        let mut buf = BytesMut::with_capacity(FRAME_OVERHEAD + payload.len());
        put_frame(frame_id.as_u8(), payload, &mut buf);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::crc16;

    fn assert_self_consistent(frame: &[u8]) {
        let (body, trailer) = frame.split_at(frame.len() - 2);
        assert_eq!(
            u16::from_be_bytes([trailer[0], trailer[1]]),
            crc16(body),
            "trailer of {frame:02X?}"
        );
        assert_eq!(
            u16::from_be_bytes([frame[0], frame[1]]) as usize,
            frame.len(),
            "length of {frame:02X?}"
        );
    }

    #[test]
    fn module_info_query() {
        assert_eq!(
            Encoder::new().get_module_info().as_ref(),
            &[0x00, 0x05, 0x01, 0xEF, 0xD4]
        );
    }

    #[test]
    fn serial_number_query() {
        assert_eq!(
            Encoder::new().get_serial_number().as_ref(),
            &[0x00, 0x05, 0x34, 0x89, 0x22]
        );
    }

    #[test]
    fn data_components() {
        let enc = Encoder::new();
        let cmd = enc.set_data_components(&[
            ComponentId::Heading,
            ComponentId::Pitch,
            ComponentId::Roll,
            ComponentId::HeadingStatus,
        ]);
        assert_eq!(
            cmd.as_ref(),
            &[0x00, 0x0A, 0x03, 0x04, 0x05, 0x18, 0x19, 0x4F, 0xE2, 0xEF]
        );

        let cmd = enc.set_data_components(&[ComponentId::Heading, ComponentId::Quaternion]);
        assert_eq!(cmd.as_ref(), &[0x00, 0x08, 0x03, 0x02, 0x05, 0x4D, 0x91, 0x0D]);
    }

    #[test]
    fn data_components_capped_at_count_byte() {
        let ids = vec![ComponentId::Heading; 300];
        let cmd = Encoder::new().set_data_components(&ids);
        assert_eq!(cmd[3], 255);
        assert_eq!(cmd.len(), FRAME_OVERHEAD + 1 + 255);
        assert_self_consistent(&cmd);
    }

    #[test]
    fn declination() {
        let enc = Encoder::new();
        assert_eq!(
            enc.set_declination(12.5).as_ref(),
            &[0x00, 0x0A, 0x06, 0x01, 0x41, 0x48, 0x00, 0x00, 0x78, 0xDA]
        );
        assert_eq!(
            enc.get_declination().as_ref(),
            &[0x00, 0x06, 0x07, 0x01, 0x3B, 0x16]
        );
    }

    #[test]
    fn declination_little_endian() {
        let enc = Encoder::with_byte_order(ByteOrder::Little);
        assert_eq!(
            enc.set_declination(12.5).as_ref(),
            &[0x00, 0x0A, 0x06, 0x01, 0x00, 0x00, 0x48, 0x41, 0x08, 0x7E]
        );
    }

    #[test]
    fn acquisition_params() {
        let enc = Encoder::new();
        assert_eq!(
            enc.set_acquisition_params(false, false, 0.0).as_ref(),
            &[
                0x00, 0x0F, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0xE4, 0x50,
            ]
        );
        assert_eq!(
            enc.set_acquisition_params(false, true, 1.825).as_ref(),
            &[
                0x00, 0x0F, 0x18, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x3F, 0xE9, 0x99, 0x9A,
                0x49, 0x54,
            ]
        );
        assert_eq!(
            enc.set_acquisition_params(true, true, 0.5).as_ref(),
            &[
                0x00, 0x0F, 0x18, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x3F, 0x00, 0x00, 0x00,
                0x98, 0x31,
            ]
        );
    }

    #[test]
    fn acquisition_params_little_endian() {
        let enc = Encoder::with_byte_order(ByteOrder::Little);
        assert_eq!(
            enc.set_acquisition_params(true, true, 0.5).as_ref(),
            &[
                0x00, 0x0F, 0x18, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3F,
                0xA7, 0x8A,
            ]
        );
    }

    #[test]
    fn functional_mode() {
        let enc = Encoder::new();
        assert_eq!(
            enc.set_functional_mode(true).as_ref(),
            &[0x00, 0x06, 0x4F, 0x01, 0xBF, 0x73]
        );
        assert_eq!(
            enc.set_functional_mode(false).as_ref(),
            &[0x00, 0x06, 0x4F, 0x00, 0xAF, 0x52]
        );
        assert_eq!(
            enc.get_functional_mode().as_ref(),
            &[0x00, 0x05, 0x50, 0xA5, 0x00]
        );
    }

    #[test]
    fn payloadless_commands() {
        let enc = Encoder::new();
        let cases: [(Bytes, [u8; 5]); 7] = [
            (enc.save(), [0x00, 0x05, 0x09, 0x6E, 0xDC]),
            (enc.reset_reference(), [0x00, 0x05, 0x6E, 0x72, 0x9D]),
            (enc.start_continuous_mode(), [0x00, 0x05, 0x15, 0xBD, 0x61]),
            (enc.stop_continuous_mode(), [0x00, 0x05, 0x16, 0x8D, 0x02]),
            (enc.get_data(), [0x00, 0x05, 0x04, 0xBF, 0x71]),
            (enc.get_acquisition_params(), [0x00, 0x05, 0x19, 0x7C, 0xED]),
            (enc.get_serial_number(), [0x00, 0x05, 0x34, 0x89, 0x22]),
        ];
        for (actual, expected) in cases {
            assert_eq!(actual.as_ref(), &expected);
        }
    }

    #[test]
    fn out_of_range_values_are_encoded_as_given() {
        let enc = Encoder::new();
        for value in [f32::NAN, f32::INFINITY, -1.0e30, 720.0] {
            assert_self_consistent(&enc.set_declination(value));
            assert_self_consistent(&enc.set_acquisition_params(true, false, value));
        }
        assert_self_consistent(&enc.set_data_components(&[]));
    }
}
