//! CRC-CCITT (x^16 + x^12 + x^5 + 1) with a zero initial register.

/// Compute the frame checksum over `bytes`.
///
/// Byte-at-a-time shift-and-xor form of the CCITT update, no lookup table.
pub fn crc16(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |crc, &byte| update(crc, byte))
}

fn update(crc: u16, byte: u8) -> u16 {
    let mut crc = crc.swap_bytes();
    crc ^= u16::from(byte);
    crc ^= (crc & 0xff) >> 4;
    crc ^= crc << 12;
    crc ^= (crc & 0xff) << 5;
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(crc16(&[]), 0);
    }

    #[test]
    fn standard_check_value() {
        assert_eq!(crc16(b"123456789"), 0x31C3);
    }

    #[test]
    fn command_headers() {
        assert_eq!(crc16(&[0x00, 0x05, 0x01]), 0xEFD4);
        assert_eq!(crc16(&[0x00, 0x05, 0x34]), 0x8922);
        assert_eq!(crc16(&[0x00, 0x05, 0x09]), 0x6EDC);
    }

    #[test]
    fn frame_with_trailer_checks_to_zero() {
        let frame = [0x00, 0x09, 0x35, 0x00, 0x0F, 0xBE, 0x43, 0x0E, 0xCF];
        assert_eq!(crc16(&frame[..7]), 0x0ECF);
        assert_eq!(crc16(&frame), 0);
    }
}
