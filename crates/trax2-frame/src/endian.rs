//! Byte-order conversions for multi-byte payload fields.
//!
//! The length prefix and CRC trailer are always big-endian. Payload fields
//! follow the device's configured endianness, big-endian unless changed.

/// Byte order of multi-byte payload fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Big,
    Little,
}

impl ByteOrder {
    pub fn u16_to_bytes(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        }
    }

    pub fn u16_from_bytes(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Big => u16::from_be_bytes(bytes),
            ByteOrder::Little => u16::from_le_bytes(bytes),
        }
    }

    pub fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Big => u32::from_be_bytes(bytes),
            ByteOrder::Little => u32::from_le_bytes(bytes),
        }
    }

    /// IEEE-754 single precision, four bytes.
    pub fn f32_to_bytes(self, value: f32) -> [u8; 4] {
        match self {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        }
    }

    pub fn f32_from_bytes(self, bytes: [u8; 4]) -> f32 {
        match self {
            ByteOrder::Big => f32::from_be_bytes(bytes),
            ByteOrder::Little => f32::from_le_bytes(bytes),
        }
    }

    /// Read a `u32` starting at `offset`.
    ///
    /// # Panics
    ///
    /// If fewer than four bytes follow `offset`.
    pub fn u32_at(self, bytes: &[u8], offset: usize) -> u32 {
        self.u32_from_bytes(quad(bytes, offset))
    }

    /// Read an `f32` starting at `offset`.
    ///
    /// # Panics
    ///
    /// If fewer than four bytes follow `offset`.
    pub fn f32_at(self, bytes: &[u8], offset: usize) -> f32 {
        self.f32_from_bytes(quad(bytes, offset))
    }
}

fn quad(bytes: &[u8], offset: usize) -> [u8; 4] {
    let b = &bytes[offset..offset + 4];
    [b[0], b[1], b[2], b[3]]
}
