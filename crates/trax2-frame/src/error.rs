/// Errors that can occur while encoding frames or moving them over a stream.
///
/// Malformed input on the decode path is not an error: the decoder drops
/// it and resynchronizes (see [`crate::Reject`]).
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload does not fit in the 16-bit length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream reached EOF before another complete frame arrived.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
