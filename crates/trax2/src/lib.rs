//! TRAX2 compass/IMU protocol support.
//!
//! The protocol logic lives in [`frame`]: a total command [`frame::Encoder`]
//! and a streaming [`frame::Decoder`] that reassembles response frames from
//! arbitrarily chunked input. The `cli` feature adds the `trax2` binary for
//! encoding commands and decoding captured byte streams offline.

/// Re-export frame types.
pub mod frame {
    pub use trax2_frame::*;
}
