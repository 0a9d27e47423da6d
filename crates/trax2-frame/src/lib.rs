//! Command encoder and streaming frame decoder for the TRAX2 compass/IMU protocol.
//!
//! Every frame on the wire is laid out as:
//! - A 2-byte big-endian length counting the whole frame
//! - A 1-byte frame id
//! - `length - 5` payload bytes
//! - A 2-byte big-endian CRC-CCITT trailer over everything before it
//!
//! The [`Decoder`] accepts arbitrarily chunked input, reassembles frames
//! across chunk boundaries and resynchronizes one byte at a time after
//! corrupt or unrecognized data.

pub mod codec;
pub mod crc;
pub mod decoder;
pub mod dispatch;
pub mod encoder;
pub mod endian;
pub mod error;
#[cfg(feature = "async")]
pub mod framed;
pub mod protocol;
pub mod reader;
pub mod registry;
pub mod response;
pub mod writer;

pub use codec::{encode_frame, FrameConfig, FRAME_OVERHEAD, HEADER_SIZE, MAX_PAYLOAD, MIN_FRAME_LEN};
pub use crc::crc16;
pub use decoder::{parse_frame, Decoder, ParseOutcome, Reject};
pub use dispatch::Handlers;
pub use encoder::Encoder;
pub use endian::ByteOrder;
pub use error::{FrameError, Result};
#[cfg(feature = "async")]
pub use framed::TraxCodec;
pub use protocol::{CalOption, ComponentId, ComponentKind, ConfigId, FrameId, RateId};
pub use reader::FrameReader;
pub use response::{
    AcquisitionParams, Component, ComponentValue, DecodedFrame, FrameCategory, ModuleInfo,
    Response,
};
pub use writer::CommandWriter;
