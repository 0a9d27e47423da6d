use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use trax2_frame::{ByteOrder, ComponentId};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod components;
pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a command frame.
    Encode(EncodeArgs),
    /// Decode response frames from hex, a capture file or stdin.
    Decode(DecodeArgs),
    /// List data component ids.
    Components(ComponentsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Components(args) => components::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Byte order of multi-byte payload fields.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ByteOrderArg {
    #[default]
    Big,
    Little,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(arg: ByteOrderArg) -> Self {
        match arg {
            ByteOrderArg::Big => ByteOrder::Big,
            ByteOrderArg::Little => ByteOrder::Little,
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Payload byte order of the target device.
    #[arg(long, value_enum, default_value = "big")]
    pub byte_order: ByteOrderArg,
    #[command(subcommand)]
    pub command: EncodeCommand,
}

#[derive(Subcommand, Debug)]
pub enum EncodeCommand {
    /// Query device type and firmware revision.
    GetModuleInfo,
    /// Query the device serial number.
    GetSerialNumber,
    /// Select the components returned in data frames, in order.
    SetDataComponents {
        /// Component names (e.g. heading, kPitch) or numeric ids.
        #[arg(required = true, value_delimiter = ',', value_parser = parse_component)]
        components: Vec<ComponentId>,
    },
    /// Set acquisition mode, filter flushing and sample delay.
    SetAcqParams {
        #[arg(long, value_enum, default_value = "poll")]
        mode: AcqMode,
        /// Flush the FIR filters after each sample.
        #[arg(long)]
        flush_filters: bool,
        /// Seconds between samples in continuous mode.
        #[arg(long, default_value_t = 0.0)]
        sample_delay: f32,
    },
    GetAcqParams,
    /// Request one data set (polled mode).
    GetData,
    StartContinuous,
    StopContinuous,
    /// Set magnetic declination in degrees.
    SetDeclination {
        #[arg(allow_negative_numbers = true)]
        degrees: f32,
    },
    GetDeclination,
    /// Re-reference the AHRS heading.
    ResetRef,
    SetFunctionalMode {
        #[arg(value_enum)]
        mode: FunctionalMode,
    },
    GetFunctionalMode,
    /// Persist configuration to non-volatile memory.
    Save,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AcqMode {
    Poll,
    Continuous,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FunctionalMode {
    Compass,
    Ahrs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex bytes to decode (whitespace, ':' or ',' separated; 0x prefixes allowed).
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read raw bytes from a capture file. Reads stdin when neither --hex nor --file is given.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
    /// Feed the decoder this many bytes at a time.
    #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u32).range(1..))]
    pub chunk_size: u32,
    /// Deliver frames whose CRC does not match instead of dropping them.
    #[arg(long)]
    pub keep_crc_errors: bool,
    /// Payload byte order of the source device.
    #[arg(long, value_enum, default_value = "big")]
    pub byte_order: ByteOrderArg,
}

#[derive(Args, Debug, Default)]
pub struct ComponentsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Accepts `heading`, `kHeading` (any case) or a numeric id such as `5`.
fn parse_component(input: &str) -> Result<ComponentId, String> {
    let input = input.trim();
    if let Ok(value) = input.parse::<u8>() {
        return ComponentId::from_u8(value).ok_or_else(|| format!("unknown component id {value}"));
    }

    let name = match input.strip_prefix('k') {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => rest,
        _ => input,
    };
    ComponentId::ALL
        .iter()
        .copied()
        .find(|id| id.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("unknown component '{input}'"))
}
