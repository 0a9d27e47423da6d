use std::fs;
use std::io::Read;

use trax2_frame::{Decoder, FrameConfig};

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_frames, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = read_input(&args)?;
    let mut decoder = Decoder::with_config(FrameConfig {
        skip_on_checksum_error: !args.keep_crc_errors,
        byte_order: args.byte_order.into(),
    });

    let chunk_size = args.chunk_size as usize;
    let mut frames = Vec::new();
    for chunk in input.chunks(chunk_size) {
        frames.extend(decoder.decode(chunk));
    }

    tracing::info!(
        bytes = input.len(),
        frames = frames.len(),
        frames_seen = decoder.frames_seen(),
        trailing = decoder.pending_len(),
        "decode finished"
    );

    if frames.is_empty() {
        return Err(CliError::new(
            DATA_INVALID,
            format!("no frames found in {} bytes", input.len()),
        ));
    }

    print_frames(&frames, format);
    Ok(SUCCESS)
}

fn read_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(text) = &args.hex {
        return parse_hex(text);
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }

    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(buf)
}

/// Parse `00 05 13 DD A7`, `00:05:13`, `0x00,0x05` or a contiguous `000513DDA7`.
fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let mut digits = String::with_capacity(text.len());
    for token in text.split(|c: char| c.is_whitespace() || c == ':' || c == ',') {
        if token.is_empty() {
            continue;
        }
        let token = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        if token.len() % 2 == 1 {
            digits.push('0');
        }
        digits.push_str(token);
    }

    hex::decode(&digits).map_err(|err| CliError::usage(format!("--hex: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::USAGE;

    #[test]
    fn hex_separators() {
        let expected = vec![0x00, 0x05, 0x13, 0xDD, 0xA7];
        assert_eq!(parse_hex("00 05 13 DD A7").unwrap(), expected);
        assert_eq!(parse_hex("00:05:13:dd:a7").unwrap(), expected);
        assert_eq!(parse_hex("0x00,0x05,0x13,0xDD,0xA7").unwrap(), expected);
        assert_eq!(parse_hex("000513DDA7\n").unwrap(), expected);
        assert_eq!(parse_hex("0 5 13 DD A7").unwrap(), expected);
    }

    #[test]
    fn bad_hex_is_a_usage_error() {
        let err = parse_hex("00 zz").unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.starts_with("--hex"));
    }
}
