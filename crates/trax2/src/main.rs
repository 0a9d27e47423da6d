mod cmd;
mod exit;
mod logging;
mod output;

use clap::{ArgAction, Parser};

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "trax2", version, about = "TRAX2 frame encoder and decoder")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "TRAX2_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    /// Raise the log level one step per flag (-v shows decoder rejects).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level.raised(cli.verbose));

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::EncodeCommand;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "trax2",
            "encode",
            "--byte-order",
            "little",
            "set-data-components",
            "heading,pitch",
            "roll",
        ])
        .expect("encode args should parse");

        let Command::Encode(args) = cli.command else {
            panic!("expected encode command");
        };
        let EncodeCommand::SetDataComponents { components } = args.command else {
            panic!("expected set-data-components");
        };
        assert_eq!(components.len(), 3);
    }

    #[test]
    fn negative_declination_is_a_value() {
        let cli = Cli::try_parse_from(["trax2", "encode", "set-declination", "-12.5"])
            .expect("negative declination should parse");
        let Command::Encode(args) = cli.command else {
            panic!("expected encode command");
        };
        assert!(matches!(
            args.command,
            EncodeCommand::SetDeclination { degrees } if degrees == -12.5
        ));
    }

    #[test]
    fn rejects_conflicting_inputs() {
        let err = Cli::try_parse_from([
            "trax2",
            "decode",
            "--hex",
            "00 05 13 DD A7",
            "--file",
            "capture.bin",
        ])
        .expect_err("conflicting inputs should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let err = Cli::try_parse_from(["trax2", "decode", "--chunk-size", "0"])
            .expect_err("zero chunk size should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn verbose_flags_raise_log_level() {
        let cli = Cli::try_parse_from(["trax2", "decode", "-vv", "--hex", "00"])
            .expect("verbose flags should parse");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_level.raised(cli.verbose), LogLevel::Debug);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["trax2", "components", "--format", "json"])
            .expect("global flags should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Components(_)));
    }
}
