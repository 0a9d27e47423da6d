use bytes::Bytes;
use trax2_frame::Encoder;

use crate::cmd::{AcqMode, EncodeArgs, EncodeCommand, FunctionalMode};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_command, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let encoder = Encoder::with_byte_order(args.byte_order.into());
    let (name, bytes) = build(&encoder, &args.command);
    tracing::debug!(command = name, length = bytes.len(), "encoded command");
    print_command(name, &bytes, format);
    Ok(SUCCESS)
}

fn build(encoder: &Encoder, command: &EncodeCommand) -> (&'static str, Bytes) {
    match command {
        EncodeCommand::GetModuleInfo => ("get-module-info", encoder.get_module_info()),
        EncodeCommand::GetSerialNumber => ("get-serial-number", encoder.get_serial_number()),
        EncodeCommand::SetDataComponents { components } => {
            if components.len() > 255 {
                tracing::warn!(
                    requested = components.len(),
                    "only the first 255 components are sent"
                );
            }
            (
                "set-data-components",
                encoder.set_data_components(components),
            )
        }
        EncodeCommand::SetAcqParams {
            mode,
            flush_filters,
            sample_delay,
        } => (
            "set-acq-params",
            encoder.set_acquisition_params(
                matches!(mode, AcqMode::Poll),
                *flush_filters,
                *sample_delay,
            ),
        ),
        EncodeCommand::GetAcqParams => ("get-acq-params", encoder.get_acquisition_params()),
        EncodeCommand::GetData => ("get-data", encoder.get_data()),
        EncodeCommand::StartContinuous => ("start-continuous", encoder.start_continuous_mode()),
        EncodeCommand::StopContinuous => ("stop-continuous", encoder.stop_continuous_mode()),
        EncodeCommand::SetDeclination { degrees } => {
            ("set-declination", encoder.set_declination(*degrees))
        }
        EncodeCommand::GetDeclination => ("get-declination", encoder.get_declination()),
        EncodeCommand::ResetRef => ("reset-ref", encoder.reset_reference()),
        EncodeCommand::SetFunctionalMode { mode } => (
            "set-functional-mode",
            encoder.set_functional_mode(matches!(mode, FunctionalMode::Ahrs)),
        ),
        EncodeCommand::GetFunctionalMode => ("get-functional-mode", encoder.get_functional_mode()),
        EncodeCommand::Save => ("save", encoder.save()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trax2_frame::ComponentId;

    #[test]
    fn builds_expected_frames() {
        let enc = Encoder::new();

        let (name, bytes) = build(&enc, &EncodeCommand::GetModuleInfo);
        assert_eq!(name, "get-module-info");
        assert_eq!(&bytes[..], &[0x00, 0x05, 0x01, 0xEF, 0xD4]);

        let (_, bytes) = build(
            &enc,
            &EncodeCommand::SetFunctionalMode {
                mode: FunctionalMode::Ahrs,
            },
        );
        assert_eq!(bytes, enc.set_functional_mode(true));

        let (_, bytes) = build(
            &enc,
            &EncodeCommand::SetAcqParams {
                mode: AcqMode::Continuous,
                flush_filters: true,
                sample_delay: 0.0,
            },
        );
        assert_eq!(bytes[3], 0);
        assert_eq!(bytes[4], 1);
    }

    #[test]
    fn component_list_is_forwarded_in_order() {
        let enc = Encoder::new();
        let (_, bytes) = build(
            &enc,
            &EncodeCommand::SetDataComponents {
                components: vec![ComponentId::Pitch, ComponentId::Heading],
            },
        );
        assert_eq!(&bytes[2..6], &[0x03, 0x02, 0x18, 0x05]);
    }
}
