use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::{json, Value};
use trax2_frame::{ComponentId, ComponentValue, DecodedFrame, FrameId, Response};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct CommandOutput<'a> {
    command: &'a str,
    frame_id: u8,
    frame_name: &'a str,
    length: usize,
    hex: String,
}

/// Print one encoded command.
pub fn print_command(command: &str, bytes: &[u8], format: OutputFormat) {
    let frame_name = bytes
        .get(2)
        .and_then(|id| FrameId::from_u8(*id))
        .map_or("unknown", FrameId::name);

    match format {
        OutputFormat::Json => {
            let out = CommandOutput {
                command,
                frame_id: bytes.get(2).copied().unwrap_or_default(),
                frame_name,
                length: bytes.len(),
                hex: hex::encode_upper(bytes),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "FRAME", "LENGTH", "BYTES"])
                .add_row(vec![
                    command.to_string(),
                    frame_name.to_string(),
                    bytes.len().to_string(),
                    spaced_hex(bytes),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{command} ({frame_name}): {}", spaced_hex(bytes));
        }
        OutputFormat::Raw => print_raw(bytes),
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    frame_id: u8,
    frame_name: &'a str,
    category: &'a str,
    length: u16,
    crc16: String,
    crc16_error: bool,
    fields: Value,
}

/// Print decoded frames. JSON output is one object per line.
pub fn print_frames(frames: &[DecodedFrame], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for frame in frames {
                let category = frame.category();
                let out = FrameOutput {
                    frame_id: frame.id.as_u8(),
                    frame_name: frame.id.name(),
                    category: category.name(),
                    length: frame.length,
                    crc16: format!("{:#06x}", frame.crc16_expected),
                    crc16_error: frame.crc16_error_status,
                    fields: response_fields(&frame.response),
                };
                print_json(&out);
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FRAME", "CATEGORY", "LENGTH", "CRC16", "VALUES"]);
            for frame in frames {
                table.add_row(vec![
                    frame.id.name().to_string(),
                    frame.category().to_string(),
                    frame.length.to_string(),
                    crc_label(frame),
                    response_summary(&frame.response),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for frame in frames {
                println!(
                    "{} ({}) len={} crc={} {}",
                    frame.id,
                    frame.category(),
                    frame.length,
                    crc_label(frame),
                    response_summary(&frame.response)
                );
            }
        }
        OutputFormat::Raw => {
            for frame in frames {
                println!("{}", response_summary(&frame.response));
            }
        }
    }
}

#[derive(Serialize)]
struct ComponentOutput {
    id: u8,
    name: &'static str,
    kind: String,
    width: usize,
}

pub fn print_components(format: OutputFormat) {
    let rows: Vec<ComponentOutput> = ComponentId::ALL
        .iter()
        .map(|id| ComponentOutput {
            id: id.as_u8(),
            name: id.name(),
            kind: format!("{:?}", id.kind()).to_lowercase(),
            width: id.value_width(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "NAME", "KIND", "BYTES"]);
            for row in &rows {
                table.add_row(vec![
                    format!("{:#04x}", row.id),
                    row.name.to_string(),
                    row.kind.clone(),
                    row.width.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in &rows {
                println!("{:>3} {:<14} {} ({} bytes)", row.id, row.name, row.kind, row.width);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Upper-case hex with a space between bytes.
pub fn spaced_hex(bytes: &[u8]) -> String {
    bytes
        .chunks(1)
        .map(hex::encode_upper)
        .collect::<Vec<_>>()
        .join(" ")
}

fn crc_label(frame: &DecodedFrame) -> String {
    if frame.crc16_error_status {
        format!("{:04X} (mismatch)", frame.crc16_expected)
    } else {
        format!("{:04X}", frame.crc16_expected)
    }
}

fn response_fields(response: &Response) -> Value {
    match response {
        Response::ModuleInfo(info) => json!({ "name": info.name, "revision": info.revision }),
        Response::SerialNumber(serial) => json!({ "serial_number": serial }),
        Response::SetConfigDone | Response::SetAcqParamsDone => json!({}),
        Response::AcquisitionParams(params) => json!({
            "poll_mode": params.poll_mode,
            "flush_filters": params.flush_filters,
            "sample_delay": params.sample_delay,
        }),
        Response::Data(components) => {
            let components: Vec<Value> = components
                .iter()
                .map(|c| {
                    json!({
                        "id": c.id.as_u8(),
                        "name": c.id.name(),
                        "values": c.value.values(),
                    })
                })
                .collect();
            json!({ "components": components })
        }
        Response::Declination(degrees) => json!({ "declination": degrees }),
        Response::FunctionalMode { ahrs } => json!({ "mode": mode_name(*ahrs) }),
    }
}

fn response_summary(response: &Response) -> String {
    match response {
        Response::ModuleInfo(info) => format!("{} {}", info.name, info.revision),
        Response::SerialNumber(serial) => serial.to_string(),
        Response::SetConfigDone | Response::SetAcqParamsDone => "ok".to_string(),
        Response::AcquisitionParams(params) => format!(
            "{} flush_filters={} sample_delay={}",
            if params.poll_mode { "polled" } else { "continuous" },
            params.flush_filters,
            params.sample_delay
        ),
        Response::Data(components) => components
            .iter()
            .map(|c| format!("{}={}", c.id, value_text(&c.value)))
            .collect::<Vec<_>>()
            .join(" "),
        Response::Declination(degrees) => format!("declination={degrees}"),
        Response::FunctionalMode { ahrs } => mode_name(*ahrs).to_string(),
    }
}

fn value_text(value: &ComponentValue) -> String {
    match value {
        ComponentValue::Status(v) => v.to_string(),
        ComponentValue::Scalar(v) => v.to_string(),
        ComponentValue::Quaternion(q) => format!("[{},{},{},{}]", q[0], q[1], q[2], q[3]),
    }
}

fn mode_name(ahrs: bool) -> &'static str {
    if ahrs {
        "ahrs"
    } else {
        "compass"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trax2_frame::{AcquisitionParams, Component, ModuleInfo};

    #[test]
    fn spaced_hex_formats_each_byte() {
        assert_eq!(spaced_hex(&[0x00, 0x05, 0x01, 0xEF, 0xD4]), "00 05 01 EF D4");
        assert_eq!(spaced_hex(&[]), "");
    }

    #[test]
    fn summaries() {
        let info = Response::ModuleInfo(ModuleInfo {
            name: "TRAX".into(),
            revision: "P734".into(),
        });
        assert_eq!(response_summary(&info), "TRAX P734");

        let params = Response::AcquisitionParams(AcquisitionParams {
            poll_mode: false,
            flush_filters: true,
            sample_delay: 0.5,
        });
        assert_eq!(
            response_summary(&params),
            "continuous flush_filters=true sample_delay=0.5"
        );

        let data = Response::Data(vec![
            Component {
                id: ComponentId::Heading,
                value: ComponentValue::Scalar(90.0),
            },
            Component {
                id: ComponentId::HeadingStatus,
                value: ComponentValue::Status(2),
            },
        ]);
        assert_eq!(response_summary(&data), "Heading=90 HeadingStatus=2");
    }

    #[test]
    fn fields_for_data_frames() {
        let data = Response::Data(vec![Component {
            id: ComponentId::Quaternion,
            value: ComponentValue::Quaternion([0.5, -0.5, 0.25, 1.0]),
        }]);
        assert_eq!(
            response_fields(&data),
            json!({ "components": [
                { "id": 77, "name": "Quaternion", "values": [0.5, -0.5, 0.25, 1.0] }
            ]})
        );
        assert_eq!(
            response_fields(&Response::FunctionalMode { ahrs: false }),
            json!({ "mode": "compass" })
        );
    }
}
