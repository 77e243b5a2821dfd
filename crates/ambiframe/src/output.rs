use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

use ambiframe_frame::{is_symmetric, Color, Frame, Segment, FRAME_LEN, LEDS_TOTAL, MARKER_LEN};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};

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
struct LedOutput {
    index: usize,
    segment: &'static str,
    color: Color,
}

#[derive(Serialize)]
struct FrameOutput {
    frame_len: usize,
    leds: Vec<LedOutput>,
}

/// Print every LED of a decoded frame.
pub fn print_frame(frame: &Frame, format: OutputFormat) -> io::Result<()> {
    let leds = frame.colors().iter().enumerate().map(|(index, color)| LedOutput {
        index,
        segment: segment_name(index),
        color: *color,
    });

    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                frame_len: FRAME_LEN,
                leds: leds.collect(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["INDEX", "SEGMENT", "RED", "GREEN", "BLUE"]);
            for led in leds {
                table.add_row(vec![
                    led.index.to_string(),
                    led.segment.to_string(),
                    led.color.red.to_string(),
                    led.color.green.to_string(),
                    led.color.blue.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for led in leds {
                println!("{:>3} {:<12} {}", led.index, led.segment, led.color);
            }
        }
        OutputFormat::Raw => print_raw(&frame.encode()[MARKER_LEN..FRAME_LEN - MARKER_LEN])?,
    }
    Ok(())
}

#[derive(Serialize)]
struct SegmentAverage {
    segment: &'static str,
    average: Color,
}

#[derive(Serialize)]
struct FrameSummary {
    sequence: usize,
    segments: Vec<SegmentAverage>,
}

/// Print one line (or row set) per received frame: the average color of each segment.
pub fn print_frame_summary(
    sequence: usize,
    frame: &Frame,
    format: OutputFormat,
) -> io::Result<()> {
    let summary = FrameSummary {
        sequence,
        segments: Segment::ALL
            .into_iter()
            .map(|segment| SegmentAverage {
                segment: segment.name(),
                average: average_color(frame.segment(segment)),
            })
            .collect(),
    };

    match format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FRAME", "SEGMENT", "AVERAGE"]);
            for segment in &summary.segments {
                table.add_row(vec![
                    sequence.to_string(),
                    segment.segment.to_string(),
                    segment.average.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let mut line = format!("frame={sequence}");
            for segment in &summary.segments {
                let _ = write!(line, " {}={}", segment.segment, segment.average);
            }
            println!("{line}");
        }
        OutputFormat::Raw => print_raw(&frame.encode())?,
    }
    Ok(())
}

#[derive(Serialize)]
struct SegmentOutput {
    name: &'static str,
    leds: usize,
    first_index: usize,
    last_index: usize,
    traversal: &'static str,
}

#[derive(Serialize)]
struct LayoutOutput {
    segments: Vec<SegmentOutput>,
    leds_total: usize,
    frame_len: usize,
    symmetric: bool,
}

pub fn print_layout(format: OutputFormat) {
    let out = LayoutOutput {
        segments: Segment::ALL
            .into_iter()
            .map(|segment| SegmentOutput {
                name: segment.name(),
                leds: segment.led_count(),
                first_index: segment.indices().start,
                last_index: segment.indices().end - 1,
                traversal: segment.traversal(),
            })
            .collect(),
        leds_total: LEDS_TOTAL,
        frame_len: FRAME_LEN,
        symmetric: is_symmetric(),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            let mut table = new_table(vec!["SEGMENT", "LEDS", "INDICES", "TRAVERSAL"]);
            for s in &out.segments {
                table.add_row(vec![
                    s.name.to_string(),
                    s.leds.to_string(),
                    format!("{}..={}", s.first_index, s.last_index),
                    s.traversal.to_string(),
                ]);
            }
            println!("{table}");
            println!(
                "total LEDs: {}, frame length: {} bytes",
                out.leds_total, out.frame_len
            );
        }
        OutputFormat::Raw => println!("{}", out.leds_total),
    }
}

#[derive(Serialize)]
struct EncodedOutput {
    frame_len: usize,
    hex: String,
}

/// Print an encoded frame: bytes for `raw`, hex otherwise.
pub fn print_encoded(wire: &[u8], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Raw => print_raw(wire)?,
        OutputFormat::Json => print_json(&EncodedOutput {
            frame_len: wire.len(),
            hex: hex(wire),
        }),
        OutputFormat::Table | OutputFormat::Pretty => println!("{}", hex(wire)),
    }
    Ok(())
}

#[derive(Serialize)]
struct PortOutput {
    name: String,
    kind: &'static str,
    description: String,
}

impl From<&SerialPortInfo> for PortOutput {
    fn from(info: &SerialPortInfo) -> Self {
        let (kind, description) = match &info.port_type {
            SerialPortType::UsbPort(usb) => {
                let mut description = format!("{:04x}:{:04x}", usb.vid, usb.pid);
                for part in [&usb.manufacturer, &usb.product].into_iter().flatten() {
                    description.push(' ');
                    description.push_str(part);
                }
                ("usb", description)
            }
            SerialPortType::PciPort => ("pci", String::new()),
            SerialPortType::BluetoothPort => ("bluetooth", String::new()),
            SerialPortType::Unknown => ("unknown", String::new()),
        };
        Self {
            name: info.port_name.clone(),
            kind,
            description,
        }
    }
}

/// Print discovered serial ports.
pub fn print_ports(ports: &[SerialPortInfo], format: OutputFormat) {
    let ports: Vec<PortOutput> = ports.iter().map(PortOutput::from).collect();

    match format {
        OutputFormat::Json => print_json(&ports),
        OutputFormat::Table => {
            let mut table = new_table(vec!["PORT", "TYPE", "DESCRIPTION"]);
            for port in &ports {
                table.add_row(vec![
                    port.name.clone(),
                    port.kind.to_string(),
                    port.description.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for port in &ports {
                println!("{:<16} {:<9} {}", port.name, port.kind, port.description);
            }
        }
        OutputFormat::Raw => {
            for port in &ports {
                println!("{}", port.name);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) -> io::Result<()> {
    write_raw(&mut io::stdout().lock(), data)
}

fn write_raw<W: Write>(out: &mut W, data: &[u8]) -> io::Result<()> {
    out.write_all(data)?;
    out.flush()
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn segment_name(index: usize) -> &'static str {
    Segment::of(index).map(Segment::name).unwrap_or("unknown")
}

/// Per-channel mean, rounded down. Black for an empty slice.
pub fn average_color(colors: &[Color]) -> Color {
    if colors.is_empty() {
        return Color::BLACK;
    }

    let (r, g, b) = colors.iter().fold((0u32, 0u32, 0u32), |(r, g, b), c| {
        (r + c.red as u32, g + c.green as u32, b + c.blue as u32)
    });
    let n = colors.len() as u32;
    Color::new((r / n) as u8, (g / n) as u8, (b / n) as u8)
}

pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
