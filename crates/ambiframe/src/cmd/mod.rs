use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ambiframe_frame::{Color, Frame};
use clap::{Args, Subcommand};
use serialport::SerialPort;

use crate::exit::{io_error, serial_error, CliError, CliResult, DATA_INVALID, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod layout;
pub mod listen;
pub mod ports;
pub mod send;
pub mod version;

/// Baud rate the stripe controller listens at.
pub const DEFAULT_BAUD: u32 = 230_400;

const DEFAULT_SERIAL_TIMEOUT: &str = "100ms";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the LED segment layout and frame size.
    Layout(LayoutArgs),
    /// Encode colors into a frame.
    Encode(EncodeArgs),
    /// Decode a single frame and print its colors.
    Decode(DecodeArgs),
    /// Write frames to a serial device or file.
    Send(SendArgs),
    /// Read a stream of frames and print per-segment summaries.
    Listen(ListenArgs),
    /// List serial ports found on this machine.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Layout(args) => layout::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Where the colors of a frame come from. Defaults to all black.
#[derive(Args, Debug, Default)]
pub struct ColorArgs {
    /// Set every LED to one color (`r,g,b` or `#rrggbb`).
    #[arg(long, value_name = "COLOR", conflicts_with_all = ["json", "file"])]
    pub fill: Option<Color>,
    /// JSON array with one `[r,g,b]` entry per LED, in stripe order.
    #[arg(long, conflicts_with_all = ["fill", "file"])]
    pub json: Option<String>,
    /// Read the JSON color array from a file.
    #[arg(long, conflicts_with_all = ["fill", "json"])]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct LayoutArgs {}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub colors: ColorArgs,
    /// Write the frame to a file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding exactly one frame (`-` for stdin).
    #[arg(default_value = "-")]
    pub path: PathBuf,
}

/// Link settings used when a path names a serial device.
#[derive(Args, Debug, Clone)]
pub struct SerialArgs {
    /// Baud rate for serial devices.
    #[arg(long, default_value_t = DEFAULT_BAUD)]
    pub baud: u32,
    /// Serial read/write timeout (e.g. 100ms, 1s).
    #[arg(long, value_name = "DURATION", default_value = DEFAULT_SERIAL_TIMEOUT)]
    pub timeout: String,
}

impl Default for SerialArgs {
    fn default() -> Self {
        Self {
            baud: DEFAULT_BAUD,
            timeout: DEFAULT_SERIAL_TIMEOUT.to_string(),
        }
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device, existing file, or `-` for stdout.
    pub path: PathBuf,
    #[command(flatten)]
    pub colors: ColorArgs,
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Create `path` as a regular file if it does not exist (frame capture).
    #[arg(long)]
    pub create: bool,
    /// Number of times to send the frame.
    #[arg(long, default_value = "1")]
    pub repeat: usize,
    /// Delay between repeated frames (e.g. 34ms, 1s).
    #[arg(long, default_value = "34ms")]
    pub interval: String,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Serial device or file to read from (`-` for stdin).
    #[arg(default_value = "-")]
    pub path: PathBuf,
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Keep reading after a malformed frame instead of exiting.
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Build a frame from the selected color source.
pub fn resolve_frame(args: &ColorArgs) -> CliResult<Frame> {
    if let Some(color) = args.fill {
        return Ok(Frame::filled(color));
    }
    if let Some(json) = &args.json {
        return frame_from_json(json, "--json");
    }
    if let Some(path) = &args.file {
        let text = std::fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return frame_from_json(&text, &path.display().to_string());
    }
    Ok(Frame::default())
}

fn frame_from_json(text: &str, source: &str) -> CliResult<Frame> {
    let colors: Vec<Color> = serde_json::from_str(text).map_err(|err| {
        CliError::new(
            USAGE,
            format!("{source} is not a JSON array of [r,g,b]: {err}"),
        )
    })?;
    Frame::new(&colors).map_err(|err| CliError::new(DATA_INVALID, format!("{source}: {err}")))
}

/// Open a path for reading, with `-` meaning stdin.
pub fn open_input(path: &Path) -> CliResult<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdin()));
    }
    let file = File::open(path)
        .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
    Ok(Box::new(file))
}

/// An opened frame source.
pub struct Source {
    pub reader: Box<dyn Read>,
    /// Reads return `TimedOut` while the line is idle instead of blocking.
    pub polled: bool,
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("polled", &self.polled)
            .finish_non_exhaustive()
    }
}

/// Open a frame source: `-` is stdin, a regular file is read as-is, and
/// anything else is opened as a serial device.
pub fn open_source(path: &Path, serial: &SerialArgs) -> CliResult<Source> {
    if path.as_os_str() == "-" || is_regular_file(path) {
        return Ok(Source {
            reader: open_input(path)?,
            polled: false,
        });
    }

    let port = open_serial(path, serial)?;
    Ok(Source {
        reader: Box::new(port),
        polled: true,
    })
}

/// Open a frame sink: `-` is stdout and an existing regular file is
/// overwritten. A missing path becomes a new file only when `create` is set;
/// otherwise it must be a serial device.
pub fn open_sink(path: &Path, serial: &SerialArgs, create: bool) -> CliResult<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdout()));
    }

    if is_regular_file(path) || (create && !path.exists()) {
        let file = OpenOptions::new()
            .write(true)
            .create(create)
            .truncate(true)
            .open(path)
            .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
        return Ok(Box::new(file));
    }

    let port = open_serial(path, serial)?;
    Ok(Box::new(port))
}

fn open_serial(path: &Path, serial: &SerialArgs) -> CliResult<Box<dyn SerialPort>> {
    let timeout = parse_duration(&serial.timeout)?;
    let port = serialport::new(path.to_string_lossy(), serial.baud)
        .timeout(timeout)
        .open()
        .map_err(|err| serial_error(&format!("failed opening {}", path.display()), err))?;

    tracing::debug!(
        path = %path.display(),
        baud = serial.baud,
        timeout_ms = timeout.as_millis() as u64,
        "serial port opened"
    );
    Ok(port)
}

fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
