mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "ambiframe", version, about = "LED stripe serial frame tool")]
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
        default_value = "info",
        env = "AMBIFRAME_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

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

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "ambiframe",
            "send",
            "/dev/ttyUSB0",
            "--fill",
            "#ff0000",
            "--repeat",
            "3",
        ])
        .expect("send args should parse");

        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.repeat, 3);
                assert_eq!(args.interval, "34ms");
                assert_eq!(args.serial.baud, 230_400);
                assert!(!args.create);
                assert!(args.colors.fill.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_color_sources() {
        let err = Cli::try_parse_from([
            "ambiframe",
            "encode",
            "--fill",
            "1,2,3",
            "--json",
            "[]",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_malformed_fill_color() {
        let err = Cli::try_parse_from(["ambiframe", "encode", "--fill", "red"])
            .expect_err("bad color should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn decode_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["ambiframe", "--format", "json", "decode"])
            .expect("decode args should parse");
        match cli.command {
            Command::Decode(args) => assert_eq!(args.path.as_os_str(), "-"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_log_level_off() {
        let cli = Cli::try_parse_from(["ambiframe", "--log-level", "off", "layout"])
            .expect("layout args should parse");
        assert_eq!(cli.log_level, LogLevel::Off);
    }

    #[test]
    fn parses_listen_serial_settings() {
        let cli = Cli::try_parse_from([
            "ambiframe",
            "listen",
            "/dev/ttyACM0",
            "--baud",
            "115200",
            "--timeout",
            "250ms",
        ])
        .expect("listen args should parse");

        match cli.command {
            Command::Listen(args) => {
                assert_eq!(args.serial.baud, 115_200);
                assert_eq!(args.serial.timeout, "250ms");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_ports_subcommand() {
        let cli = Cli::try_parse_from(["ambiframe", "--format", "json", "ports"])
            .expect("ports args should parse");
        assert!(matches!(cli.command, Command::Ports(_)));
    }
}
