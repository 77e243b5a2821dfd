use crate::cmd::PortsArgs;
use crate::exit::{serial_error, CliResult, SUCCESS};
use crate::output::{print_ports, OutputFormat};

pub fn run(_args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let ports = serialport::available_ports()
        .map_err(|err| serial_error("serial port discovery failed", err))?;

    tracing::debug!(count = ports.len(), "serial ports discovered");
    print_ports(&ports, format);
    Ok(SUCCESS)
}
