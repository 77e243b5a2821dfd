use std::io::Read;

use ambiframe_frame::decode_frame;

use crate::cmd::{open_input, DecodeArgs};
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut input = open_input(&args.path)?;
    let mut wire = Vec::new();
    input
        .read_to_end(&mut wire)
        .map_err(|err| io_error(&format!("failed reading {}", args.path.display()), err))?;

    tracing::debug!(bytes = wire.len(), "decoding frame");
    let frame = decode_frame(&wire).map_err(|err| frame_error("decode failed", err))?;

    print_frame(&frame, format).map_err(|err| io_error("failed writing output", err))?;
    Ok(SUCCESS)
}
