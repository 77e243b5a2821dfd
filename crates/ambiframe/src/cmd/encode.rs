use crate::cmd::{resolve_frame, EncodeArgs};
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = resolve_frame(&args.colors)?;
    let wire = frame.encode();

    match &args.output {
        Some(path) => {
            std::fs::write(path, &wire)
                .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?;
            tracing::info!(path = %path.display(), bytes = wire.len(), "frame written");
        }
        None => print_encoded(&wire, format)
            .map_err(|err| io_error("failed writing output", err))?,
    }

    Ok(SUCCESS)
}
