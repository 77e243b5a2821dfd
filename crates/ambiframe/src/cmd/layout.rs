use crate::cmd::LayoutArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_layout, OutputFormat};

pub fn run(_args: LayoutArgs, format: OutputFormat) -> CliResult<i32> {
    print_layout(format);
    Ok(SUCCESS)
}
