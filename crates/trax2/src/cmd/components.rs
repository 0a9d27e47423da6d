use crate::cmd::ComponentsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_components, OutputFormat};

pub fn run(_args: ComponentsArgs, format: OutputFormat) -> CliResult<i32> {
    print_components(format);
    Ok(SUCCESS)
}
