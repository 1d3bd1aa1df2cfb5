use crosspane_schema::HandlerCatalog;

use crate::cmd::CapabilitiesArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_capabilities, OutputFormat};

pub fn run(_args: CapabilitiesArgs, format: OutputFormat) -> CliResult<i32> {
    let catalog = HandlerCatalog::new();
    print_capabilities(&catalog.names(), format);
    Ok(SUCCESS)
}
