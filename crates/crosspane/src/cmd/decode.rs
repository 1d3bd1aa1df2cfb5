use std::io::Read;

use crosspane_codec::decode_message;

use crate::cmd::DecodeArgs;
use crate::exit::{codec_error, io_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let message =
        decode_message(payload.trim()).map_err(|err| codec_error("decode failed", err))?;
    print_message(&message, payload.len(), format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &DecodeArgs) -> CliResult<String> {
    if let Some(payload) = &args.payload {
        return Ok(payload.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(buffer)
}
