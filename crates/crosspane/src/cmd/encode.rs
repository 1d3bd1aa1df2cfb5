use crosspane_codec::{encode_message, Message};
use serde_json::Value;

use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_raw, OutputFormat};

pub fn run(args: EncodeArgs, _format: OutputFormat) -> CliResult<i32> {
    let content = resolve_content(&args)?;
    let message = Message::new(&args.kind, content);
    let payload = encode_message(&message).map_err(|err| codec_error("encode failed", err))?;
    print_raw(payload.as_bytes());
    Ok(SUCCESS)
}

fn resolve_content(args: &EncodeArgs) -> CliResult<Value> {
    if let Some(json) = &args.json {
        return serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")));
    }
    if let Some(text) = &args.text {
        return Ok(Value::String(text.clone()));
    }
    Ok(Value::String(String::new()))
}
