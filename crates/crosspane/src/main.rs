mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "crosspane", version, about = "Two-context messaging CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
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
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "crosspane",
            "encode",
            "--kind",
            "ping",
            "--text",
            "hello",
        ])
        .expect("encode args should parse");

        assert!(matches!(cli.command, Command::Encode(_)));
    }

    #[test]
    fn rejects_conflicting_content_args() {
        let err = Cli::try_parse_from([
            "crosspane",
            "encode",
            "--kind",
            "ping",
            "--json",
            "{\"x\":1}",
            "--text",
            "hello",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_demo_subcommand() {
        let cli = Cli::try_parse_from(["crosspane", "demo", "--strict"])
            .expect("demo args should parse");
        match cli.command {
            Command::Demo(args) => assert!(args.strict),
            other => panic!("expected demo, got {other:?}"),
        }
    }

    #[test]
    fn parses_decode_with_inline_payload() {
        let cli = Cli::try_parse_from(["crosspane", "decode", "{\"ping\":\"x\"}"])
            .expect("decode args should parse");
        assert!(matches!(cli.command, Command::Decode(_)));
    }
}
