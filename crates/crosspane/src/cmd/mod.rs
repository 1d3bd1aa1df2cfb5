use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod capabilities;
pub mod decode;
pub mod demo;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a message to its wire payload.
    Encode(EncodeArgs),
    /// Decode a wire payload and print the message.
    Decode(DecodeArgs),
    /// Run a scripted parent/pane exchange over the in-process transport.
    Demo(DemoArgs),
    /// List the capabilities of the built-in handler catalog.
    Capabilities(CapabilitiesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Demo(args) => demo::run(args, format),
        Command::Capabilities(args) => capabilities::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Message type tag (the single top-level key).
    #[arg(long, short = 'k')]
    pub kind: String,
    /// JSON content.
    #[arg(long, conflicts_with = "text")]
    pub json: Option<String>,
    /// Plain string content.
    #[arg(long, conflicts_with = "json")]
    pub text: Option<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Payload to decode. Reads stdin when omitted and --file is not set.
    pub payload: Option<String>,
    /// Read the payload from a file.
    #[arg(long, conflicts_with = "payload")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Origin of the parent context.
    #[arg(long, default_value = "https://app.example")]
    pub parent_origin: String,
    /// Origin of the embedded pane context.
    #[arg(long, default_value = "https://pane.example")]
    pub pane_origin: String,
    /// Trust only the exact peer origin instead of the wildcard.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug, Default)]
pub struct CapabilitiesArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
