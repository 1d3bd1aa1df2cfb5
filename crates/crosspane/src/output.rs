use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use crosspane_codec::Message;
use crosspane_peer::CONTROL_SCHEMA;
use crosspane_schema::SchemaEntry;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    message_type: &'a str,
    content: &'a serde_json::Value,
    payload_size: usize,
}

pub fn print_message(message: &Message, payload_size: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                message_type: message.kind(),
                content: message.content(),
                payload_size,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            // Schema announcements get the entry-per-row treatment.
            if let Some(entries) = schema_entries(message) {
                print_schema_table(&entries);
                return;
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "SIZE", "CONTENT"])
                .add_row(vec![
                    message.kind().to_string(),
                    payload_size.to_string(),
                    message.content_text().to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "type={} size={} content={}",
                message.kind(),
                payload_size,
                message.content_text()
            );
        }
        OutputFormat::Raw => {
            print_raw(message.content_text().as_bytes());
        }
    }
}

/// Schema entries carried by a `schema` announcement, if that is what the
/// message is.
pub fn schema_entries(message: &Message) -> Option<Vec<SchemaEntry>> {
    if message.kind() != CONTROL_SCHEMA {
        return None;
    }
    serde_json::from_value(message.content().clone()).ok()
}

pub fn print_schema_table(entries: &[SchemaEntry]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["MESSAGE TYPE", "FUNCTION"]);
    for entry in entries {
        let function = match entry.function.as_str() {
            Some(text) => text.to_string(),
            None => entry.function.to_string(),
        };
        table.add_row(vec![entry.message_type.clone(), function]);
    }
    println!("{table}");
}

pub fn print_capabilities(names: &[&str], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&serde_json::json!({ "capabilities": names }))
                    .unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CAPABILITY"]);
            for name in names {
                table.add_row(vec![name.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for name in names {
                println!("{name}");
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.write_all(b"\n");
    let _ = out.flush();
}
