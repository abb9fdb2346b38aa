//! JSON Lines (JSONL) output writer.
//!
//! One JSON object per line; handy for indexing pipelines that ingest
//! messages one record at a time.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::record::OutputRecord;
use crate::Message;
use crate::config::OutputConfig;
use crate::error::Result;

/// Writes messages to JSONL (JSON Lines) format.
///
/// Each line is a valid JSON object:
/// ```jsonl
/// {"timestamp":"2024-01-15T10:30:00+00:00","sender":"Alice","content":"Hello"}
/// {"timestamp":"2024-01-15T10:31:00+00:00","sender":"Bob","content":"Hi"}
/// ```
pub fn write_jsonl(
    messages: &[Message],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, messages, config)?;
    writer.flush()?;
    Ok(())
}

/// Converts messages to a JSONL string.
pub fn to_jsonl(messages: &[Message], config: &OutputConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, messages, config)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_records<W: Write>(writer: &mut W, messages: &[Message], config: &OutputConfig) -> Result<()> {
    for msg in messages {
        serde_json::to_writer(&mut *writer, &OutputRecord::new(msg, config))?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
