//! CSV output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::Message;
use crate::config::OutputConfig;
use crate::error::Result;

/// Writes messages to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: depend on `OutputConfig`
///   - Basic: `Sender`, `Content`
///   - With timestamps: `Timestamp`, `Sender`, `Content`
///   - With IDs: `ID`, then the above
/// - Encoding: UTF-8
pub fn write_csv(
    messages: &[Message],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(file, messages, config)
}

/// Converts messages to a CSV string with the same layout as [`write_csv`].
pub fn to_csv(messages: &[Message], config: &OutputConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, messages, config)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_records<W: Write>(output: W, messages: &[Message], config: &OutputConfig) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(output);

    writer.write_record(build_header(config))?;
    for msg in messages {
        writer.write_record(build_record(msg, config))?;
    }

    writer.flush()?;
    Ok(())
}

/// Build CSV header based on output configuration.
fn build_header(config: &OutputConfig) -> Vec<&'static str> {
    let mut header = Vec::new();

    if config.include_ids {
        header.push("ID");
    }
    if config.include_timestamps {
        header.push("Timestamp");
    }

    header.push("Sender");
    header.push("Content");
    header
}

/// Build CSV record for a single message.
fn build_record(msg: &Message, config: &OutputConfig) -> Vec<String> {
    let mut record = Vec::new();

    if config.include_ids {
        record.push(msg.id().to_string());
    }
    if config.include_timestamps {
        record.push(msg.timestamp().format("%Y-%m-%d %H:%M:%S").to_string());
    }

    record.push(msg.sender().to_string());
    record.push(msg.content().to_string());
    record
}
