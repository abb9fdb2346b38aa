//! JSON output writer.

use std::fs;
use std::path::Path;

use super::record::OutputRecord;
use crate::Message;
use crate::config::OutputConfig;
use crate::error::Result;

/// Writes messages to a JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {"timestamp": "2024-01-15T10:30:00+00:00", "sender": "Alice", "content": "Hello"},
///   {"timestamp": "2024-01-15T10:31:00+00:00", "sender": "Bob", "content": "Hi"}
/// ]
/// ```
pub fn write_json(
    messages: &[Message],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let json = to_json(messages, config)?;
    fs::write(output_path, json)?;
    Ok(())
}

/// Converts messages to a pretty-printed JSON array.
///
/// Same format as [`write_json`], but returns a String instead of writing
/// to a file.
pub fn to_json(messages: &[Message], config: &OutputConfig) -> Result<String> {
    let records: Vec<OutputRecord<'_>> = messages
        .iter()
        .map(|m| OutputRecord::new(m, config))
        .collect();

    Ok(serde_json::to_string_pretty(&records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use tempfile::NamedTempFile;

    fn messages() -> Vec<Message> {
        let ts = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 15, 12, 30, 0)
            .unwrap();
        vec![
            Message::new(ts, "Alice", "Hello").unwrap(),
            Message::new(ts, "Bob", "Hi").unwrap(),
        ]
    }

    #[test]
    fn test_to_json_basic() {
        let config = OutputConfig::new().with_timestamps(false);
        let json = to_json(&messages(), &config).unwrap();

        assert!(json.contains(r#""sender": "Alice""#));
        assert!(json.contains(r#""content": "Hello""#));
        assert!(!json.contains("timestamp"));
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn test_to_json_with_metadata() {
        let config = OutputConfig::new().with_ids(true);
        let json = to_json(&messages(), &config).unwrap();

        assert!(json.contains(r#""timestamp": "2024-06-15T12:30:00+01:00""#));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["id"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_write_json() {
        let temp_file = NamedTempFile::new().unwrap();
        write_json(&messages(), temp_file.path(), &OutputConfig::new()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["sender"], "Bob");
    }

    #[test]
    fn test_to_json_empty() {
        assert_eq!(to_json(&[], &OutputConfig::new()).unwrap(), "[]");
    }
}
