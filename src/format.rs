//! Output format selection.
//!
//! This module provides library-first format types that don't depend on CLI
//! frameworks.
//!
//! # Example
//!
//! ```rust
//! # fn example() -> chatdoc::Result<()> {
//! use chatdoc::config::OutputConfig;
//! use chatdoc::format::{OutputFormat, to_format_string};
//! use chatdoc::parser::TranscriptParser;
//!
//! let transcript = TranscriptParser::new()
//!     .parse_str("chat.txt", "[15/01/2024, 10:30:00] Alice: Hello!")?;
//!
//! let text = to_format_string(transcript.messages(), OutputFormat::Text, &OutputConfig::new())?;
//! assert_eq!(text, "[2024-01-15 10:30:00] Alice: Hello!\n");
//!
//! // Or use format detection from extension
//! let format = OutputFormat::from_path("output.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::config::OutputConfig;
use crate::core::output;
use crate::error::{ChatdocError, Result};

/// Output format for transcripts.
///
/// # Example
///
/// ```rust
/// use chatdoc::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("doc").unwrap();
/// assert_eq!(format, OutputFormat::Document);
/// assert_eq!(format.extension(), "document.json");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Plain text, one block per message (default)
    #[default]
    Text,

    /// Structured document model as JSON
    ///
    /// Title, per-day headings and entries; see
    /// [`Document`](crate::core::output::Document).
    Document,

    /// JSON array of messages
    Json,

    /// JSON Lines - one JSON object per line
    ///
    /// Also known as NDJSON.
    Jsonl,

    /// CSV with semicolon delimiter
    Csv,
}

impl OutputFormat {
    /// Returns the file extension for this format (without leading dot).
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatdoc::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Text.extension(), "txt");
    /// assert_eq!(OutputFormat::Csv.extension(), "csv");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Document => "document.json",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Csv => "csv",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["text", "txt", "document", "doc", "json", "jsonl", "ndjson", "csv"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Text,
            OutputFormat::Document,
            OutputFormat::Json,
            OutputFormat::Jsonl,
            OutputFormat::Csv,
        ]
    }

    /// Returns the cargo feature this format needs, if any.
    pub fn required_feature(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Text | OutputFormat::Document => None,
            OutputFormat::Json | OutputFormat::Jsonl => Some("json-output"),
            OutputFormat::Csv => Some("csv-output"),
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// `*.document.json` selects [`Document`](OutputFormat::Document);
    /// any other `*.json` selects [`Json`](OutputFormat::Json).
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatdoc::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out.txt").unwrap(), OutputFormat::Text);
    /// assert_eq!(OutputFormat::from_path("out.document.json").unwrap(), OutputFormat::Document);
    /// assert_eq!(OutputFormat::from_path("out.json").unwrap(), OutputFormat::Json);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.ends_with(".document.json") {
            return Ok(OutputFormat::Document);
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" | "text" | "md" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ChatdocError::invalid_format(
                "output",
                format!(
                    "Unknown file extension: '.{}'. Expected one of: txt, document.json, json, jsonl, csv",
                    ext
                ),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "Text"),
            OutputFormat::Document => write!(f, "Document"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "document" | "doc" => Ok(OutputFormat::Document),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

fn feature_disabled(format: OutputFormat) -> ChatdocError {
    ChatdocError::invalid_format(
        "output",
        format!(
            "Output format {} requires the '{}' feature to be enabled",
            format,
            format.required_feature().unwrap_or_default()
        ),
    )
}

/// Writes messages to a file in the specified format.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_to_format(
    messages: &[Message],
    path: impl AsRef<Path>,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<()> {
    let path = path.as_ref();
    match format {
        OutputFormat::Text => output::write_text(messages, path, config),
        OutputFormat::Document => output::write_document(messages, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => output::write_json(messages, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => output::write_jsonl(messages, path, config),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => output::write_csv(messages, path, config),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}

/// Converts messages to a string in the specified format.
#[allow(unused_variables)]
pub fn to_format_string(
    messages: &[Message],
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(output::to_text(messages, config)),
        OutputFormat::Document => output::to_document(messages, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => output::to_json(messages, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => output::to_jsonl(messages, config),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => output::to_csv(messages, config),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}
