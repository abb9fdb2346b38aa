//! Output format writers.
//!
//! This module provides writers for different output formats:
//! - [`write_text`] / [`to_text`] - plain text, one block per message
//! - [`write_document`] / [`to_document`] - structured [`Document`] as JSON
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array of messages - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines (one JSON per line) - requires `json-output` feature
//!
//! # Choosing a Format
//!
//! | Format | Use Case |
//! |--------|----------|
//! | Text | Reading, pasting into a prompt |
//! | Document | Feeding a rich-text document service |
//! | CSV | Spreadsheets, compact LLM context |
//! | JSON | Structured data, APIs |
//! | JSONL | Indexing pipelines, streaming |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatdoc::Result<()> {
//! use chatdoc::config::OutputConfig;
//! use chatdoc::core::output::{to_csv, write_document, write_json, write_text};
//! use chatdoc::parser::TranscriptParser;
//!
//! let transcript = TranscriptParser::new()
//!     .parse_str("chat.txt", "[15/01/2024, 10:30:00] Alice: Hello!")?;
//! let messages = transcript.messages();
//! let config = OutputConfig::new().with_title("Chat");
//!
//! // Write to files
//! write_text(messages, "output.txt", &config)?;
//! write_json(messages, "output.json", &config)?;
//! write_document(messages, "output.document.json", &config)?;
//!
//! // Or get as strings
//! let csv_string = to_csv(messages, &config)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod document;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;
#[cfg(feature = "json-output")]
mod record;
mod text;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
pub use document::{DEFAULT_TITLE, Document, Section, to_document, write_document};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};
pub use text::{CONTINUATION_INDENT, to_text, write_text};
