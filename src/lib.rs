//! # chatdoc
//!
//! A Rust library for turning WhatsApp "Export chat" text files into clean,
//! validated transcripts and documents.
//!
//! ## Overview
//!
//! A WhatsApp export is a loosely formatted text file: one message opener per
//! line (`[date, time] Sender: text`), continuation lines for multi-line
//! messages, invisible direction marks, `<This message was edited>` suffixes,
//! media placeholders and system notices ("Alice added Bob"). chatdoc:
//!
//! - recognises both the 24-hour (`[15/01/2024, 10:30:00]`) and the 12-hour
//!   (`[1/15/24, 9:05:00 PM]`) export layouts,
//! - resolves timestamps against a caller-supplied UTC offset,
//! - folds continuation lines into the message they belong to,
//! - drops links, placeholders and system notices,
//! - accounts for every line (accepted, failed, filtered),
//! - writes plain text, a structured document, JSON, JSONL or CSV.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatdoc::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let export = "\
//! [15/01/2024, 10:30:00] Alice: Morning!
//! [15/01/2024, 10:31:12] Bob: Hi Alice
//! how was the trip?
//! [15/01/2024, 10:32:00] Alice: <Media omitted>";
//!
//!     let transcript = TranscriptParser::new().parse_str("chat.txt", export)?;
//!     assert_eq!(transcript.len(), 2);
//!     assert_eq!(transcript.metadata().filtered(), 1);
//!
//!     let text = to_text(transcript.messages(), &OutputConfig::new());
//!     assert!(text.contains("Bob: Hi Alice\n    how was the trip?"));
//!     Ok(())
//! }
//! ```
//!
//! ## Incremental exports
//!
//! Exports are cumulative. A [`Checkpoint`](core::Checkpoint) remembers the
//! content hash of everything already written so a later run emits only the
//! new messages:
//!
//! ```rust,no_run
//! use chatdoc::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let transcript = TranscriptParser::new().parse_file("chat.txt", &ReaderConfig::new())?;
//! let mut checkpoint = Checkpoint::load("chat.checkpoint.json")?;
//!
//! let fresh = checkpoint.retain_new(transcript.into_messages());
//! write_text(&fresh, "new.txt", &OutputConfig::new())?;
//! checkpoint.record(&fresh);
//! checkpoint.save()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`parser`] | [`TranscriptParser`](parser::TranscriptParser), the line state machine |
//! | [`parsing`] | Grammars, timestamp resolution, normalisation, noise classification |
//! | [`message`] | [`Message`] and its content-hash [`MessageId`](message::MessageId) |
//! | [`transcript`] | [`Transcript`] and [`ParseMetadata`](transcript::ParseMetadata) |
//! | [`reader`] | Line reading with retry on transient I/O errors |
//! | [`config`] | Parser, reader and output configuration |
//! | [`core`] | Filtering, checkpoints and output writers |
//! | [`format`] | [`OutputFormat`](format::OutputFormat) selection |
//! | [`error`] | [`ChatdocError`] and [`Result`] |
//! | `cli` | Command-line arguments (feature `cli`) |

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod message;
pub mod parser;
pub mod parsing;
pub mod reader;
pub mod transcript;

// Re-export the main types at the crate root for convenience
pub use error::{ChatdocError, Result};
pub use message::Message;
pub use transcript::Transcript;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatdoc::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Message;
    pub use crate::message::{MessageError, MessageId};
    pub use crate::transcript::{ParseMetadata, Transcript, TranscriptError};

    pub use crate::error::{ChatdocError, Result};

    pub use crate::parser::{FailureReason, TranscriptParser};

    pub use crate::config::{OutputConfig, ParserConfig, ReaderConfig, parse_utc_offset};

    pub use crate::core::checkpoint::Checkpoint;
    pub use crate::core::filter::{FilterConfig, apply_filters};

    pub use crate::core::output::{Document, Section, to_document, to_text, write_document, write_text};
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};

    pub use crate::format::{OutputFormat, to_format_string, write_to_format};
}
