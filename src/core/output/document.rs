//! Structured document model.
//!
//! A [`Document`] is the rich-text view of a transcript: a title followed by
//! a flat list of [`Section`]s. It is the shape handed to document services
//! and serializes to tagged JSON:
//!
//! ```json
//! {
//!   "title": "Family chat",
//!   "sections": [
//!     {"kind": "title", "text": "Family chat"},
//!     {"kind": "divider"},
//!     {"kind": "date_heading", "date": "2024-01-15"},
//!     {"kind": "entry", "time": "10:30:00", "sender": "Alice", "body": "Hi"}
//!   ]
//! }
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::text::push_indented;
use crate::Message;
use crate::config::OutputConfig;
use crate::error::Result;

/// Title used when [`OutputConfig::title`] is unset.
pub const DEFAULT_TITLE: &str = "Chat transcript";

/// One block of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    /// Document heading.
    Title {
        /// Heading text
        text: String,
    },
    /// Start of a new calendar day.
    DateHeading {
        /// Local date of the following entries
        date: NaiveDate,
    },
    /// One message.
    Entry {
        /// `HH:MM:SS`, or a full date and time when entries aren't grouped
        /// by day; absent when timestamps are disabled
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time: Option<String>,
        /// Author
        sender: String,
        /// Message text
        body: String,
    },
    /// Horizontal rule.
    Divider,
}

/// A transcript laid out as a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document title.
    pub title: String,
    /// Blocks in reading order.
    pub sections: Vec<Section>,
}

impl Document {
    /// Lays out `messages` according to `config`.
    ///
    /// The document opens with a [`Section::Title`] and a
    /// [`Section::Divider`]. With `group_by_date`, a [`Section::DateHeading`]
    /// precedes the first message of every new local day.
    ///
    /// ```
    /// use chatdoc::config::OutputConfig;
    /// use chatdoc::core::output::{Document, Section};
    /// use chatdoc::parser::TranscriptParser;
    ///
    /// let transcript = TranscriptParser::new().parse_str("chat.txt", "\
    /// [15/01/2024, 10:30:00] Alice: Hi
    /// [16/01/2024, 09:00:00] Bob: Morning")?;
    ///
    /// let doc = Document::from_messages(transcript.messages(), &OutputConfig::new().with_title("Chat"));
    /// let headings = doc.sections.iter().filter(|s| matches!(s, Section::DateHeading { .. })).count();
    /// assert_eq!(headings, 2);
    /// assert_eq!(doc.entry_count(), 2);
    /// # Ok::<(), chatdoc::ChatdocError>(())
    /// ```
    pub fn from_messages(messages: &[Message], config: &OutputConfig) -> Self {
        let title = config
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let mut sections = vec![
            Section::Title {
                text: title.clone(),
            },
            Section::Divider,
        ];

        let mut current_day = None;
        for msg in messages {
            let ts = msg.timestamp();
            if config.group_by_date {
                let day = ts.date_naive();
                if current_day != Some(day) {
                    sections.push(Section::DateHeading { date: day });
                    current_day = Some(day);
                }
            }

            let time = config.include_timestamps.then(|| {
                let pattern = if config.group_by_date {
                    "%H:%M:%S"
                } else {
                    "%Y-%m-%d %H:%M:%S"
                };
                ts.format(pattern).to_string()
            });

            sections.push(Section::Entry {
                time,
                sender: msg.sender().to_string(),
                body: msg.content().to_string(),
            });
        }

        Self { title, sections }
    }

    /// Returns the number of [`Section::Entry`] blocks.
    pub fn entry_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| matches!(s, Section::Entry { .. }))
            .count()
    }

    /// Renders the document as Markdown-flavored plain text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            match section {
                Section::Title { text } => {
                    let _ = writeln!(out, "# {text}\n");
                }
                Section::DateHeading { date } => {
                    let _ = writeln!(out, "\n## {}\n", date.format("%Y-%m-%d"));
                }
                Section::Entry { time, sender, body } => {
                    if let Some(time) = time {
                        let _ = write!(out, "[{time}] ");
                    }
                    out.push_str(sender);
                    out.push_str(": ");
                    push_indented(&mut out, body);
                    out.push('\n');
                }
                Section::Divider => out.push_str("---\n"),
            }
        }
        out
    }

    /// Serializes the document to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds the document for `messages` and returns it as JSON.
pub fn to_document(messages: &[Message], config: &OutputConfig) -> Result<String> {
    Document::from_messages(messages, config).to_json()
}

/// Builds the document for `messages` and writes it as JSON.
pub fn write_document(
    messages: &[Message],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    fs::write(output_path, to_document(messages, config)?)?;
    Ok(())
}
