//! The result of one parse pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Message;

/// Why deserialized counters don't describe a real parse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TranscriptError {
    /// More lines were accepted or failed than were read.
    #[error("accepted ({accepted}) plus failed ({failed}) exceeds total lines ({total_lines})")]
    CountsExceedLines {
        total_lines: usize,
        accepted: usize,
        failed: usize,
    },
    /// The accepted counter disagrees with the message list.
    #[error("metadata reports {accepted} accepted messages but {messages} are present")]
    MessageCountMismatch { accepted: usize, messages: usize },
}

/// Counters and provenance for a parse pass.
///
/// | Field | Description |
/// |-------|-------------|
/// | `source` | Identifier the caller gave for the input |
/// | `parsed_at` | When the pass finished (UTC) |
/// | `total_lines` | Raw lines consumed |
/// | `accepted` | Messages kept |
/// | `failed` | Lines that couldn't be turned into a message |
/// | `filtered` | Well-formed messages dropped as noise |
///
/// `total_lines >= accepted + failed` always holds. A filtered message
/// counts toward neither `accepted` nor `failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MetadataRecord")]
pub struct ParseMetadata {
    source: String,
    parsed_at: DateTime<Utc>,
    total_lines: usize,
    accepted: usize,
    failed: usize,
    filtered: usize,
}

#[derive(Deserialize)]
struct MetadataRecord {
    source: String,
    parsed_at: DateTime<Utc>,
    total_lines: usize,
    accepted: usize,
    failed: usize,
    filtered: usize,
}

impl TryFrom<MetadataRecord> for ParseMetadata {
    type Error = TranscriptError;

    fn try_from(record: MetadataRecord) -> Result<Self, Self::Error> {
        let MetadataRecord {
            source,
            parsed_at,
            total_lines,
            accepted,
            failed,
            filtered,
        } = record;
        if accepted.saturating_add(failed) > total_lines {
            return Err(TranscriptError::CountsExceedLines {
                total_lines,
                accepted,
                failed,
            });
        }
        Ok(Self::new(source, parsed_at, total_lines, accepted, failed, filtered))
    }
}

impl ParseMetadata {
    pub(crate) fn new(
        source: String,
        parsed_at: DateTime<Utc>,
        total_lines: usize,
        accepted: usize,
        failed: usize,
        filtered: usize,
    ) -> Self {
        Self {
            source,
            parsed_at,
            total_lines,
            accepted,
            failed,
            filtered,
        }
    }

    /// Returns the source identifier.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns when the pass finished.
    pub fn parsed_at(&self) -> DateTime<Utc> {
        self.parsed_at
    }

    /// Returns the number of raw lines consumed.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Returns the number of accepted messages.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Returns the number of failed lines.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Returns the number of messages dropped as noise.
    pub fn filtered(&self) -> usize {
        self.filtered
    }
}

/// Ordered messages of one source plus its [`ParseMetadata`].
///
/// Messages keep source order; nothing is sorted or de-duplicated. A
/// transcript can't be modified once built.
///
/// # Example
///
/// ```
/// use chatdoc::parser::TranscriptParser;
///
/// let transcript = TranscriptParser::new().parse_str(
///     "chat.txt",
///     "[15/01/2024, 10:30:00] Alice: Hi\n[15/01/2024, 10:31:00] Bob: Hello",
/// )?;
///
/// assert_eq!(transcript.len(), 2);
/// assert_eq!(transcript.metadata().accepted(), 2);
/// assert_eq!(transcript.messages()[1].sender(), "Bob");
/// # Ok::<(), chatdoc::ChatdocError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TranscriptRecord")]
pub struct Transcript {
    messages: Vec<Message>,
    metadata: ParseMetadata,
}

#[derive(Deserialize)]
struct TranscriptRecord {
    messages: Vec<Message>,
    metadata: ParseMetadata,
}

impl TryFrom<TranscriptRecord> for Transcript {
    type Error = TranscriptError;

    fn try_from(record: TranscriptRecord) -> Result<Self, Self::Error> {
        if record.messages.len() != record.metadata.accepted {
            return Err(TranscriptError::MessageCountMismatch {
                accepted: record.metadata.accepted,
                messages: record.messages.len(),
            });
        }
        Ok(Self::new(record.messages, record.metadata))
    }
}

impl Transcript {
    pub(crate) fn new(messages: Vec<Message>, metadata: ParseMetadata) -> Self {
        debug_assert_eq!(messages.len(), metadata.accepted);
        Self { messages, metadata }
    }

    /// Returns the messages in source order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the pass metadata.
    pub fn metadata(&self) -> &ParseMetadata {
        &self.metadata
    }

    /// Returns the number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if no message was accepted.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Consumes the transcript, returning its messages.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    /// Splits the transcript into messages and metadata.
    pub fn into_parts(self) -> (Vec<Message>, ParseMetadata) {
        (self.messages, self.metadata)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
