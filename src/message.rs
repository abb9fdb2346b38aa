//! Validated chat message type.
//!
//! This module provides [`Message`], the unit of output produced by the
//! transcript parser. A message always has a timestamp, a non-empty sender and
//! non-empty content; [`Message::new`] enforces this, so every `Message` you
//! hold is valid.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```
//! use chatdoc::Message;
//! use chrono::{FixedOffset, TimeZone};
//!
//! let ts = FixedOffset::east_opt(0)
//!     .unwrap()
//!     .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
//!     .unwrap();
//! let msg = Message::new(ts, "Alice", "Hello, world!")?;
//! assert_eq!(msg.sender(), "Alice");
//! assert_eq!(msg.content(), "Hello, world!");
//! # Ok::<(), chatdoc::message::MessageError>(())
//! ```
//!
//! ## Rejected Messages
//!
//! ```
//! use chatdoc::Message;
//! use chatdoc::message::MessageError;
//! use chrono::{FixedOffset, TimeZone};
//!
//! let ts = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
//! assert_eq!(Message::new(ts, "  ", "Hi"), Err(MessageError::EmptySender));
//! assert_eq!(Message::new(ts, "Bob", ""), Err(MessageError::EmptyContent));
//! ```
//!
//! ## Serialization
//!
//! ```
//! use chatdoc::Message;
//! use chrono::{FixedOffset, TimeZone};
//!
//! let ts = FixedOffset::east_opt(3600).unwrap().with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
//! let msg = Message::new(ts, "Alice", "Hello!")?;
//! let json = serde_json::to_string(&msg)?;
//! assert!(json.contains("2024-01-15T10:30:00+01:00"));
//!
//! let parsed: Message = serde_json::from_str(&json)?;
//! assert_eq!(msg, parsed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Why a [`Message`] could not be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Sender is empty or whitespace-only.
    #[error("message sender is empty")]
    EmptySender,
    /// Content is empty or whitespace-only.
    #[error("message content is empty")]
    EmptyContent,
}

/// A single chat message recovered from a transcript.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `DateTime<FixedOffset>` | When the message was sent, in the export's zone |
/// | `sender` | `String` | Display name of the author, trimmed |
/// | `content` | `String` | Message text; may contain newlines |
///
/// Fields are private: a message is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MessageRecord")]
pub struct Message {
    timestamp: DateTime<FixedOffset>,
    sender: String,
    content: String,
}

/// Unvalidated shape used for deserialization.
#[derive(Deserialize)]
struct MessageRecord {
    timestamp: DateTime<FixedOffset>,
    sender: String,
    content: String,
}

impl TryFrom<MessageRecord> for Message {
    type Error = MessageError;

    fn try_from(record: MessageRecord) -> Result<Self, Self::Error> {
        Message::new(record.timestamp, record.sender, record.content)
    }
}

impl Message {
    /// Creates a message, rejecting an empty sender or empty content.
    ///
    /// The sender is trimmed. Content is stored as given, internal line
    /// breaks included.
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, MessageError> {
        let sender: String = sender.into();
        let sender = sender.trim();
        if sender.is_empty() {
            return Err(MessageError::EmptySender);
        }

        let content: String = content.into();
        if content.trim().is_empty() {
            return Err(MessageError::EmptyContent);
        }

        Ok(Self {
            timestamp,
            sender: sender.to_string(),
            content,
        })
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the number of lines in the content.
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Returns the content-hash identity of this message.
    ///
    /// Derived from the timestamp and content only, so the same message
    /// exported twice gets the same id.
    pub fn id(&self) -> MessageId {
        MessageId::compute(self.timestamp, &self.content)
    }
}

/// Stable identity of a message: lowercase hex SHA-256 over its RFC 3339
/// timestamp, a newline, and its content.
///
/// # Example
///
/// ```
/// use chatdoc::Message;
/// use chrono::{FixedOffset, TimeZone};
///
/// let ts = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// let a = Message::new(ts, "Alice", "Hi")?;
/// let b = Message::new(ts, "alice", "Hi")?;
/// assert_eq!(a.id(), b.id());
/// assert_eq!(a.id().as_str().len(), 64);
/// # Ok::<(), chatdoc::message::MessageError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    fn compute(timestamp: DateTime<FixedOffset>, content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(timestamp.to_rfc3339_opts(SecondsFormat::Secs, false).as_bytes());
        hasher.update(b"\n");
        hasher.update(content.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Returns the hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MessageId {
    fn from(hex: String) -> Self {
        Self(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 15, hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_message_new() {
        let msg = Message::new(ts(12), "Alice", "Hello").unwrap();
        assert_eq!(msg.sender(), "Alice");
        assert_eq!(msg.content(), "Hello");
        assert_eq!(msg.timestamp(), ts(12));
    }

    #[test]
    fn test_sender_is_trimmed() {
        let msg = Message::new(ts(12), "  Alice \t", "Hello").unwrap();
        assert_eq!(msg.sender(), "Alice");
    }

    #[test]
    fn test_rejects_empty_fields() {
        assert_eq!(Message::new(ts(12), "", "Hi"), Err(MessageError::EmptySender));
        assert_eq!(Message::new(ts(12), "Bob", "  \n "), Err(MessageError::EmptyContent));
    }

    #[test]
    fn test_content_keeps_line_breaks() {
        let msg = Message::new(ts(12), "Alice", "Line 1\nLine 2").unwrap();
        assert_eq!(msg.content(), "Line 1\nLine 2");
        assert_eq!(msg.line_count(), 2);
    }

    #[test]
    fn test_id_depends_on_timestamp_and_content() {
        let a = Message::new(ts(12), "Alice", "Hello").unwrap();
        let same = Message::new(ts(12), "Bob", "Hello").unwrap();
        let later = Message::new(ts(13), "Alice", "Hello").unwrap();
        let other = Message::new(ts(12), "Alice", "Hello!").unwrap();

        assert_eq!(a.id(), same.id());
        assert_ne!(a.id(), later.id());
        assert_ne!(a.id(), other.id());
    }

    #[test]
    fn test_id_is_hex_sha256() {
        let id = Message::new(ts(12), "Alice", "Hello").unwrap().id();
        assert_eq!(id.as_str().len(), 64);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::new(ts(12), "Alice", "Hello").unwrap();
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"sender\":\"Alice\""));
        assert!(json.contains("2024-06-15T12:00:00+00:00"));
    }

    #[test]
    fn test_deserialization_validates() {
        let json = r#"{"timestamp":"2024-06-15T12:00:00+02:00","sender":"Bob","content":"Hi"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sender(), "Bob");
        assert_eq!(msg.timestamp().offset().local_minus_utc(), 7200);

        let empty = r#"{"timestamp":"2024-06-15T12:00:00+02:00","sender":"Bob","content":""}"#;
        assert!(serde_json::from_str::<Message>(empty).is_err());
    }
}
