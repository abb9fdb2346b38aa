//! Filter messages by date range and sender.
//!
//! This module provides [`FilterConfig`] for defining filter criteria and
//! [`apply_filters`] for filtering message collections.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Date from | [`with_date_from`](FilterConfig::with_date_from) | Messages on or after date |
//! | Date to | [`with_date_to`](FilterConfig::with_date_to) | Messages on or before date |
//! | Sender | [`with_sender`](FilterConfig::with_sender) | Messages from any of the given senders |
//!
//! # Examples
//!
//! ## Filter by Sender
//!
//! ```
//! use chatdoc::core::filter::{FilterConfig, apply_filters};
//! use chatdoc::parser::TranscriptParser;
//!
//! let transcript = TranscriptParser::new().parse_str("chat.txt", "\
//! [15/01/2024, 10:00:00] Alice: Hello
//! [15/01/2024, 10:01:00] Bob: Hi there
//! [15/01/2024, 10:02:00] ALICE: How are you?")?;
//!
//! // Case-insensitive sender matching
//! let config = FilterConfig::new().with_sender("alice");
//! let filtered = apply_filters(transcript.into_messages(), &config);
//!
//! assert_eq!(filtered.len(), 2);
//! # Ok::<(), chatdoc::ChatdocError>(())
//! ```
//!
//! ## Filter by Date Range
//!
//! ```
//! use chatdoc::core::filter::{FilterConfig, apply_filters};
//! use chatdoc::parser::TranscriptParser;
//!
//! let transcript = TranscriptParser::new().parse_str("chat.txt", "\
//! [01/01/2024, 12:00:00] Alice: Old
//! [15/06/2024, 12:00:00] Alice: New")?;
//!
//! let config = FilterConfig::new()
//!     .with_date_from("2024-06-01")?
//!     .with_date_to("2024-12-31")?;
//!
//! let filtered = apply_filters(transcript.into_messages(), &config);
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].content(), "New");
//! # Ok::<(), chatdoc::ChatdocError>(())
//! ```
//!
//! # Behavior Notes
//!
//! - Dates are compared against the message's *local* date, in the zone the
//!   transcript was parsed with
//! - Sender matching ignores case, including non-ASCII letters
//! - Several senders are alternatives; sender and date filters combine with AND

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Message;
use crate::error::{ChatdocError, Result};

/// Sender and date criteria, all optional.
///
/// ```
/// use chatdoc::core::filter::FilterConfig;
///
/// let family = FilterConfig::new().with_senders(["Mom", "Dad"]);
/// assert_eq!(family.senders, vec!["mom", "dad"]);
///
/// let january = FilterConfig::new().with_date_to("2024-01-31")?;
/// assert!(january.has_date_filter() && !january.has_sender_filter());
/// # Ok::<(), chatdoc::ChatdocError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Include only messages on or after this date.
    pub after: Option<NaiveDate>,

    /// Include only messages on or before this date.
    pub before: Option<NaiveDate>,

    /// Include only messages from one of these senders, stored lowercased.
    pub senders: Vec<String>,
}

impl FilterConfig {
    /// Creates a new empty filter configuration.
    ///
    /// No filters are active by default; all messages pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatdocError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self> {
        self.after = Some(parse_date(date_str)?);
        Ok(self)
    }

    /// Sets the end date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatdocError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self> {
        self.before = Some(parse_date(date_str)?);
        Ok(self)
    }

    /// Adds a sender. Messages from any added sender pass.
    ///
    /// ```
    /// use chatdoc::core::filter::FilterConfig;
    ///
    /// // Matches "Zoë", "zoë", "ZOË"
    /// let config = FilterConfig::new().with_sender("Zoë");
    /// assert_eq!(config.senders, vec!["zoë"]);
    /// ```
    #[must_use]
    pub fn with_sender(mut self, sender: impl AsRef<str>) -> Self {
        let sender = sender.as_ref().trim().to_lowercase();
        if !sender.is_empty() && !self.senders.contains(&sender) {
            self.senders.push(sender);
        }
        self
    }

    /// Adds several senders.
    #[must_use]
    pub fn with_senders<I, S>(self, senders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        senders.into_iter().fold(self, FilterConfig::with_sender)
    }

    /// Sets the start date directly.
    #[must_use]
    pub fn with_after(mut self, date: NaiveDate) -> Self {
        self.after = Some(date);
        self
    }

    /// Sets the end date directly.
    #[must_use]
    pub fn with_before(mut self, date: NaiveDate) -> Self {
        self.before = Some(date);
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.has_date_filter() || self.has_sender_filter()
    }

    /// Returns `true` if date filters are active.
    pub fn has_date_filter(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }

    /// Returns `true` if a sender filter is active.
    pub fn has_sender_filter(&self) -> bool {
        !self.senders.is_empty()
    }

    /// Returns `true` if `message` passes every active filter.
    pub fn matches(&self, message: &Message) -> bool {
        if self.has_sender_filter() {
            let sender = message.sender().to_lowercase();
            if !self.senders.contains(&sender) {
                return false;
            }
        }

        let date = message.timestamp().date_naive();
        if self.after.is_some_and(|after| date < after) {
            return false;
        }
        if self.before.is_some_and(|before| date > before) {
            return false;
        }

        true
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| ChatdocError::invalid_date(date_str))
}

/// Filters a collection of messages based on the provided configuration.
///
/// Returns only messages that match all active filters, in their original
/// order. If no filters are active, returns the input unchanged.
pub fn apply_filters(messages: Vec<Message>, config: &FilterConfig) -> Vec<Message> {
    if !config.is_active() {
        return messages;
    }

    messages
        .into_iter()
        .filter(|msg| config.matches(msg))
        .collect()
}
