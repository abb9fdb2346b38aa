//! Configuration types for parsing, reading and output.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies. Each one is a builder with a
//! sensible [`Default`] and is serde-serializable, so it can be stored next
//! to a checkpoint or loaded from a settings file.
//!
//! - [`ParserConfig`] - zone offset and noise handling for the parser
//! - [`ReaderConfig`] - retry behavior of the line reader
//! - [`OutputConfig`] - what the formatters include
//!
//! # Example
//!
//! ```rust
//! use chatdoc::config::{ParserConfig, parse_utc_offset};
//! use chatdoc::parser::TranscriptParser;
//!
//! let config = ParserConfig::new()
//!     .with_utc_offset(parse_utc_offset("+05:30")?)
//!     .with_skip_noise(true);
//!
//! let parser = TranscriptParser::with_config(config);
//! # Ok::<(), chatdoc::ChatdocError>(())
//! ```

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChatdocError, Result};

/// Configuration for [`TranscriptParser`](crate::parser::TranscriptParser).
///
/// # Example
///
/// ```rust
/// use chatdoc::config::ParserConfig;
/// use chrono::FixedOffset;
///
/// let config = ParserConfig::new()
///     .with_utc_offset(FixedOffset::west_opt(8 * 3600).unwrap());
/// assert_eq!(config.utc_offset_seconds, -8 * 3600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Zone the export was written in, seconds east of UTC (default: 0)
    pub utc_offset_seconds: i32,

    /// Drop links, placeholders and system notices (default: true)
    pub skip_noise: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            utc_offset_seconds: 0,
            skip_noise: true,
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the zone the export's timestamps are interpreted in.
    #[must_use]
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset_seconds = offset.local_minus_utc();
        self
    }

    /// Sets whether noise is dropped. With `false` every well-formed
    /// message is accepted, links and notices included.
    #[must_use]
    pub fn with_skip_noise(mut self, skip: bool) -> Self {
        self.skip_noise = skip;
        self
    }

    /// Returns the configured zone. An out-of-range value (only possible
    /// through deserialization) falls back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix())
    }
}

/// Configuration for [`read_lines`](crate::reader::read_lines).
///
/// # Example
///
/// ```rust
/// use chatdoc::config::ReaderConfig;
///
/// let config = ReaderConfig::new().with_max_attempts(5).with_initial_backoff_ms(10);
/// assert_eq!(config.backoff_for(3).as_millis(), 40);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Total read attempts, first try included (default: 3)
    pub max_attempts: u32,

    /// Wait before the first retry, doubled after each one (default: 100ms)
    pub initial_backoff_ms: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 100,
        }
    }
}

impl ReaderConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total number of attempts. Zero is treated as one.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the wait before the first retry.
    #[must_use]
    pub fn with_initial_backoff_ms(mut self, millis: u64) -> Self {
        self.initial_backoff_ms = millis;
        self
    }

    /// Returns the wait after failed attempt number `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor))
    }
}

/// Configuration for output formatting.
///
/// Controls which fields the writers include and how the document view
/// is laid out.
///
/// # Example
///
/// ```rust
/// use chatdoc::config::OutputConfig;
///
/// let config = OutputConfig::new()
///     .with_title("Family chat")
///     .with_timestamps(false);
/// assert!(!config.include_timestamps);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Include timestamps in output (default: true)
    pub include_timestamps: bool,

    /// Include content-hash ids in structured output (default: false)
    pub include_ids: bool,

    /// Insert a heading before each new day in document output (default: true)
    pub group_by_date: bool,

    /// Document title; [`DEFAULT_TITLE`](crate::core::output::DEFAULT_TITLE) when absent
    pub title: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_timestamps: true,
            include_ids: false,
            group_by_date: true,
            title: None,
        }
    }
}

impl OutputConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether timestamps are written.
    #[must_use]
    pub fn with_timestamps(mut self, include: bool) -> Self {
        self.include_timestamps = include;
        self
    }

    /// Sets whether message ids are written.
    #[must_use]
    pub fn with_ids(mut self, include: bool) -> Self {
        self.include_ids = include;
        self
    }

    /// Sets whether document output is split by day.
    #[must_use]
    pub fn with_group_by_date(mut self, group: bool) -> Self {
        self.group_by_date = group;
        self
    }

    /// Sets the document title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Parses a fixed UTC offset such as `+05:30`, `-0800`, `+02`, `Z` or `UTC`.
///
/// # Example
///
/// ```rust
/// use chatdoc::config::parse_utc_offset;
///
/// assert_eq!(parse_utc_offset("+05:30")?.local_minus_utc(), 19_800);
/// assert_eq!(parse_utc_offset("-0800")?.local_minus_utc(), -28_800);
/// assert_eq!(parse_utc_offset("UTC")?.local_minus_utc(), 0);
/// assert!(parse_utc_offset("+25:00").is_err());
/// # Ok::<(), chatdoc::ChatdocError>(())
/// ```
pub fn parse_utc_offset(input: &str) -> Result<FixedOffset> {
    let text = input.trim();
    if text.eq_ignore_ascii_case("z") || text.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let err = || ChatdocError::invalid_offset(input);

    let (sign, rest) = match text.as_bytes().first() {
        Some(b'+') => (1, &text[1..]),
        Some(b'-') => (-1, &text[1..]),
        _ => return Err(err()),
    };
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return Err(err());
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) if m.len() == 2 => (h, m),
        Some(_) => return Err(err()),
        None if rest.len() == 4 => rest.split_at(2),
        None if rest.len() <= 2 => (rest, "00"),
        None => return Err(err()),
    };
    if hours.is_empty() || hours.len() > 2 {
        return Err(err());
    }

    let hours: i32 = hours.parse().map_err(|_| err())?;
    let minutes: i32 = minutes.parse().map_err(|_| err())?;
    if hours > 23 || minutes > 59 {
        return Err(err());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_default() {
        let config = ParserConfig::default();
        assert_eq!(config.utc_offset_seconds, 0);
        assert!(config.skip_noise);
        assert_eq!(config.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parser_config_builder() {
        let config = ParserConfig::new()
            .with_utc_offset(FixedOffset::east_opt(3600).unwrap())
            .with_skip_noise(false);

        assert_eq!(config.offset().local_minus_utc(), 3600);
        assert!(!config.skip_noise);
    }

    #[test]
    fn test_parser_config_out_of_range_offset_falls_back() {
        let config = ParserConfig {
            utc_offset_seconds: 200_000,
            skip_noise: true,
        };
        assert_eq!(config.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parser_config_deserialize_partial() {
        let config: ParserConfig = serde_json::from_str(r#"{"skip_noise":false}"#).unwrap();
        assert!(!config.skip_noise);
        assert_eq!(config.utc_offset_seconds, 0);
    }

    #[test]
    fn test_reader_config_backoff() {
        let config = ReaderConfig::new().with_initial_backoff_ms(50);
        assert_eq!(config.backoff_for(1), Duration::from_millis(50));
        assert_eq!(config.backoff_for(2), Duration::from_millis(100));
        assert_eq!(config.backoff_for(3), Duration::from_millis(200));
    }

    #[test]
    fn test_reader_config_backoff_saturates() {
        let config = ReaderConfig::new().with_initial_backoff_ms(u64::MAX);
        assert_eq!(config.backoff_for(80), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_output_config_default() {
        let config = OutputConfig::default();
        assert!(config.include_timestamps);
        assert!(!config.include_ids);
        assert!(config.group_by_date);
        assert!(config.title.is_none());
    }

    #[test]
    fn test_output_config_builder() {
        let config = OutputConfig::new()
            .with_timestamps(false)
            .with_ids(true)
            .with_group_by_date(false)
            .with_title("Trip");

        assert!(!config.include_timestamps);
        assert!(config.include_ids);
        assert!(!config.group_by_date);
        assert_eq!(config.title.as_deref(), Some("Trip"));
    }

    #[test]
    fn test_parse_utc_offset_forms() {
        let secs = |s: &str| parse_utc_offset(s).unwrap().local_minus_utc();
        assert_eq!(secs("+05:30"), 19_800);
        assert_eq!(secs("+0530"), 19_800);
        assert_eq!(secs("-08:00"), -28_800);
        assert_eq!(secs("+2"), 7_200);
        assert_eq!(secs("-03"), -10_800);
        assert_eq!(secs("Z"), 0);
        assert_eq!(secs("utc"), 0);
        assert_eq!(secs(" +01:00 "), 3_600);
    }

    #[test]
    fn test_parse_utc_offset_rejects() {
        for bad in ["", "05:30", "+25:00", "+05:60", "+5:3", "+123", "+ab", "+", "+05:30:00"] {
            let err = parse_utc_offset(bad).unwrap_err();
            assert!(matches!(err, ChatdocError::InvalidOffset { .. }), "{bad}");
        }
    }
}
