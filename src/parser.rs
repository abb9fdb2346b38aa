//! Single-pass transcript parser.
//!
//! [`TranscriptParser`] walks the lines of a WhatsApp export once, front to
//! back, and turns them into a [`Transcript`]. Malformed input never aborts
//! the pass: every line ends up accepted as (part of) a message, dropped as
//! noise, or counted as a failure in the [`ParseMetadata`](crate::transcript::ParseMetadata).
//!
//! # How lines are consumed
//!
//! The parser is a two-state machine, `Idle` and `Building`:
//!
//! | Line | `Idle` | `Building` |
//! |------|--------|------------|
//! | Opener that parses | start a message | finish current, start a message |
//! | Opener that doesn't | one failure | finish current, one failure |
//! | Anything else | one failure (orphan) | append to the current message |
//!
//! A line is an *opener* when it starts with a bracketed timestamp of either
//! supported shape, even if its values are out of range. When a message is
//! finished its body is cleaned up, classified, and either kept, dropped as
//! noise, or counted as one failure.
//!
//! # Example
//!
//! ```rust
//! use chatdoc::parser::TranscriptParser;
//!
//! let input = "\
//! [15/01/2024, 10:30:00] Alice: Shopping list:
//! milk
//! eggs
//! [15/01/2024, 10:31:00] Bob: <Media omitted>
//! [32/01/2024, 10:32:00] Bob: broken date";
//!
//! let transcript = TranscriptParser::new().parse_str("family.txt", input)?;
//!
//! assert_eq!(transcript.len(), 1);
//! assert_eq!(transcript.messages()[0].content(), "Shopping list:\nmilk\neggs");
//!
//! let meta = transcript.metadata();
//! assert_eq!(meta.total_lines(), 5);
//! assert_eq!(meta.filtered(), 1);
//! assert_eq!(meta.failed(), 1);
//! # Ok::<(), chatdoc::ChatdocError>(())
//! ```

use std::path::Path;

use chrono::{DateTime, FixedOffset, Utc};
use log::{debug, info, trace};
use thiserror::Error;

use crate::Message;
use crate::config::{ParserConfig, ReaderConfig};
use crate::error::{ChatdocError, Result};
use crate::message::MessageError;
use crate::parsing::classify::{Classification, FilterReason, classify};
use crate::parsing::datetime::{ResolveError, resolve};
use crate::parsing::grammar::{looks_like_opener, match_line};
use crate::parsing::normalize::{normalize_content, strip_control_chars};
use crate::reader::read_lines;
use crate::transcript::{ParseMetadata, Transcript};

/// Why a line or a finished message couldn't become a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// Starts like an opener but doesn't match either grammar.
    #[error("line does not match a supported message format")]
    Unmatched,
    /// Matched, but its date or time is invalid.
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] ResolveError),
    /// Finished message has an empty sender or body.
    #[error("invalid message: {0}")]
    Message(#[from] MessageError),
    /// Non-opener line with no message to continue.
    #[error("line does not belong to any message")]
    Orphan,
}

/// What became of one finished message or failed line.
#[derive(Debug)]
pub(crate) enum ParseOutcome {
    Accepted(Message),
    Filtered(FilterReason),
    Failed(FailureReason),
}

/// The message currently being assembled.
#[derive(Debug)]
struct Buffer {
    line_no: usize,
    timestamp: DateTime<FixedOffset>,
    sender: String,
    content: String,
}

impl Buffer {
    fn push_line(&mut self, line: &str) {
        self.content.push('\n');
        self.content.push_str(&strip_control_chars(line));
    }
}

#[derive(Debug)]
enum State {
    Idle,
    Building(Buffer),
}

/// Collects outcomes and counts for one pass.
struct Tally<'a> {
    source: &'a str,
    messages: Vec<Message>,
    failed: usize,
    filtered: usize,
}

impl<'a> Tally<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            messages: Vec::new(),
            failed: 0,
            filtered: 0,
        }
    }

    fn record(&mut self, line_no: usize, outcome: ParseOutcome) {
        match outcome {
            ParseOutcome::Accepted(message) => self.messages.push(message),
            ParseOutcome::Filtered(reason) => {
                trace!("{}:{}: dropped {}", self.source, line_no, reason);
                self.filtered += 1;
            }
            ParseOutcome::Failed(reason) => {
                debug!("{}:{}: {}", self.source, line_no, reason);
                self.failed += 1;
            }
        }
    }

    fn into_transcript(self, total_lines: usize) -> Transcript {
        let metadata = ParseMetadata::new(
            self.source.to_string(),
            Utc::now(),
            total_lines,
            self.messages.len(),
            self.failed,
            self.filtered,
        );
        Transcript::new(self.messages, metadata)
    }
}

/// Parser for bracketed WhatsApp TXT exports.
///
/// Holds only its configuration, so one parser can be shared across threads
/// and used for any number of inputs.
///
/// # Example
///
/// ```rust
/// use chatdoc::config::ParserConfig;
/// use chatdoc::parser::TranscriptParser;
///
/// let parser = TranscriptParser::with_config(ParserConfig::new().with_skip_noise(false));
/// let transcript = parser.parse_str("chat.txt", "[1/15/24, 9:00:00 AM] Ann: https://example.com")?;
/// assert_eq!(transcript.len(), 1);
/// # Ok::<(), chatdoc::ChatdocError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TranscriptParser {
    config: ParserConfig,
}

impl TranscriptParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses a sequence of lines.
    ///
    /// `source` identifies the input in the metadata and in log output.
    ///
    /// # Errors
    ///
    /// Returns [`ChatdocError::InvalidArgument`] if `source` is empty or
    /// whitespace. Problems in the lines themselves are never errors.
    pub fn parse_lines<I, S>(&self, source: &str, lines: I) -> Result<Transcript>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if source.trim().is_empty() {
            return Err(ChatdocError::invalid_argument(
                "source",
                "must not be empty",
            ));
        }

        let mut tally = Tally::new(source);
        let mut state = State::Idle;
        let mut total_lines = 0;

        for (index, line) in lines.into_iter().enumerate() {
            total_lines += 1;
            state = self.step(state, line.as_ref(), index + 1, &mut tally);
        }
        if let State::Building(buffer) = state {
            let line_no = buffer.line_no;
            tally.record(line_no, self.finish(buffer));
        }

        let transcript = tally.into_transcript(total_lines);
        let meta = transcript.metadata();
        info!(
            "{}: {} lines, {} accepted, {} failed, {} filtered",
            meta.source(),
            meta.total_lines(),
            meta.accepted(),
            meta.failed(),
            meta.filtered()
        );
        Ok(transcript)
    }

    /// Parses a whole transcript held in memory.
    ///
    /// A leading byte-order mark is ignored; lines end at `\n` or `\r\n`.
    pub fn parse_str(&self, source: &str, text: &str) -> Result<Transcript> {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        self.parse_lines(source, text.lines())
    }

    /// Reads and parses a transcript file. The path is used as the source
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns an I/O or UTF-8 error if the file can't be read.
    pub fn parse_file(&self, path: impl AsRef<Path>, reader: &ReaderConfig) -> Result<Transcript> {
        let path = path.as_ref();
        let lines = read_lines(path, reader)?;
        self.parse_lines(&path.display().to_string(), lines)
    }

    fn step(&self, state: State, line: &str, line_no: usize, tally: &mut Tally<'_>) -> State {
        if looks_like_opener(line) {
            if let State::Building(buffer) = state {
                let started = buffer.line_no;
                tally.record(started, self.finish(buffer));
            }
            return match self.open(line, line_no) {
                Ok(buffer) => State::Building(buffer),
                Err(reason) => {
                    tally.record(line_no, ParseOutcome::Failed(reason));
                    State::Idle
                }
            };
        }

        match state {
            State::Building(mut buffer) => {
                buffer.push_line(line);
                State::Building(buffer)
            }
            State::Idle => {
                tally.record(line_no, ParseOutcome::Failed(FailureReason::Orphan));
                State::Idle
            }
        }
    }

    fn open(&self, line: &str, line_no: usize) -> std::result::Result<Buffer, FailureReason> {
        let matched = match_line(line).ok_or(FailureReason::Unmatched)?;
        let timestamp = resolve(
            matched.grammar,
            matched.date,
            matched.time,
            self.config.offset(),
        )?;

        Ok(Buffer {
            line_no,
            timestamp,
            sender: strip_control_chars(matched.sender).trim().to_string(),
            content: matched.content.to_string(),
        })
    }

    fn finish(&self, buffer: Buffer) -> ParseOutcome {
        let content = normalize_content(&buffer.content);

        if self.config.skip_noise {
            if let Classification::Filtered(reason) = classify(&content) {
                return ParseOutcome::Filtered(reason);
            }
        }

        match Message::new(buffer.timestamp, buffer.sender, content) {
            Ok(message) => ParseOutcome::Accepted(message),
            Err(err) => ParseOutcome::Failed(err.into()),
        }
    }
}
