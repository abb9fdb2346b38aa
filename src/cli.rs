//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - Output format options as seen on the command line
//!
//! [`Args`] also knows how to turn itself into the library configuration
//! types, so `main` stays a thin pipeline.
//!
//! ```rust
//! use chatdoc::cli::Args;
//! use clap::Parser;
//!
//! let args = Args::try_parse_from(["chatdoc", "chat.txt", "--from", "Alice", "-f", "doc"]).unwrap();
//! assert_eq!(args.output_path().to_str(), Some("chat.document.json"));
//! assert!(args.filter_config().unwrap().has_sender_filter());
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{OutputConfig, ParserConfig, ReaderConfig, parse_utc_offset};
use crate::core::filter::FilterConfig;
use crate::error::{ChatdocError, Result};

/// Turn a WhatsApp chat export into a clean transcript or document.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatdoc")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatdoc chat.txt
    chatdoc chat.txt -f doc --title \"Family chat\"
    chatdoc chat.txt -o family.csv --from Alice --from Bob
    chatdoc chat.txt --utc-offset +05:30 --after 2024-01-01
    chatdoc chat.txt --checkpoint family.checkpoint.json")]
pub struct Args {
    /// Path to the WhatsApp TXT export
    pub input: PathBuf,

    /// Path to output file [default: input name with the format's extension, never the input itself]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Source identifier recorded in the metadata [default: input path]
    #[arg(long, value_name = "ID")]
    pub source_id: Option<String>,

    /// Zone the export was written in, e.g. +05:30, -0800, UTC
    #[arg(long, value_name = "OFFSET", default_value = "UTC", allow_hyphen_values = true)]
    pub utc_offset: String,

    /// Keep only messages from this sender (repeatable, case-insensitive)
    #[arg(long, value_name = "NAME")]
    pub from: Vec<String>,

    /// Keep only messages on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Keep only messages on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Skip messages recorded in this checkpoint, then record the new ones
    #[arg(long, value_name = "PATH")]
    pub checkpoint: Option<PathBuf>,

    /// Document title [default: input file name]
    #[arg(long)]
    pub title: Option<String>,

    /// Omit timestamps from the output
    #[arg(long)]
    pub no_timestamps: bool,

    /// Include content-hash message ids in structured output
    #[arg(long)]
    pub ids: bool,

    /// Keep links, media placeholders and system notices
    #[arg(long)]
    pub keep_noise: bool,

    /// Read attempts before giving up on transient I/O errors
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub retries: u32,

    /// Log every failed line
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Returns the output path, deriving it from the input when not given.
    ///
    /// A derived path that would land on the input (`chat.txt` as text)
    /// gets a `.transcript` infix instead: `chat.transcript.txt`.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => {
                let extension = crate::format::OutputFormat::from(self.format).extension();
                let derived = self.input.with_extension(extension);
                if derived == self.input {
                    self.input.with_extension(format!("transcript.{extension}"))
                } else {
                    derived
                }
            }
        }
    }

    /// Refuses an output path that resolves to the input file.
    ///
    /// # Errors
    ///
    /// Returns [`ChatdocError::InvalidArgument`] when both paths name the
    /// same existing file.
    pub fn check_output_path(&self, output: &Path) -> Result<()> {
        let same_file = match (self.input.canonicalize(), output.canonicalize()) {
            (Ok(input), Ok(output)) => input == output,
            _ => false,
        };
        if same_file {
            return Err(ChatdocError::invalid_argument(
                "output",
                format!("{} is the input file", output.display()),
            ));
        }
        Ok(())
    }

    /// Returns the source identifier for the metadata.
    pub fn source_id(&self) -> String {
        self.source_id
            .clone()
            .unwrap_or_else(|| self.input.display().to_string())
    }

    /// Builds the parser configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `--utc-offset` is malformed.
    pub fn parser_config(&self) -> Result<ParserConfig> {
        Ok(ParserConfig::new()
            .with_utc_offset(parse_utc_offset(&self.utc_offset)?)
            .with_skip_noise(!self.keep_noise))
    }

    /// Builds the reader configuration.
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::new().with_max_attempts(self.retries)
    }

    /// Builds the sender/date filter.
    ///
    /// # Errors
    ///
    /// Returns an error if `--after` or `--before` is malformed.
    pub fn filter_config(&self) -> Result<FilterConfig> {
        let mut config = FilterConfig::new().with_senders(&self.from);
        if let Some(after) = &self.after {
            config = config.with_date_from(after)?;
        }
        if let Some(before) = &self.before {
            config = config.with_date_to(before)?;
        }
        Ok(config)
    }

    /// Builds the output configuration.
    pub fn output_config(&self) -> OutputConfig {
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| default_title(&self.input));
        OutputConfig::new()
            .with_timestamps(!self.no_timestamps)
            .with_ids(self.ids)
            .with_title(title)
    }
}

fn default_title(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

/// Output format options.
///
/// # Example
///
/// ```rust
/// use chatdoc::cli::OutputFormat;
///
/// let format = OutputFormat::Document;
/// assert_eq!(format.to_string(), "Document");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text, one block per message (default)
    #[default]
    #[value(alias = "txt")]
    Text,

    /// Structured document (title, day headings, entries) as JSON
    #[value(alias = "doc")]
    Document,

    /// JSON array of messages
    Json,

    /// JSON Lines - one JSON object per line
    #[value(alias = "ndjson")]
    Jsonl,

    /// CSV with semicolon delimiter
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::format::OutputFormat::from(*self).fmt(f)
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Text => crate::format::OutputFormat::Text,
            OutputFormat::Document => crate::format::OutputFormat::Document,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("chatdoc").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["chat.txt"]);
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.utc_offset, "UTC");
        assert_eq!(args.retries, 3);
        assert!(args.from.is_empty());
        assert!(!args.keep_noise);
        assert_eq!(args.source_id(), "chat.txt");
    }

    #[test]
    fn test_output_path_follows_format() {
        assert_eq!(parse(&["chat.txt", "-f", "csv"]).output_path(), PathBuf::from("chat.csv"));
        assert_eq!(parse(&["chat.log"]).output_path(), PathBuf::from("chat.txt"));
        assert_eq!(
            parse(&["dir/chat.txt", "-f", "document"]).output_path(),
            PathBuf::from("dir/chat.document.json")
        );
        assert_eq!(
            parse(&["chat.txt", "-o", "out.md"]).output_path(),
            PathBuf::from("out.md")
        );
    }

    #[test]
    fn test_derived_output_never_replaces_input() {
        assert_eq!(
            parse(&["exports/chat.txt"]).output_path(),
            PathBuf::from("exports/chat.transcript.txt")
        );
        assert_eq!(
            parse(&["chat.csv", "-f", "csv"]).output_path(),
            PathBuf::from("chat.transcript.csv")
        );
        assert_eq!(
            parse(&["chat.transcript.txt"]).output_path(),
            PathBuf::from("chat.transcript.transcript.txt")
        );
    }

    #[test]
    fn test_output_resolving_to_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("chat.txt");
        std::fs::write(&input, "[15/01/2024, 10:30:00] Alice: Hi\n").unwrap();
        let input_arg = input.to_str().unwrap();

        let args = parse(&[input_arg]);
        assert!(args.check_output_path(&args.output_path()).is_ok());

        let dotted = dir.path().join(".").join("chat.txt");
        let err = args.check_output_path(&dotted).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("is the input file"));

        assert!(args.check_output_path(&dir.path().join("missing.txt")).is_ok());
    }

    #[test]
    fn test_format_aliases() {
        assert_eq!(parse(&["c.txt", "-f", "doc"]).format, OutputFormat::Document);
        assert_eq!(parse(&["c.txt", "-f", "ndjson"]).format, OutputFormat::Jsonl);
        assert!(Args::try_parse_from(["chatdoc", "c.txt", "-f", "xml"]).is_err());
    }

    #[test]
    fn test_repeatable_from() {
        let args = parse(&["c.txt", "--from", "Alice", "--from", "bob"]);
        let filter = args.filter_config().unwrap();
        assert_eq!(filter.senders, vec!["alice", "bob"]);
    }

    #[test]
    fn test_bad_date_is_error() {
        let args = parse(&["c.txt", "--after", "2024/01/01"]);
        assert!(args.filter_config().unwrap_err().is_invalid_date());
    }

    #[test]
    fn test_parser_config() {
        let args = parse(&["c.txt", "--utc-offset", "+05:30", "--keep-noise"]);
        let config = args.parser_config().unwrap();
        assert_eq!(config.utc_offset_seconds, 19_800);
        assert!(!config.skip_noise);

        let bad = parse(&["c.txt", "--utc-offset", "nowhere"]);
        assert!(bad.parser_config().is_err());
    }

    #[test]
    fn test_output_config() {
        let args = parse(&["exports/Family.txt", "--no-timestamps", "--ids"]);
        let config = args.output_config();
        assert!(!config.include_timestamps);
        assert!(config.include_ids);
        assert_eq!(config.title.as_deref(), Some("Family"));

        let titled = parse(&["c.txt", "--title", "Trip"]).output_config();
        assert_eq!(titled.title.as_deref(), Some("Trip"));
    }

    #[test]
    fn test_format_display_and_conversion() {
        assert_eq!(OutputFormat::Jsonl.to_string(), "JSONL");
        assert_eq!(
            crate::format::OutputFormat::from(OutputFormat::Csv),
            crate::format::OutputFormat::Csv
        );
    }
}
