//! Unified error types for chatdoc.
//!
//! This module provides a single [`ChatdocError`] enum that covers every error
//! a caller can observe. Malformed *content* in a transcript is never an error:
//! the parser degrades gracefully and records it in
//! [`ParseMetadata`](crate::transcript::ParseMetadata). Errors are reserved for
//! invalid arguments, I/O, and the collaborators around the parser (output,
//! checkpoint, configuration).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatdoc operations.
///
/// # Example
///
/// ```rust
/// use chatdoc::error::Result;
/// use chatdoc::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatdocError>;

/// The error type for all chatdoc operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatdocError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// An argument passed to a public entry point is unusable.
    ///
    /// The parser raises this for an empty source identifier. It is never
    /// raised for malformed transcript lines.
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument {
        /// Name of the offending argument
        name: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A value doesn't match the expected structure.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Invalid date in filter configuration.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// Invalid UTC offset in parser configuration.
    #[error("Invalid UTC offset '{input}'. Expected e.g. +05:30, -0800, Z or UTC")]
    InvalidOffset {
        /// The offending input
        input: String,
    },

    /// UTF-8 encoding error.
    ///
    /// Occurs when the transcript file is not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The checkpoint file exists but can't be used.
    #[error("Checkpoint error ({}): {message}", path.display())]
    Checkpoint {
        /// Location of the checkpoint file
        path: PathBuf,
        /// Description of what's wrong
        message: String,
    },
}

impl From<std::string::FromUtf8Error> for ChatdocError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatdocError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatdocError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        ChatdocError::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatdocError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatdocError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates an invalid offset error.
    pub fn invalid_offset(input: impl Into<String>) -> Self {
        ChatdocError::InvalidOffset {
            input: input.into(),
        }
    }

    /// Creates a checkpoint error.
    pub fn checkpoint(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ChatdocError::Checkpoint {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatdocError::Io(_))
    }

    /// Returns `true` if this is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ChatdocError::InvalidArgument { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatdocError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ChatdocError::InvalidDate { .. })
    }

    /// Returns `true` if this is a checkpoint error.
    pub fn is_checkpoint(&self) -> bool {
        matches!(self, ChatdocError::Checkpoint { .. })
    }
}
