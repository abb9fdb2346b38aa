//! Reading transcript files into lines.
//!
//! Exports often live on synced or network drives, where a read can fail
//! transiently. [`read_lines`] retries those failures with exponential
//! backoff before giving up; permanent errors (missing file, permission
//! denied) are returned immediately.

use std::fs;
use std::io;
use std::path::Path;
use std::thread;

use log::{debug, warn};

use crate::config::ReaderConfig;
use crate::error::{ChatdocError, Result};

/// Returns `true` for I/O errors worth retrying.
pub fn is_transient(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// Runs `op` until it succeeds, fails permanently, or runs out of attempts.
///
/// `what` names the operation in log messages.
pub fn with_retry<T, F>(config: &ReaderConfig, what: &str, mut op: F) -> io::Result<T>
where
    F: FnMut() -> io::Result<T>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if is_transient(err.kind()) && attempt < max_attempts => {
                let delay = config.backoff_for(attempt);
                warn!(
                    "{}: attempt {} of {} failed: {}; retrying after {:?}",
                    what, attempt, max_attempts, err, delay
                );
                thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Splits decoded text into lines.
///
/// A leading byte-order mark is dropped, both `\n` and `\r\n` end a line,
/// and a final line terminator doesn't produce an extra empty line.
///
/// ```
/// use chatdoc::reader::split_lines;
///
/// assert_eq!(split_lines("\u{FEFF}a\r\nb\n"), vec!["a", "b"]);
/// assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
/// assert!(split_lines("").is_empty());
/// ```
pub fn split_lines(text: &str) -> Vec<String> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    text.lines().map(str::to_string).collect()
}

/// Reads a UTF-8 transcript file into lines, retrying transient I/O errors.
///
/// # Errors
///
/// Returns [`ChatdocError::Io`] when the file can't be read and
/// [`ChatdocError::Utf8`] when it isn't valid UTF-8.
///
/// # Example
///
/// ```rust,no_run
/// use chatdoc::config::ReaderConfig;
/// use chatdoc::reader::read_lines;
///
/// let lines = read_lines("chat.txt", &ReaderConfig::default())?;
/// println!("{} lines", lines.len());
/// # Ok::<(), chatdoc::ChatdocError>(())
/// ```
pub fn read_lines(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Vec<String>> {
    let path = path.as_ref();
    let what = format!("reading {}", path.display());

    let bytes = with_retry(config, &what, || fs::read(path))?;
    let text = String::from_utf8(bytes).map_err(|source| ChatdocError::Utf8 {
        context: path.display().to_string(),
        source,
    })?;

    let lines = split_lines(&text);
    debug!("{}: {} lines", what, lines.len());
    Ok(lines)
}
