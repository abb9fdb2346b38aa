//! Plain-text output writer.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::Message;
use crate::config::OutputConfig;
use crate::error::Result;

/// Indent for the second and later lines of a message body.
pub const CONTINUATION_INDENT: &str = "    ";

/// Converts messages to plain text, one block per message.
///
/// ```
/// use chatdoc::config::OutputConfig;
/// use chatdoc::core::output::to_text;
/// use chatdoc::parser::TranscriptParser;
///
/// let transcript = TranscriptParser::new()
///     .parse_str("chat.txt", "[15/01/2024, 10:30:00] Alice: Line 1\nLine 2")?;
///
/// let text = to_text(transcript.messages(), &OutputConfig::new());
/// assert_eq!(text, "[2024-01-15 10:30:00] Alice: Line 1\n    Line 2\n");
/// # Ok::<(), chatdoc::ChatdocError>(())
/// ```
pub fn to_text(messages: &[Message], config: &OutputConfig) -> String {
    let mut out = String::new();
    for msg in messages {
        if config.include_timestamps {
            let _ = write!(out, "[{}] ", msg.timestamp().format("%Y-%m-%d %H:%M:%S"));
        }
        out.push_str(msg.sender());
        out.push_str(": ");
        push_indented(&mut out, msg.content());
        out.push('\n');
    }
    out
}

/// Writes messages as plain text.
pub fn write_text(
    messages: &[Message],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    fs::write(output_path, to_text(messages, config))?;
    Ok(())
}

/// Appends `body`, indenting every line after the first.
pub(crate) fn push_indented(out: &mut String, body: &str) {
    for (i, line) in body.lines().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(CONTINUATION_INDENT);
        }
        out.push_str(line);
    }
}
