//! Text clean-up applied to senders and message bodies.
//!
//! WhatsApp sprinkles invisible directional-formatting code points around
//! names, timestamps and attachments. They render as nothing but break exact
//! comparisons, so they are removed before anything else looks at the text.

/// Marker WhatsApp appends to the end of an edited message.
pub const EDITED_MARKER: &str = "<This message was edited>";

/// Invisible formatting code points removed by [`strip_control_chars`].
pub const CONTROL_CHARS: &[char] = &[
    '\u{200B}', // zero-width space
    '\u{200E}', // left-to-right mark
    '\u{200F}', // right-to-left mark
    '\u{202A}', // left-to-right embedding
    '\u{202B}', // right-to-left embedding
    '\u{202C}', // pop directional formatting
    '\u{202D}', // left-to-right override
    '\u{202E}', // right-to-left override
    '\u{2066}', // left-to-right isolate
    '\u{2067}', // right-to-left isolate
    '\u{2068}', // first strong isolate
    '\u{2069}', // pop directional isolate
    '\u{FEFF}', // byte order mark
];

/// Returns `true` for code points removed by [`strip_control_chars`].
pub fn is_control_char(c: char) -> bool {
    CONTROL_CHARS.contains(&c)
}

/// Removes every invisible formatting code point from `text`.
///
/// All other characters, including emoji, zero-width joiners inside emoji
/// sequences and non-Latin scripts, are left as they are.
///
/// ```
/// use chatdoc::parsing::normalize::strip_control_chars;
///
/// assert_eq!(strip_control_chars("\u{200E}Alice\u{202C}"), "Alice");
/// assert_eq!(strip_control_chars("Hi 👋"), "Hi 👋");
/// ```
pub fn strip_control_chars(text: &str) -> String {
    if !text.contains(is_control_char) {
        return text.to_string();
    }
    text.chars().filter(|&c| !is_control_char(c)).collect()
}

/// Removes a trailing [`EDITED_MARKER`] and the whitespace left before it.
///
/// Only an exact suffix counts; the marker in the middle of a message is
/// ordinary text.
///
/// ```
/// use chatdoc::parsing::normalize::strip_edit_marker;
///
/// assert_eq!(strip_edit_marker("See you at 8 <This message was edited>"), "See you at 8");
/// assert_eq!(strip_edit_marker("No marker"), "No marker");
/// ```
pub fn strip_edit_marker(text: &str) -> &str {
    match text.strip_suffix(EDITED_MARKER) {
        Some(rest) => rest.trim_end(),
        None => text,
    }
}

/// Full clean-up of a finished message body: control characters, trailing
/// edit marker, surrounding whitespace. Internal line breaks are kept.
pub fn normalize_content(raw: &str) -> String {
    let cleaned = strip_control_chars(raw);
    strip_edit_marker(cleaned.trim_end()).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_all_bidi_marks() {
        let input = "\u{200B}\u{200E}\u{200F}\u{202A}\u{202B}\u{202C}\u{202D}\u{202E}text";
        assert_eq!(strip_control_chars(input), "text");
    }

    #[test]
    fn test_keeps_emoji_and_joiners() {
        let family = "👨\u{200D}👩\u{200D}👧";
        assert_eq!(strip_control_chars(family), family);
        assert_eq!(strip_control_chars("Привет 你好 مرحبا"), "Привет 你好 مرحبا");
    }

    #[test]
    fn test_strips_marks_inside_text() {
        assert_eq!(
            strip_control_chars("\u{200E}<attached: photo.jpg>\u{200E}"),
            "<attached: photo.jpg>"
        );
        assert_eq!(strip_control_chars("Al\u{200B}ice"), "Alice");
    }

    #[test]
    fn test_edit_marker_exact_suffix_only() {
        assert_eq!(strip_edit_marker("Hello <This message was edited>"), "Hello");
        assert_eq!(strip_edit_marker("Hello\n<This message was edited>"), "Hello");
        assert_eq!(
            strip_edit_marker("<This message was edited> then more"),
            "<This message was edited> then more"
        );
        assert_eq!(
            strip_edit_marker("Hello <this message was edited>"),
            "Hello <this message was edited>"
        );
    }

    #[test]
    fn test_edit_marker_alone_leaves_nothing() {
        assert_eq!(strip_edit_marker(EDITED_MARKER), "");
    }

    #[test]
    fn test_normalize_content() {
        assert_eq!(
            normalize_content("  Line 1\nLine 2 \u{200E}<This message was edited>\n"),
            "Line 1\nLine 2"
        );
        assert_eq!(normalize_content("\u{200E}"), "");
    }
}
