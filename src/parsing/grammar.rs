//! Line grammars for WhatsApp transcript exports.
//!
//! Two bracketed line shapes are recognized, tried in a fixed order:
//!
//! | Grammar | Example | Date order |
//! |---------|---------|------------|
//! | [`Grammar::TwentyFourHour`] | `[15/01/2024, 10:30:45] Alice: Hi` | day/month/year |
//! | [`Grammar::TwelveHour`] | `[1/15/24, 10:30:45 AM] Alice: Hi` | month/day/year |
//!
//! Both accept a run of invisible directional marks before the opening
//! bracket, which some exporters emit on every line.

use std::sync::LazyLock;

use regex::Regex;

/// Character class matching the invisible marks allowed before `[`.
const LEADING_MARKS: &str = r"[\x{200B}\x{200E}\x{200F}\x{202A}-\x{202E}\x{2066}-\x{2069}\x{FEFF}]*";

/// The two supported line shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// `[D/M/YYYY, H:mm:ss] Sender: Content`, 24-hour clock, day first.
    TwentyFourHour,
    /// `[M/D/YY, H:mm:ss AM] Sender: Content`, 12-hour clock, month first.
    /// The year may have two or four digits.
    TwelveHour,
}

impl Grammar {
    /// Returns the regex body (without the leading-mark prefix) for this grammar.
    ///
    /// Capture groups: 1 = date, 2 = time (with meridiem for
    /// [`TwelveHour`](Grammar::TwelveHour)), 3 = sender, 4 = content.
    fn pattern(self) -> &'static str {
        match self {
            // [15/01/2024, 10:30:45] Sender: Message
            Grammar::TwentyFourHour => {
                r"\[(\d{1,2}/\d{1,2}/\d{4}),\s(\d{1,2}:\d{2}:\d{2})\]\s([^:]*):\s?(.*)$"
            }
            // [1/15/24, 10:30:45 AM] Sender: Message
            Grammar::TwelveHour => {
                r"\[(\d{1,2}/\d{1,2}/(?:\d{2}|\d{4})),\s(\d{1,2}:\d{2}:\d{2}[\s\x{202F}\x{00A0}]?[AaPp][Mm])\]\s([^:]*):\s?(.*)$"
            }
        }
    }

    /// Returns `true` when the first date field is the day.
    pub fn is_day_first(self) -> bool {
        matches!(self, Grammar::TwentyFourHour)
    }

    /// Returns all grammars in the order they are tried.
    pub fn all() -> &'static [Grammar] {
        &[Grammar::TwentyFourHour, Grammar::TwelveHour]
    }
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grammar::TwentyFourHour => write!(f, "24-hour day-first"),
            Grammar::TwelveHour => write!(f, "12-hour month-first"),
        }
    }
}

fn compile(body: &str) -> Regex {
    Regex::new(&format!("^{LEADING_MARKS}{body}")).expect("built-in transcript pattern compiles")
}

static TWENTY_FOUR_HOUR: LazyLock<Regex> =
    LazyLock::new(|| compile(Grammar::TwentyFourHour.pattern()));

static TWELVE_HOUR: LazyLock<Regex> = LazyLock::new(|| compile(Grammar::TwelveHour.pattern()));

static OPENER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\[\d{1,2}/\d{1,2}/\d{2,4},\s*\d{1,2}:\d{2}(?::\d{2})?(?:[\s\x{202F}\x{00A0}]*[AaPp]\.?[Mm]\.?)?\]")
});

fn regex_for(grammar: Grammar) -> &'static Regex {
    match grammar {
        Grammar::TwentyFourHour => &TWENTY_FOUR_HOUR,
        Grammar::TwelveHour => &TWELVE_HOUR,
    }
}

/// The pieces of a line that opened a new message.
///
/// All fields borrow from the raw line; nothing has been validated or
/// normalized yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch<'a> {
    /// Which grammar matched.
    pub grammar: Grammar,
    /// Date text, e.g. `15/01/2024`.
    pub date: &'a str,
    /// Time text, e.g. `10:30:45` or `10:30:45 AM`.
    pub time: &'a str,
    /// Sender text as it appears in the line.
    pub sender: &'a str,
    /// Everything after `Sender:`; may be empty.
    pub content: &'a str,
}

/// Matches `line` against both grammars, 24-hour first.
///
/// ```
/// use chatdoc::parsing::grammar::{Grammar, match_line};
///
/// let m = match_line("[1/15/24, 10:30:45 PM] Bob: See you").unwrap();
/// assert_eq!(m.grammar, Grammar::TwelveHour);
/// assert_eq!(m.sender, "Bob");
/// assert_eq!(m.content, "See you");
///
/// assert!(match_line("just some text").is_none());
/// ```
pub fn match_line(line: &str) -> Option<LineMatch<'_>> {
    Grammar::all().iter().find_map(|&grammar| {
        let caps = regex_for(grammar).captures(line)?;
        Some(LineMatch {
            grammar,
            date: caps.get(1).map_or("", |m| m.as_str()),
            time: caps.get(2).map_or("", |m| m.as_str()),
            sender: caps.get(3).map_or("", |m| m.as_str()),
            content: caps.get(4).map_or("", |m| m.as_str()),
        })
    })
}

/// Cheap check: does `line` start with a bracketed timestamp of either shape?
///
/// Values aren't validated and the rest of the line is ignored, so
/// `[32/13/2024, 99:99:99] garbage` counts. The parser uses this to end the
/// current message even when the opener itself turns out to be unusable.
pub fn looks_like_opener(line: &str) -> bool {
    OPENER.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_four_hour_line() {
        let m = match_line("[15/01/2024, 10:30:45] Alice: Hello").unwrap();
        assert_eq!(m.grammar, Grammar::TwentyFourHour);
        assert_eq!(m.date, "15/01/2024");
        assert_eq!(m.time, "10:30:45");
        assert_eq!(m.sender, "Alice");
        assert_eq!(m.content, "Hello");
    }

    #[test]
    fn test_twelve_hour_line() {
        let m = match_line("[1/5/24, 9:05:00 am] Bob Smith: Hi there").unwrap();
        assert_eq!(m.grammar, Grammar::TwelveHour);
        assert_eq!(m.date, "1/5/24");
        assert_eq!(m.time, "9:05:00 am");
        assert_eq!(m.sender, "Bob Smith");
    }

    #[test]
    fn test_twelve_hour_four_digit_year() {
        let m = match_line("[12/31/2023, 11:59:59 PM] Carol: Happy new year").unwrap();
        assert_eq!(m.grammar, Grammar::TwelveHour);
        assert_eq!(m.date, "12/31/2023");
    }

    #[test]
    fn test_twelve_hour_narrow_space() {
        let m = match_line("[1/15/24, 10:30:45\u{202F}AM] Alice: Hi").unwrap();
        assert_eq!(m.grammar, Grammar::TwelveHour);
        assert_eq!(m.time, "10:30:45\u{202F}AM");
    }

    #[test]
    fn test_three_digit_year_rejected_by_twelve_hour() {
        assert!(match_line("[1/15/202, 10:30:45 AM] Alice: Hi").is_none());
    }

    #[test]
    fn test_leading_marks_tolerated() {
        let m = match_line("\u{200E}\u{202A}[15/01/2024, 10:30:45] Alice: Hi").unwrap();
        assert_eq!(m.sender, "Alice");
        assert!(looks_like_opener("\u{200E}[15/01/2024, 10:30:45] Alice: Hi"));
    }

    #[test]
    fn test_content_may_be_empty() {
        let m = match_line("[15/01/2024, 10:30:45] Alice:").unwrap();
        assert_eq!(m.content, "");
        let m = match_line("[15/01/2024, 10:30:45] Alice: ").unwrap();
        assert_eq!(m.content, "");
    }

    #[test]
    fn test_content_keeps_later_colons() {
        let m = match_line("[15/01/2024, 10:30:45] Alice: note: meet at 10:00").unwrap();
        assert_eq!(m.sender, "Alice");
        assert_eq!(m.content, "note: meet at 10:00");
    }

    #[test]
    fn test_sender_keeps_raw_spacing() {
        let m = match_line("[15/01/2024, 10:30:45] \u{202A}+44 7700 900123\u{202C}: Hi").unwrap();
        assert_eq!(m.sender, "\u{202A}+44 7700 900123\u{202C}");
    }

    #[test]
    fn test_grammars_are_exclusive() {
        assert_eq!(
            match_line("[1/2/2024, 10:00:00] A: x").unwrap().grammar,
            Grammar::TwentyFourHour
        );
        assert_eq!(
            match_line("[1/2/2024, 10:00:00 PM] A: x").unwrap().grammar,
            Grammar::TwelveHour
        );
    }

    #[test]
    fn test_line_without_sender_separator() {
        assert!(match_line("[15/01/2024, 10:30:45] Alice joined").is_none());
        assert!(looks_like_opener("[15/01/2024, 10:30:45] Alice joined"));
    }

    #[test]
    fn test_opener_accepts_out_of_range_values() {
        assert!(looks_like_opener("[32/01/2024, 10:00:00] Bob: hi"));
        assert!(looks_like_opener("[1/2/24, 10:00] Bob: no seconds"));
        assert!(looks_like_opener("[1/2/24, 10:00:00 P.M.] Bob: dotted"));
    }

    #[test]
    fn test_opener_rejects_plain_text() {
        assert!(!looks_like_opener("Just a continuation"));
        assert!(!looks_like_opener(""));
        assert!(!looks_like_opener("see [1/2/2024, 10:00:00] later"));
        assert!(!looks_like_opener("15/01/2024, 10:30 - Alice: Android style"));
    }
}
