//! Property-based tests for chatdoc.
//!
//! These tests generate random transcripts to find edge cases.

use proptest::prelude::*;

use chatdoc::prelude::*;

/// One generated line, tagged with what the parser should make of it when
/// it follows an accepted message.
#[derive(Debug, Clone)]
enum Line {
    Opener(String),
    Continuation(String),
}

impl Line {
    fn text(&self) -> &str {
        match self {
            Line::Opener(s) | Line::Continuation(s) => s,
        }
    }
}

fn arb_sender() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Alice".to_string(),
        "Bob".to_string(),
        "Charlie".to_string(),
        "+1 555 0100".to_string(),
        "Иван".to_string(),
        "Zoë 🎉".to_string(),
    ])
}

fn arb_content() -> impl Strategy<Value = String> {
    // Fast: select from predefined contents, none of them noise
    prop::sample::select(vec![
        "Hello".to_string(),
        "Hi there!".to_string(),
        "How are you?".to_string(),
        "Meet at 10:30".to_string(),
        "Привет мир".to_string(),
        "Special;chars\"here".to_string(),
        "🎉🔥 emoji".to_string(),
        "[not a timestamp]".to_string(),
    ])
}

fn arb_opener() -> impl Strategy<Value = Line> {
    (1u32..=28, 1u32..=12, 2000i32..2040, 0u32..24, 0u32..60, arb_sender(), arb_content())
        .prop_map(|(day, month, year, hour, minute, sender, content)| {
            Line::Opener(format!(
                "[{day:02}/{month:02}/{year}, {hour:02}:{minute:02}:00] {sender}: {content}"
            ))
        })
}

fn arb_continuation() -> impl Strategy<Value = Line> {
    arb_content().prop_map(Line::Continuation)
}

/// Well-formed transcript: starts with an opener, any mix afterwards.
fn arb_transcript() -> impl Strategy<Value = Vec<Line>> {
    (
        arb_opener(),
        prop::collection::vec(prop_oneof![3 => arb_opener(), 1 => arb_continuation()], 0..40),
    )
        .prop_map(|(first, rest)| std::iter::once(first).chain(rest).collect())
}

fn join(lines: &[Line]) -> String {
    lines.iter().map(Line::text).collect::<Vec<_>>().join("\n")
}

fn parse(input: &str) -> Transcript {
    TranscriptParser::new().parse_str("prop.txt", input).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every line is accounted for.
    #[test]
    fn test_counts_never_exceed_lines(input in ".{0,400}") {
        let t = parse(&input);
        let m = t.metadata();
        prop_assert!(m.accepted() + m.failed() + m.filtered() <= m.total_lines());
        prop_assert_eq!(t.len(), m.accepted());
    }

    /// Arbitrary text with opener-like prefixes never panics.
    #[test]
    fn test_no_panic_on_opener_noise(
        day in 0u32..100,
        month in 0u32..100,
        year in "[0-9]{2,4}",
        time in "[0-9]{1,2}:[0-9]{2}:[0-9]{2}( ?[AaPp][Mm])?",
        rest in ".{0,40}",
    ) {
        let line = format!("[{day}/{month}/{year}, {time}] {rest}");
        let _ = parse(&line);
    }

    /// Well-formed transcripts produce one message per opener, no failures.
    #[test]
    fn test_one_message_per_opener(lines in arb_transcript()) {
        let t = parse(&join(&lines));
        let openers = lines.iter().filter(|l| matches!(l, Line::Opener(_))).count();

        prop_assert_eq!(t.len(), openers);
        prop_assert_eq!(t.metadata().failed(), 0);
        prop_assert_eq!(t.metadata().filtered(), 0);
        prop_assert_eq!(t.metadata().total_lines(), lines.len());
    }

    /// Continuations land in the message body, line count matches.
    #[test]
    fn test_line_counts_add_up(lines in arb_transcript()) {
        let t = parse(&join(&lines));
        let body_lines: usize = t.messages().iter().map(Message::line_count).sum();
        prop_assert_eq!(body_lines, lines.len());
    }

    /// Parsing the same input twice gives the same result.
    #[test]
    fn test_parse_is_deterministic(input in ".{0,200}", lines in arb_transcript()) {
        for text in [input, join(&lines)] {
            let a = parse(&text);
            let b = parse(&text);
            prop_assert_eq!(a.messages(), b.messages());
            prop_assert_eq!(a.metadata().failed(), b.metadata().failed());
        }
    }

    /// No message ever carries an empty sender or body.
    #[test]
    fn test_messages_are_never_empty(input in "(\\[1/1/2024, 10:00:00\\] .{0,10}\n){0,10}") {
        for msg in parse(&input).messages() {
            prop_assert!(!msg.sender().trim().is_empty());
            prop_assert!(!msg.content().trim().is_empty());
        }
    }

    /// Filtering keeps order and only drops.
    #[test]
    fn test_filter_is_subsequence(lines in arb_transcript(), who in arb_sender()) {
        let messages = parse(&join(&lines)).into_messages();
        let filtered = apply_filters(messages.clone(), &FilterConfig::new().with_sender(&who));

        let mut rest = messages.iter();
        for kept in &filtered {
            prop_assert!(rest.any(|m| m == kept));
            prop_assert_eq!(kept.sender().to_lowercase(), who.to_lowercase());
        }
    }

    /// A checkpoint that recorded a transcript rejects all of it.
    #[test]
    fn test_checkpoint_covers_recorded(lines in arb_transcript()) {
        let messages = parse(&join(&lines)).into_messages();
        let mut checkpoint = Checkpoint::new("unused.json");
        checkpoint.record(&messages);
        prop_assert!(checkpoint.retain_new(messages).is_empty());
    }
}
