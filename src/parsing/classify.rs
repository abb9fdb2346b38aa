//! Noise classification for finished message bodies.
//!
//! A message that parsed cleanly can still be something nobody wants in the
//! output: a bare link, a media placeholder, an attachment stub, or a
//! notification WhatsApp writes into the chat on the group's behalf. These
//! are *filtered*, which is distinct from a parse failure.
//!
//! Checks run cheapest first:
//!
//! | Check | Example | Reason |
//! |-------|---------|--------|
//! | Link only | `https://example.com` | [`FilterReason::LinkOnly`] |
//! | Placeholder | `<Media omitted>` | [`FilterReason::Placeholder`] |
//! | Attachment | `<attached: IMG-001.jpg>` | [`FilterReason::Attachment`] |
//! | System notice | `Alice added Bob` | [`FilterReason::SystemNotice`] |
//!
//! The system-notice rules are heuristics over free text. They are known to
//! misfire in both directions (`John added sugar` is treated as a notice)
//! and are applied exactly as listed in [`SYSTEM_RULES`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Genuine content.
    Keep,
    /// Noise; drop without counting a failure.
    Filtered(FilterReason),
}

impl Classification {
    /// Returns `true` for [`Classification::Keep`].
    pub fn is_keep(self) -> bool {
        matches!(self, Classification::Keep)
    }
}

/// Why a message was classified as noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterReason {
    /// The whole message is one `http(s)://` URL.
    LinkOnly,
    /// A fixed media or deleted-message placeholder.
    Placeholder,
    /// An `<attached: name>` stub.
    Attachment,
    /// A group or system notification.
    SystemNotice(SystemRule),
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterReason::LinkOnly => write!(f, "link only"),
            FilterReason::Placeholder => write!(f, "placeholder"),
            FilterReason::Attachment => write!(f, "attachment"),
            FilterReason::SystemNotice(rule) => write!(f, "system notice ({rule})"),
        }
    }
}

/// Placeholders matched exactly, ignoring case.
pub const PLACEHOLDERS: &[&str] = &[
    "<media omitted>",
    "image omitted",
    "video omitted",
    "audio omitted",
    "sticker omitted",
    "gif omitted",
    "document omitted",
    "contact card omitted",
    "video note omitted",
    "this message was deleted",
    "you deleted this message",
    "this message was deleted.",
    "you deleted this message.",
    "missed voice call",
    "missed video call",
    "waiting for this message. this may take a while.",
    "null",
];

/// Phrases whose presence anywhere marks a group or system notice.
const NOTICE_PHRASES: &[&str] = &[
    "changed this group's icon",
    "changed the group icon",
    "deleted this group's icon",
    "changed this group's description",
    "changed the group description",
    "deleted the group description",
    "changed this group's settings",
    "changed the group settings",
    "messages and calls are end-to-end encrypted",
    "changed their phone number",
    "changed to a new number",
    "security code changed",
    "joined using this group's invite link",
    "joined using an invite link",
    "turned on disappearing messages",
    "turned off disappearing messages",
];

/// Admin-status phrases; the content must equal or end with one.
const ADMIN_PHRASES: &[&str] = &[
    "you're now an admin",
    "is now an admin",
    "are now an admin",
    "no longer an admin",
];

/// Trailing words that mark a membership change.
const MEMBERSHIP_SUFFIXES: &[&str] = &["added you", "left", "joined"];

/// Substrings that mark ordinary conversation; none of the system rules
/// fire when one is present.
const CONVERSATION_MARKERS: &[&str] = &["?", "!", "someone ", "yesterday", "the new member"];

/// Substrings that keep an `added` message.
const ADDED_EXCLUSIONS: &[&str] = &[
    "i added",
    "to my",
    "contacts",
    "added a ",
    "added the ",
    "added some ",
];

/// Substrings that keep a `removed` message.
const REMOVED_EXCLUSIONS: &[&str] = &[
    "removed the ",
    "removed my ",
    "removed your ",
    "removed our ",
    "removed their ",
    "removed his ",
    "removed her ",
];

/// Leading words that make a sentence first-person or pronoun-led.
const PRONOUN_SUBJECTS: &[&str] = &["i", "we", "you", "they", "he", "she", "it"];

static WHO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bwho\b").expect("built-in classifier pattern compiles"));

static ADDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{Lu}[\p{L}'\-]*(?:\s\p{Lu}[\p{L}'\-]*)?\sadded\s\S+")
        .expect("built-in classifier pattern compiles")
});

static CREATED_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"created group\s*["“”][^"“”]*["“”]"#).expect("built-in classifier pattern compiles")
});

static SUBJECT_CHANGED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"changed the subject (?:from\s*["“”][^"“”]*["“”]\s*)?to\s*["“”][^"“”]*["“”]"#)
        .expect("built-in classifier pattern compiles")
});

/// One predicate in the system-notice table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemRule {
    /// Ends with `added you`, `left` or `joined`.
    Membership,
    /// Icon, description, settings, encryption, number or invite-link notice.
    GroupChange,
    /// Admin promotion or demotion.
    AdminStatus,
    /// `Name added Name`.
    MemberAdded,
    /// `X removed Y`.
    MemberRemoved,
    /// `created group "Name"`.
    GroupCreated,
    /// `changed the subject to "Name"`.
    SubjectChanged,
}

/// System-notice rules in evaluation order.
pub const SYSTEM_RULES: &[SystemRule] = &[
    SystemRule::Membership,
    SystemRule::GroupChange,
    SystemRule::AdminStatus,
    SystemRule::MemberAdded,
    SystemRule::MemberRemoved,
    SystemRule::GroupCreated,
    SystemRule::SubjectChanged,
];

impl SystemRule {
    /// Tests the rule against `original` and its folded lowercase form.
    fn applies(self, original: &str, folded: &str) -> bool {
        let bare = trim_punctuation(folded);
        match self {
            SystemRule::Membership => MEMBERSHIP_SUFFIXES
                .iter()
                .any(|suffix| ends_with_words(bare, suffix)),
            SystemRule::GroupChange => NOTICE_PHRASES.iter().any(|p| folded.contains(p)),
            SystemRule::AdminStatus => ADMIN_PHRASES.iter().any(|p| bare.ends_with(p)),
            SystemRule::MemberAdded => {
                folded.contains(" added ")
                    && !ADDED_EXCLUSIONS.iter().any(|p| folded.contains(p))
                    && ADDED.is_match(original)
            }
            SystemRule::MemberRemoved => {
                (folded.contains(" removed ") || folded.starts_with("removed "))
                    && !starts_with_pronoun(folded)
                    && !REMOVED_EXCLUSIONS.iter().any(|p| folded.contains(p))
            }
            SystemRule::GroupCreated => {
                CREATED_GROUP.is_match(folded) && !starts_with_pronoun(folded)
            }
            SystemRule::SubjectChanged => SUBJECT_CHANGED.is_match(folded),
        }
    }
}

impl fmt::Display for SystemRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SystemRule::Membership => "membership",
            SystemRule::GroupChange => "group change",
            SystemRule::AdminStatus => "admin status",
            SystemRule::MemberAdded => "member added",
            SystemRule::MemberRemoved => "member removed",
            SystemRule::GroupCreated => "group created",
            SystemRule::SubjectChanged => "subject changed",
        };
        f.write_str(name)
    }
}

/// Classifies normalized, edit-stripped message content.
///
/// ```
/// use chatdoc::parsing::classify::{Classification, FilterReason, classify};
///
/// assert_eq!(classify("https://example.com"), Classification::Filtered(FilterReason::LinkOnly));
/// assert!(classify("Check this: https://example.com please").is_keep());
/// assert!(classify("I added you to my contacts").is_keep());
/// assert!(!classify("John added Mary").is_keep());
/// ```
pub fn classify(content: &str) -> Classification {
    let trimmed = content.trim();

    if is_link_only(trimmed) {
        return Classification::Filtered(FilterReason::LinkOnly);
    }
    if is_placeholder(trimmed) {
        return Classification::Filtered(FilterReason::Placeholder);
    }
    if is_attachment(trimmed) {
        return Classification::Filtered(FilterReason::Attachment);
    }
    match system_rule(trimmed) {
        Some(rule) => Classification::Filtered(FilterReason::SystemNotice(rule)),
        None => Classification::Keep,
    }
}

/// Returns the first system rule that fires for `content`, if any.
pub fn system_rule(content: &str) -> Option<SystemRule> {
    let folded = fold(content);
    if is_conversational(&folded) {
        return None;
    }
    SYSTEM_RULES
        .iter()
        .copied()
        .find(|rule| rule.applies(content, &folded))
}

fn is_link_only(text: &str) -> bool {
    (text.starts_with("http://") || text.starts_with("https://"))
        && !text.contains(char::is_whitespace)
}

fn is_placeholder(text: &str) -> bool {
    PLACEHOLDERS.iter().any(|p| text.eq_ignore_ascii_case(p))
}

fn is_attachment(text: &str) -> bool {
    const PREFIX: &str = "<attached:";
    let Some(head) = text.get(..PREFIX.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(PREFIX) {
        return false;
    }
    text[PREFIX.len()..]
        .strip_suffix('>')
        .is_some_and(|name| !name.trim().is_empty())
}

fn fold(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

fn is_conversational(folded: &str) -> bool {
    CONVERSATION_MARKERS.iter().any(|m| folded.contains(m)) || WHO.is_match(folded)
}

fn trim_punctuation(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
}

fn ends_with_words(text: &str, words: &str) -> bool {
    match text.strip_suffix(words) {
        Some("") => true,
        Some(rest) => rest.ends_with(char::is_whitespace),
        None => false,
    }
}

fn starts_with_pronoun(folded: &str) -> bool {
    folded
        .split_whitespace()
        .next()
        .map(|word| word.trim_end_matches(|c: char| c.is_ascii_punctuation()))
        .is_some_and(|word| PRONOUN_SUBJECTS.contains(&word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtered(text: &str) -> bool {
        !classify(text).is_keep()
    }

    // =========================================================================
    // Links, placeholders, attachments
    // =========================================================================

    #[test]
    fn test_link_only() {
        assert_eq!(
            classify("https://example.com"),
            Classification::Filtered(FilterReason::LinkOnly)
        );
        assert!(filtered("http://example.com/path?q=1"));
        assert!(!filtered("Check this: https://example.com please"));
        assert!(!filtered("https://example.com is down"));
    }

    #[test]
    fn test_placeholders_ignore_case() {
        assert_eq!(
            classify("<Media omitted>"),
            Classification::Filtered(FilterReason::Placeholder)
        );
        assert!(filtered("image omitted"));
        assert!(filtered("This message was deleted"));
        assert!(filtered("You deleted this message"));
        assert!(!filtered("the image omitted a detail"));
    }

    #[test]
    fn test_attachment() {
        assert_eq!(
            classify("<attached: 00000387-PHOTO-2025-07-19.jpg>"),
            Classification::Filtered(FilterReason::Attachment)
        );
        assert!(filtered("<Attached: -12-AUDIO.opus>"));
        assert!(!filtered("<attached: >"));
        assert!(!filtered("<attached: photo.jpg"));
    }

    // =========================================================================
    // System notices
    // =========================================================================

    #[test]
    fn test_membership_suffixes() {
        assert_eq!(system_rule("Alice left"), Some(SystemRule::Membership));
        assert!(filtered("Bob joined."));
        assert!(filtered("Carol added you"));
        assert!(!filtered("Alice left her keys here"));
        assert!(!filtered("cleft"));
    }

    #[test]
    fn test_group_change_phrases() {
        assert!(filtered("Alice changed this group's icon"));
        assert!(filtered("Alice changed this group\u{2019}s icon"));
        assert!(filtered(
            "Messages and calls are end-to-end encrypted. No one outside of this chat can read them."
        ));
        assert!(filtered("Dan joined using this group's invite link"));
    }

    #[test]
    fn test_admin_status() {
        assert!(filtered("You're now an admin"));
        assert!(filtered("Alice is now an admin"));
        assert!(filtered("Bob is no longer an admin"));
        assert!(!filtered("admin is now an admin for the cafe team, right?"));
    }

    #[test]
    fn test_member_added() {
        assert_eq!(system_rule("John added Mary"), Some(SystemRule::MemberAdded));
        assert!(filtered("Mary-Jane O'Neil added Bob"));
        assert!(!filtered("I added you to my contacts"));
        assert!(!filtered("john added mary"));
        assert!(!filtered("Mom added a new photo"));
        assert!(!filtered("Dad added the milk"));
    }

    #[test]
    fn test_added_false_positive_is_preserved() {
        assert!(filtered("John added sugar"));
    }

    #[test]
    fn test_member_removed() {
        assert!(filtered("Alice removed Bob"));
        assert!(!filtered("I removed Bob"));
        assert!(!filtered("They removed Carol"));
        assert!(!filtered("Alice removed the stain"));
        assert!(!filtered("Alice removed her coat"));
    }

    #[test]
    fn test_group_created() {
        assert!(filtered("Alice created group \"Trip 2024\""));
        assert!(filtered("Alice created group \u{201C}Trip\u{201D}"));
        assert!(!filtered("We created group \"Trip\""));
        assert!(!filtered("Alice created group chats"));
    }

    #[test]
    fn test_subject_changed() {
        assert!(filtered("Alice changed the subject from \"Old\" to \"New\""));
        assert!(filtered("Alice changed the subject to \u{201C}New\u{201D}"));
        assert!(!filtered("Alice changed the subject to football"));
    }

    #[test]
    fn test_conversation_guard() {
        assert!(!filtered("John added Mary?"));
        assert!(!filtered("Alice left!"));
        assert!(!filtered("Someone left"));
        assert!(!filtered("The guy who left"));
        assert!(!filtered("Bob left yesterday"));
        assert!(!filtered("Say hi to the new member, Alice joined"));
        assert!(filtered("Whoever left"));
    }

    #[test]
    fn test_plain_conversation_kept() {
        for text in ["Hello everyone", "See you at 8", "Привет 👋", "ok"] {
            assert!(classify(text).is_keep(), "{text}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(FilterReason::LinkOnly.to_string(), "link only");
        assert_eq!(
            FilterReason::SystemNotice(SystemRule::MemberAdded).to_string(),
            "system notice (member added)"
        );
    }
}
