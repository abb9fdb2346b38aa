//! Building blocks of the transcript parser.
//!
//! Each stage is usable on its own; [`TranscriptParser`](crate::parser::TranscriptParser)
//! wires them together:
//!
//! 1. [`grammar`] decides whether a line opens a message.
//! 2. [`datetime`] resolves the opener's date and time.
//! 3. [`normalize`] strips invisible marks and the edit marker.
//! 4. [`classify`] separates content from noise.

pub mod classify;
pub mod datetime;
pub mod grammar;
pub mod normalize;

pub use classify::{Classification, FilterReason, SystemRule, classify};
pub use datetime::{ResolveError, resolve};
pub use grammar::{Grammar, LineMatch, looks_like_opener, match_line};
pub use normalize::{normalize_content, strip_control_chars, strip_edit_marker};
