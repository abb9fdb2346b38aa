//! Flat per-message record shared by the JSON and JSONL writers.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::Message;
use crate::config::OutputConfig;

/// Minimal message structure for structured output.
/// Only includes fields enabled in `OutputConfig`.
#[derive(Debug, Serialize)]
pub(crate) struct OutputRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub sender: &'a str,
    pub content: &'a str,
}

impl<'a> OutputRecord<'a> {
    pub fn new(msg: &'a Message, config: &OutputConfig) -> Self {
        Self {
            id: config.include_ids.then(|| msg.id().to_string()),
            timestamp: config
                .include_timestamps
                .then(|| msg.timestamp().to_rfc3339_opts(SecondsFormat::Secs, false)),
            sender: msg.sender(),
            content: msg.content(),
        }
    }
}
