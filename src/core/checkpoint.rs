//! Content-hash checkpoint for idempotent re-exports.
//!
//! WhatsApp exports are cumulative: exporting the same chat next week yields
//! everything from this week again. A [`Checkpoint`] remembers the
//! [`MessageId`] of every message already written so the next run only emits
//! what's new.
//!
//! The file is JSON with a version tag and a sorted id list, and is saved
//! atomically (temp file + rename).
//!
//! # Example
//!
//! ```rust,no_run
//! use chatdoc::core::Checkpoint;
//! use chatdoc::parser::TranscriptParser;
//!
//! let mut checkpoint = Checkpoint::load("chat.checkpoint.json")?;
//! let transcript = TranscriptParser::new().parse_str("chat.txt", "[15/01/2024, 10:30:00] Alice: Hi")?;
//!
//! let fresh = checkpoint.retain_new(transcript.into_messages());
//! // ... write `fresh` somewhere ...
//! checkpoint.record(&fresh);
//! checkpoint.save()?;
//! # Ok::<(), chatdoc::ChatdocError>(())
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::Message;
use crate::error::{ChatdocError, Result};
use crate::message::MessageId;

/// On-disk format version.
pub const CHECKPOINT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointFile {
    version: u32,
    ids: BTreeSet<MessageId>,
}

/// Set of message ids already exported, bound to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    path: PathBuf,
    ids: BTreeSet<MessageId>,
}

impl Checkpoint {
    /// Creates an empty checkpoint that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ids: BTreeSet::new(),
        }
    }

    /// Loads the checkpoint at `path`. A missing file yields an empty one.
    ///
    /// # Errors
    ///
    /// Returns [`ChatdocError::Checkpoint`] if the file isn't a checkpoint
    /// of the current version, and [`ChatdocError::Io`] if it can't be read.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("checkpoint {} not found, starting empty", path.display());
                return Ok(Self::new(path));
            }
            Err(err) => return Err(err.into()),
        };

        let file: CheckpointFile = serde_json::from_str(&json)
            .map_err(|err| ChatdocError::checkpoint(&path, err.to_string()))?;
        if file.version != CHECKPOINT_VERSION {
            return Err(ChatdocError::checkpoint(
                &path,
                format!(
                    "unsupported version {} (expected {})",
                    file.version, CHECKPOINT_VERSION
                ),
            ));
        }

        debug!("checkpoint {}: {} known ids", path.display(), file.ids.len());
        Ok(Self {
            path,
            ids: file.ids,
        })
    }

    /// Returns the file this checkpoint is saved to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of recorded ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns `true` if `message` was recorded before.
    pub fn contains(&self, message: &Message) -> bool {
        self.ids.contains(&message.id())
    }

    /// Drops the messages that were recorded before, keeping order.
    pub fn retain_new(&self, messages: Vec<Message>) -> Vec<Message> {
        messages.into_iter().filter(|m| !self.contains(m)).collect()
    }

    /// Records `messages`; returns how many were not already known.
    pub fn record<'a, I>(&mut self, messages: I) -> usize
    where
        I: IntoIterator<Item = &'a Message>,
    {
        messages
            .into_iter()
            .filter(|m| self.ids.insert(m.id()))
            .count()
    }

    /// Writes the checkpoint atomically, creating parent directories.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = CheckpointFile {
            version: CHECKPOINT_VERSION,
            ids: self.ids.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp = PathBuf::from(temp_name);

        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        debug!("checkpoint {}: saved {} ids", self.path.display(), self.ids.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use tempfile::TempDir;

    fn message(minute: u32, content: &str) -> Message {
        let ts = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 15, 10, minute, 0)
            .unwrap();
        Message::new(ts, "Alice", content).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let checkpoint = Checkpoint::load(dir.path().join("none.json")).unwrap();
        assert!(checkpoint.is_empty());
    }

    #[test]
    fn test_record_and_retain_new() {
        let dir = TempDir::new().unwrap();
        let mut checkpoint = Checkpoint::new(dir.path().join("cp.json"));

        let first = vec![message(0, "a"), message(1, "b")];
        assert_eq!(checkpoint.record(&first), 2);
        assert_eq!(checkpoint.record(&first), 0);

        let next = vec![message(0, "a"), message(2, "c"), message(1, "b")];
        let fresh = checkpoint.retain_new(next);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].content(), "c");
    }

    #[test]
    fn test_sender_does_not_affect_identity() {
        let mut checkpoint = Checkpoint::new("unused.json");
        checkpoint.record(&[message(0, "same")]);

        let other = Message::new(message(0, "same").timestamp(), "Bob", "same").unwrap();
        assert!(checkpoint.contains(&other));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cp.json");

        let mut checkpoint = Checkpoint::new(&path);
        checkpoint.record(&[message(0, "a"), message(1, "b")]);
        checkpoint.save().unwrap();

        let loaded = Checkpoint::load(&path).unwrap();
        assert_eq!(loaded, checkpoint);
        assert!(loaded.contains(&message(1, "b")));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cp.json");
        std::fs::write(&path, "not json").unwrap();

        let err = Checkpoint::load(&path).unwrap_err();
        assert!(err.is_checkpoint());
    }

    #[test]
    fn test_wrong_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cp.json");
        std::fs::write(&path, r#"{"version":99,"ids":[]}"#).unwrap();

        let err = Checkpoint::load(&path).unwrap_err();
        assert!(err.is_checkpoint());
        assert!(err.to_string().contains("99"));
    }
}
