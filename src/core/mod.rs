//! Everything downstream of the parser.
//!
//! This module contains:
//! - [`filter`] - Message filtering by date and sender
//! - [`checkpoint`] - Content-hash checkpoint for idempotent re-exports
//! - [`output`] - Format writers (text, document, CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! use chatdoc::core::{Checkpoint, Document, FilterConfig, apply_filters, to_text};
//! ```

pub mod checkpoint;
pub mod filter;
pub mod output;

// Re-export main types for convenience
pub use checkpoint::Checkpoint;
pub use filter::{FilterConfig, apply_filters};
pub use output::{Document, Section, to_document, to_text, write_document, write_text};

// Conditionally re-export output writers
#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
