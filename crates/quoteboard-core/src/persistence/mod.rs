//! Persistence layer for quotes and preferences.
//!
//! # Overview
//!
//! State is split across two key-value scopes:
//!
//! - **local** - the quote collection and the last selected category;
//!   survives restarts
//! - **session** - the last viewed quote; gone when the process exits
//!
//! # File Locations
//!
//! With the default file-backed local scope, data lives under the data dir:
//!
//! ```text
//! ~/.config/quoteboard/            (or --data-dir)
//! ├── config.json                  # QuoteboardConfig
//! ├── local.json                   # local key-value scope
//! └── quotes.json                  # default export target
//! ```
//!
//! # Atomic Writes
//!
//! File-backed saves write to `<file>.tmp` and rename over the target, so
//! a crash mid-write leaves the previous contents intact.

pub mod adapter;
pub mod kv;

use thiserror::Error;

pub use adapter::{
    PersistenceAdapter, LAST_SELECTED_CATEGORY_KEY, LAST_VIEWED_QUOTE_KEY, QUOTES_KEY,
};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};

/// Error type for persistence operations.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
