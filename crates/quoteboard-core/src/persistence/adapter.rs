//! Persistence adapter: typed access to the board's keys.
//!
//! # Keys
//!
//! | scope   | key                    | value                          |
//! |---------|------------------------|--------------------------------|
//! | local   | `quotes`               | JSON array of quotes           |
//! | local   | `lastSelectedCategory` | category value (`all` or name) |
//! | session | `lastViewedQuote`      | raw text last rendered         |
//!
//! The same key constant is used for reading and writing the selected
//! category so the preference always round-trips.

use std::sync::Arc;

use super::kv::KeyValueStore;
use super::PersistenceError;
use crate::quotes::{CategoryFilter, Quote};

pub const QUOTES_KEY: &str = "quotes";
pub const LAST_SELECTED_CATEGORY_KEY: &str = "lastSelectedCategory";
pub const LAST_VIEWED_QUOTE_KEY: &str = "lastViewedQuote";

/// Reads and writes board state through two key-value scopes.
#[derive(Clone)]
pub struct PersistenceAdapter {
    local: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    pub fn new(local: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { local, session }
    }

    // ------------------------------------------------------------------------
    // Quotes
    // ------------------------------------------------------------------------

    /// Load the persisted collection, or `None` if nothing was saved yet.
    ///
    /// A present-but-unparseable value is an error rather than `None`, so a
    /// corrupt file never silently turns into the seed set and then gets
    /// overwritten on the next save.
    pub fn load_quotes(&self) -> Result<Option<Vec<Quote>>, PersistenceError> {
        match self.local.get(QUOTES_KEY)? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    /// Persist the full collection.
    pub fn save_quotes(&self, quotes: &[Quote]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(quotes)?;
        self.local.set(QUOTES_KEY, &json)
    }

    // ------------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------------

    /// Last selected category, defaulting to the `all` sentinel.
    pub fn load_last_category(&self) -> Result<CategoryFilter, PersistenceError> {
        Ok(self
            .local
            .get(LAST_SELECTED_CATEGORY_KEY)?
            .map(|value| CategoryFilter::from_value(&value))
            .unwrap_or_default())
    }

    pub fn save_last_category(&self, filter: &CategoryFilter) -> Result<(), PersistenceError> {
        self.local.set(LAST_SELECTED_CATEGORY_KEY, filter.value())
    }

    /// Text of the last displayed quote in this session.
    pub fn load_last_viewed(&self) -> Result<Option<String>, PersistenceError> {
        self.session.get(LAST_VIEWED_QUOTE_KEY)
    }

    pub fn save_last_viewed(&self, text: &str) -> Result<(), PersistenceError> {
        self.session.set(LAST_VIEWED_QUOTE_KEY, text)
    }
}
