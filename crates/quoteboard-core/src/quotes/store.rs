//! In-memory quote store.
//!
//! The single source of truth during a session. The store is a plain owned
//! value with no I/O of its own; the [`QuoteBoard`](crate::board::QuoteBoard)
//! owns it behind a mutex and persists after every mutation.

use thiserror::Error;

use super::types::{CategoryFilter, Quote};

/// Errors reported by store mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Please enter a quote text and provide its category.")]
    Validation,
}

/// Ordered collection of quotes.
///
/// Insertion order is display order. There is no update or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given quotes, in order.
    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    /// Add a user-entered quote.
    ///
    /// Both fields are trimmed; if either ends up empty nothing is stored
    /// and [`StoreError::Validation`] is returned. On success the stored
    /// (trimmed) quote is returned.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote, StoreError> {
        let text = text.trim();
        let category = category.trim();

        if text.is_empty() || category.is_empty() {
            return Err(StoreError::Validation);
        }

        let quote = Quote::new(text, category);
        self.quotes.push(quote.clone());
        Ok(quote)
    }

    /// Append quotes as-is, without trimming or de-duplication.
    pub fn extend(&mut self, quotes: impl IntoIterator<Item = Quote>) {
        self.quotes.extend(quotes);
    }

    /// Append a single quote as-is.
    pub fn push(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    /// Drop everything past the first `len` quotes.
    ///
    /// Only the board uses this, to undo an append whose save failed.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.quotes.truncate(len);
    }

    /// All quotes, in insertion order.
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    /// Quotes passing the filter, in insertion order.
    pub fn by_category(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.quotes
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect()
    }

    /// Whether any stored quote has exactly this text.
    pub fn contains_text(&self, text: &str) -> bool {
        self.quotes.iter().any(|q| q.has_text(text))
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::types::seed_quotes;

    fn seeded() -> QuoteStore {
        QuoteStore::from_quotes(seed_quotes())
    }

    // ------------------------------------------------------------------------
    // add
    // ------------------------------------------------------------------------

    #[test]
    fn add_appends_to_seed_set() {
        let mut store = seeded();

        store.add("Test quote", "TestCat").unwrap();

        assert_eq!(store.all().len(), 9);
        assert_eq!(
            store.all().last().unwrap(),
            &Quote::new("Test quote", "TestCat")
        );
    }

    #[test]
    fn add_trims_both_fields() {
        let mut store = QuoteStore::new();

        let stored = store.add("  spaced out \n", "\tCat ").unwrap();

        assert_eq!(stored, Quote::new("spaced out", "Cat"));
        assert_eq!(store.all(), &[Quote::new("spaced out", "Cat")]);
    }

    #[test]
    fn add_grows_by_one_per_call_in_order() {
        let mut store = QuoteStore::new();
        let inputs = [("a", "x"), ("b", "y"), ("c", "x"), ("a", "x")];

        for (i, (text, category)) in inputs.iter().enumerate() {
            store.add(text, category).unwrap();
            assert_eq!(store.len(), i + 1);
        }

        let texts: Vec<_> = store.all().iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn add_rejects_blank_fields() {
        let mut store = seeded();
        let before = store.clone();

        for (text, category) in [("", "Cat"), ("Text", ""), ("   ", "Cat"), ("Text", " \t\n"), ("", "")] {
            assert_eq!(store.add(text, category), Err(StoreError::Validation));
        }

        assert_eq!(store, before);
    }

    #[test]
    fn validation_message_is_user_facing() {
        assert_eq!(
            StoreError::Validation.to_string(),
            "Please enter a quote text and provide its category."
        );
    }

    // ------------------------------------------------------------------------
    // by_category
    // ------------------------------------------------------------------------

    #[test]
    fn by_category_all_equals_all() {
        let mut store = seeded();
        assert_eq!(store.by_category(&CategoryFilter::All), store.all());

        store.add("extra", "Work").unwrap();
        assert_eq!(store.by_category(&CategoryFilter::All), store.all());

        let empty = QuoteStore::new();
        assert!(empty.by_category(&CategoryFilter::All).is_empty());
    }

    #[test]
    fn by_category_work_on_seed_set() {
        let store = seeded();

        let work = store.by_category(&CategoryFilter::Only("Work".into()));

        assert_eq!(work.len(), 1);
        assert_eq!(
            work[0].text,
            "The only way to do great work is to love what you do."
        );
    }

    #[test]
    fn by_category_keeps_insertion_order() {
        let mut store = QuoteStore::new();
        store.add("first", "A").unwrap();
        store.add("other", "B").unwrap();
        store.add("second", "A").unwrap();

        let a = store.by_category(&CategoryFilter::Only("A".into()));
        let texts: Vec<_> = a.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn by_category_unknown_is_empty() {
        let store = seeded();
        assert!(store
            .by_category(&CategoryFilter::Only("Nope".into()))
            .is_empty());
    }

    // ------------------------------------------------------------------------
    // extend / contains_text
    // ------------------------------------------------------------------------

    #[test]
    fn extend_does_not_validate_or_dedupe() {
        let mut store = QuoteStore::new();
        let odd = vec![Quote::new("", " "), Quote::new("", " ")];

        store.extend(odd.clone());

        assert_eq!(store.all(), odd.as_slice());
    }

    #[test]
    fn truncate_drops_only_the_tail() {
        let mut store = seeded();
        store.add("extra", "Work").unwrap();
        store.extend(vec![Quote::new("more", "X")]);

        store.truncate(8);

        assert_eq!(store, seeded());

        // Longer than the store is a no-op
        store.truncate(20);
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn contains_text_is_exact() {
        let store = seeded();
        assert!(store.contains_text("Stay hungry, stay foolish."));
        assert!(!store.contains_text("stay hungry, stay foolish."));
        assert!(!store.contains_text("Stay hungry, stay foolish. "));
    }
}
