//! Quote data types.
//!
//! # Data Model Overview
//!
//! A quote is a `{text, category}` pair and the only domain entity:
//!
//! ```json
//! { "text": "Stay hungry, stay foolish.", "category": "Motivation" }
//! ```
//!
//! Quotes carry no identifier. Two quotes are "the same" when their `text`
//! is byte-for-byte equal, which is what reconciliation keys on. Categories
//! are not stored anywhere; they are derived from the collection on demand.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Quote
// ============================================================================

/// A single quote.
///
/// Serialized with exactly two keys, `text` and `category`, which is both
/// the persisted format and the import/export document format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// The quote itself.
    pub text: String,

    /// Free-form category label (e.g. "Life", "Work").
    pub category: String,
}

impl Quote {
    /// Create a quote from anything string-like.
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Whether this quote has exactly the given text.
    pub fn has_text(&self, text: &str) -> bool {
        self.text == text
    }
}

// ============================================================================
// Category Filter
// ============================================================================

/// Wire value of the "every category" sentinel.
pub const ALL_CATEGORIES: &str = "all";

/// Display label of the "every category" sentinel.
pub const ALL_CATEGORIES_LABEL: &str = "All Categories";

/// A category selection: either every quote, or one exact category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a selection value. `"all"` is the sentinel; anything else is an
    /// exact category name (no trimming, no case folding).
    pub fn from_value(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    /// The value persisted and sent over the wire for this selection.
    pub fn value(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category,
        }
    }

    /// Whether a quote passes this filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => quote.category == *category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl From<Option<&str>> for CategoryFilter {
    fn from(value: Option<&str>) -> Self {
        value.map(CategoryFilter::from_value).unwrap_or_default()
    }
}

// ============================================================================
// Seed Set
// ============================================================================

/// The built-in quotes used when nothing has been persisted yet.
pub fn seed_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "Life is what happens while you're busy making other plans.",
            "Life",
        ),
        Quote::new(
            "The only way to do great work is to love what you do.",
            "Work",
        ),
        Quote::new(
            "Innovation distinguishes between a leader and a follower.",
            "Leadership",
        ),
        Quote::new("Stay hungry, stay foolish.", "Motivation"),
        Quote::new(
            "Success is not final, failure is not fatal: It is the courage to continue that counts.",
            "Failure",
        ),
        Quote::new(
            "The future belongs to those who believe in the beauty of their dreams.",
            "Dreams",
        ),
        Quote::new(
            "One day you will face many defeats but remember that defeat is a stepping stone to victory.",
            "Victory",
        ),
        Quote::new(
            "One day , the son will be greater than his father.",
            "Inheritance",
        ),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn quote_serializes_with_two_keys() {
        let quote = Quote::new("Stay hungry, stay foolish.", "Motivation");
        let value = serde_json::to_value(&quote).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["text"], "Stay hungry, stay foolish.");
        assert_eq!(object["category"], "Motivation");
    }

    #[test]
    fn filter_from_sentinel() {
        assert_eq!(CategoryFilter::from_value("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_value("Work"),
            CategoryFilter::Only("Work".to_string())
        );
        // The sentinel is case-sensitive
        assert_eq!(
            CategoryFilter::from_value("All"),
            CategoryFilter::Only("All".to_string())
        );
    }

    #[test]
    fn filter_value_roundtrips() {
        for value in ["all", "Work", "Inheritance"] {
            assert_eq!(CategoryFilter::from_value(value).value(), value);
        }
    }

    #[test]
    fn filter_matches_exactly() {
        let quote = Quote::new("x", "Work");
        assert!(CategoryFilter::All.matches(&quote));
        assert!(CategoryFilter::Only("Work".into()).matches(&quote));
        assert!(!CategoryFilter::Only("work".into()).matches(&quote));
        assert!(!CategoryFilter::Only("Work ".into()).matches(&quote));
    }

    #[test]
    fn filter_from_missing_value_is_all() {
        assert_eq!(CategoryFilter::from(None), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from(Some("Life")),
            CategoryFilter::Only("Life".into())
        );
    }

    #[test]
    fn seed_set_has_eight_distinct_categories() {
        let seed = seed_quotes();
        assert_eq!(seed.len(), 8);

        let categories: HashSet<_> = seed.iter().map(|q| q.category.as_str()).collect();
        assert_eq!(categories.len(), 8);
    }
}
