//! Category index.
//!
//! Categories are derived from the store every time they are asked for.
//! There is no cache to invalidate because the board is the only mutation
//! path and it re-renders the options after each mutation.

use serde::{Deserialize, Serialize};

use super::types::{Quote, ALL_CATEGORIES, ALL_CATEGORIES_LABEL};

/// One selectable entry in a category picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    /// Value sent back when this option is selected.
    pub value: String,
    /// Human-readable label.
    pub label: String,
}

impl CategoryOption {
    fn all() -> Self {
        Self {
            value: ALL_CATEGORIES.to_string(),
            label: ALL_CATEGORIES_LABEL.to_string(),
        }
    }

    fn category(name: &str) -> Self {
        Self {
            value: name.to_string(),
            label: name.to_string(),
        }
    }
}

/// Distinct categories in first-seen order.
pub fn categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for quote in quotes {
        if !seen.iter().any(|c| *c == quote.category) {
            seen.push(quote.category.clone());
        }
    }
    seen
}

/// Picker options: the "all" sentinel followed by every category.
pub fn category_options(quotes: &[Quote]) -> Vec<CategoryOption> {
    std::iter::once(CategoryOption::all())
        .chain(categories(quotes).iter().map(|c| CategoryOption::category(c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::types::seed_quotes;

    #[test]
    fn categories_in_first_seen_order() {
        let quotes = vec![
            Quote::new("1", "B"),
            Quote::new("2", "A"),
            Quote::new("3", "B"),
            Quote::new("4", "C"),
            Quote::new("5", "A"),
        ];

        assert_eq!(categories(&quotes), vec!["B", "A", "C"]);
    }

    #[test]
    fn categories_of_seed_set() {
        assert_eq!(
            categories(&seed_quotes()),
            vec![
                "Life",
                "Work",
                "Leadership",
                "Motivation",
                "Failure",
                "Dreams",
                "Victory",
                "Inheritance"
            ]
        );
    }

    #[test]
    fn categories_of_empty_collection() {
        assert!(categories(&[]).is_empty());
    }

    #[test]
    fn options_start_with_sentinel() {
        let options = category_options(&[Quote::new("x", "Work")]);

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, "all");
        assert_eq!(options[0].label, "All Categories");
        assert_eq!(options[1].value, "Work");
        assert_eq!(options[1].label, "Work");
    }

    #[test]
    fn options_for_empty_collection_is_just_sentinel() {
        let options = category_options(&[]);
        assert_eq!(options, vec![CategoryOption::all()]);
    }
}
