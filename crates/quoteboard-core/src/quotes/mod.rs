//! Quote domain: the store, its derived category index, and random selection.
//!
//! Everything in here is pure and synchronous. Persistence, rendering and
//! sync live elsewhere and act on these types through the
//! [`QuoteBoard`](crate::board::QuoteBoard).

pub mod categories;
pub mod selector;
pub mod store;
pub mod types;

pub use categories::{categories, category_options, CategoryOption};
pub use selector::{pick_random, SelectorError, NO_QUOTES_MESSAGE};
pub use store::{QuoteStore, StoreError};
pub use types::{seed_quotes, CategoryFilter, Quote, ALL_CATEGORIES, ALL_CATEGORIES_LABEL};
