//! # quoteboard-core
//!
//! Core logic for Quoteboard, a categorized quote collection with
//! persistence, import/export and simulated server sync.
//!
//! This crate is framework-agnostic and is used by:
//! - the `quoteboard` CLI (one-shot commands and `serve`)
//! - the HTTP server (REST invoke endpoint + WebSocket events)
//!
//! ## Key Concepts
//!
//! - **Quote**: a `{text, category}` pair; identity is the exact text
//! - **QuoteBoard**: owner of the collection; every mutation is persisted
//!   and published
//! - **Reconciler**: deferred Pull/Push against a remote endpoint

pub mod board;
pub mod config;
pub mod context;
pub mod event_bus;
pub mod paths;
pub mod persistence;
pub mod quotes;
pub mod surface;
pub mod sync;
pub mod transfer;

// Re-export commonly used types
pub use board::{BoardError, QuoteBoard};
pub use config::{ConfigError, QuoteboardConfig};
pub use context::{QuoteboardContext, QuoteboardContextBuilder};
pub use event_bus::{BroadcastEvent, EventBus};
pub use quotes::{CategoryFilter, Quote};
pub use surface::{DisplayContent, DisplaySurface};
