//! Shared state for the HTTP server.

use quoteboard_core::QuoteboardContext;

/// Shared state available to all HTTP handlers.
#[derive(Clone)]
pub struct SharedState {
    /// Board, reconciler and event bus shared with the rest of the process.
    pub context: QuoteboardContext,
}

impl SharedState {
    pub fn new(context: QuoteboardContext) -> Self {
        Self { context }
    }
}
