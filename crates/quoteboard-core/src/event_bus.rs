//! Board event broadcasting.
//!
//! Every state change on the board (quotes added, imported or merged,
//! something rendered, a notification raised, a sync step finished) is
//! published here so that front-ends other than the one that triggered it
//! can follow along. The HTTP crate forwards these to WebSocket clients.
//!
//! # Event Types
//!
//! | event type        | payload                                   |
//! |-------------------|-------------------------------------------|
//! | `quotes:added`    | the stored [`Quote`](crate::quotes::Quote) |
//! | `quotes:imported` | `{ "count": n }`                          |
//! | `quotes:merged`   | [`PullReport`](crate::sync::PullReport)   |
//! | `display:categories` | `{ "options": [...], "selected": "all" }` |
//! | `display:render`  | [`DisplayContent`](crate::surface::DisplayContent) |
//! | `display:notify`  | `{ "message": "..." }`                    |
//! | `sync:pull`       | [`PullReport`](crate::sync::PullReport)   |
//! | `sync:push`       | [`PushOutcome`](crate::sync::PushOutcome) |
//!
//! # Example
//!
//! ```rust
//! use quoteboard_core::event_bus::{EventBus, QUOTES_ADDED};
//! use quoteboard_core::quotes::Quote;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.emit(QUOTES_ADDED, &Quote::new("Stay hungry, stay foolish.", "Motivation"));
//! assert_eq!(rx.try_recv().unwrap().event_type, QUOTES_ADDED);
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events beyond this many unread cause slow subscribers to lag.
const DEFAULT_CAPACITY: usize = 256;

pub const QUOTES_ADDED: &str = "quotes:added";
pub const QUOTES_IMPORTED: &str = "quotes:imported";
pub const QUOTES_MERGED: &str = "quotes:merged";
pub const DISPLAY_CATEGORIES: &str = "display:categories";
pub const DISPLAY_RENDER: &str = "display:render";
pub const DISPLAY_NOTIFY: &str = "display:notify";
pub const SYNC_PULL: &str = "sync:pull";
pub const SYNC_PUSH: &str = "sync:push";

/// An event type plus its JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastEvent {
    pub event_type: String,
    pub payload: serde_json::Value,
}

impl BroadcastEvent {
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }
}

/// Fan-out of board events to any number of subscribers.
///
/// Publishing never blocks and never fails: with no subscribers the event
/// is simply dropped.
pub struct EventBus {
    sender: broadcast::Sender<BroadcastEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Serialize `payload` and publish it under `event_type`.
    ///
    /// Returns how many subscribers the event reached.
    pub fn emit<T: Serialize>(&self, event_type: &str, payload: &T) -> usize {
        match serde_json::to_value(payload) {
            Ok(value) => self.emit_raw(BroadcastEvent::new(event_type, value)),
            Err(e) => {
                log::warn!("Dropping {} event, payload not serializable: {}", event_type, e);
                0
            }
        }
    }

    pub fn emit_raw(&self, event: BroadcastEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
