//! Live board updates over `/ws/events`.
//!
//! A new connection first receives a `board:snapshot` frame describing the
//! category picker and the quote area as they are right now, then every
//! bus event as `{"event_type": ..., "payload": ...}`.
//!
//! Clients narrow the stream by topic (`quotes`, `display`, `sync`) or by
//! exact event type:
//!
//! ```json
//! {"subscribe": "display"}
//! {"subscribe": "sync:pull"}
//! {"unsubscribe": "display"}
//! ```
//!
//! With nothing subscribed, everything is forwarded.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use quoteboard_core::{BroadcastEvent, QuoteBoard};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;

use super::SharedState;

/// Event type of the frame sent on connect.
const SNAPSHOT_EVENT: &str = "board:snapshot";

/// Event namespaces on the board's bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Topic {
    Quotes,
    Display,
    Sync,
}

impl Topic {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "quotes" => Some(Topic::Quotes),
            "display" => Some(Topic::Display),
            "sync" => Some(Topic::Sync),
            _ => None,
        }
    }

    /// Topic of an event type such as `display:render`.
    fn of(event_type: &str) -> Option<Self> {
        event_type.split_once(':').and_then(|(head, _)| Self::parse(head))
    }
}

/// Filter change sent by a client.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FilterRequest {
    Subscribe(String),
    Unsubscribe(String),
}

/// What one connection wants forwarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct EventFilter {
    topics: HashSet<Topic>,
    events: HashSet<String>,
}

impl EventFilter {
    fn apply(&mut self, request: FilterRequest) {
        match request {
            FilterRequest::Subscribe(name) => match Self::topic_name(&name) {
                Some(topic) => {
                    self.topics.insert(topic);
                }
                None => {
                    self.events.insert(name);
                }
            },
            FilterRequest::Unsubscribe(name) => match Self::topic_name(&name) {
                Some(topic) => {
                    self.topics.remove(&topic);
                }
                None => {
                    self.events.remove(&name);
                }
            },
        }
    }

    fn wants(&self, event_type: &str) -> bool {
        if self.topics.is_empty() && self.events.is_empty() {
            return true;
        }
        self.events.contains(event_type)
            || Topic::of(event_type).is_some_and(|t| self.topics.contains(&t))
    }

    /// `display` and `display:*` both name the whole topic.
    fn topic_name(name: &str) -> Option<Topic> {
        Topic::parse(name.strip_suffix(":*").unwrap_or(name))
    }
}

/// Current picker and quote area, for clients that connect mid-session.
fn snapshot(board: &QuoteBoard) -> BroadcastEvent {
    let selected = board.selected_category();
    BroadcastEvent::new(
        SNAPSHOT_EVENT,
        serde_json::json!({
            "options": board.category_options(),
            "selected": selected.value(),
            "content": board.content(),
        }),
    )
}

/// Handler for GET /ws/events
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<SharedState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<SharedState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut event_rx = state.context.event_bus.subscribe();
    let (filter_tx, filter_rx) = watch::channel(EventFilter::default());

    if let Ok(json) = serde_json::to_string(&snapshot(&state.context.board)) {
        if sender.send(Message::Text(json.into())).await.is_err() {
            return;
        }
    }

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            let Message::Text(text) = msg else { continue };
            match serde_json::from_str::<FilterRequest>(&text) {
                Ok(request) => {
                    log::debug!("WebSocket filter change: {:?}", request);
                    filter_tx.send_modify(|filter| filter.apply(request));
                }
                Err(_) => log::debug!("Ignoring unrecognized WebSocket message"),
            }
        }
    });

    let send_task = tokio::spawn(async move {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(count)) => {
                    log::warn!("WebSocket client missed {} board events", count);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            if !filter_rx.borrow().wants(&event.event_type) {
                continue;
            }
            let Ok(json) = serde_json::to_string(&event) else { continue };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    tokio::select! {
        _ = recv_task => {},
        _ = send_task => {},
    }

    log::debug!("WebSocket connection closed");
}

// ============================================================================
// TESTS
// ============================================================================
