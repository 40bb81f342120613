//! Pull and Push against a [`RemoteEndpoint`].
//!
//! # Conflict Policy
//!
//! Quotes are matched on exact text. When the remote and local copies share
//! a text, the local copy is kept and the remote one is reported as
//! skipped; categories are never overwritten from the remote side.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::board::{BoardError, QuoteBoard};
use crate::event_bus::{EventBus, SYNC_PULL, SYNC_PUSH};
use crate::quotes::{Quote, QuoteStore};

use super::remote::RemoteEndpoint;

/// Delay before a simulated server call completes.
pub const DEFAULT_REMOTE_LATENCY: Duration = Duration::from_millis(500);

/// Result of merging one remote listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullReport {
    /// Quotes appended locally, in remote order.
    pub added: Vec<Quote>,
    /// Texts that were already held locally.
    pub skipped: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Result of one Push acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PushOutcome {
    /// The acknowledged quote was missing locally and has been appended.
    Inserted { quote: Quote },
    /// A local quote with the same text already exists.
    AlreadyPresent { quote: Quote },
}

/// Append every remote quote whose text is not already in `store`.
///
/// A text repeated within `remote` is appended once.
pub fn merge_remote(store: &mut QuoteStore, remote: Vec<Quote>) -> PullReport {
    let mut known: HashSet<String> = store.all().iter().map(|q| q.text.clone()).collect();
    let mut added = Vec::new();
    let mut skipped = Vec::new();

    for quote in remote {
        if known.insert(quote.text.clone()) {
            store.push(quote.clone());
            added.push(quote);
        } else {
            log::debug!("Keeping local copy of remote quote: {}", quote.text);
            skipped.push(quote.text);
        }
    }

    PullReport {
        added,
        skipped,
        completed_at: Utc::now(),
    }
}

/// Runs Pull and Push as deferred tasks against a board.
pub struct Reconciler {
    board: Arc<QuoteBoard>,
    remote: Arc<dyn RemoteEndpoint>,
    event_bus: Arc<EventBus>,
    latency: Duration,
}

impl Reconciler {
    pub fn new(
        board: Arc<QuoteBoard>,
        remote: Arc<dyn RemoteEndpoint>,
        event_bus: Arc<EventBus>,
        latency: Duration,
    ) -> Self {
        Self {
            board,
            remote,
            event_bus,
            latency,
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Fetch the remote list and merge it after the simulated latency.
    ///
    /// Must be called from within a tokio runtime.
    pub fn pull(&self) -> JoinHandle<Result<PullReport, BoardError>> {
        let board = Arc::clone(&self.board);
        let remote = Arc::clone(&self.remote);
        let bus = Arc::clone(&self.event_bus);
        let latency = self.latency;

        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            let listed = remote.list();
            log::debug!("Remote listed {} quotes", listed.len());

            let report = board.merge_remote(listed).inspect_err(|e| {
                log::warn!("Pull failed: {}", e);
            })?;
            bus.emit(SYNC_PULL, &report);
            Ok::<_, BoardError>(report)
        })
    }

    /// Send one quote to the remote and apply its acknowledgement.
    ///
    /// Must be called from within a tokio runtime.
    pub fn push(&self, quote: Quote) -> JoinHandle<Result<PushOutcome, BoardError>> {
        let board = Arc::clone(&self.board);
        let remote = Arc::clone(&self.remote);
        let bus = Arc::clone(&self.event_bus);
        let latency = self.latency;

        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            let acknowledged = remote.create(&quote);

            let outcome = board.accept_acknowledged(acknowledged).inspect_err(|e| {
                log::warn!("Push failed: {}", e);
            })?;
            bus.emit(SYNC_PUSH, &outcome);
            Ok::<_, BoardError>(outcome)
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
