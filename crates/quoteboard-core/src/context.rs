//! QuoteboardContext - shared state for every front-end.
//!
//! The CLI and the HTTP server both operate on one of these. It wires:
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │    QuoteboardContext     │
//!                 ├──────────────────────────┤
//!                 │  - EventBus              │
//!                 │  - QuoteBoard            │──▶ PersistenceAdapter
//!                 │  - Reconciler            │──▶ RemoteEndpoint
//!                 │  - QuoteboardConfig      │
//!                 │  - data_dir              │
//!                 └────────────┬─────────────┘
//!                              │
//!                ┌─────────────┴─────────────┐
//!                ▼                           ▼
//!         ┌─────────────┐             ┌─────────────┐
//!         │     CLI     │             │ HTTP Server │
//!         └─────────────┘             └─────────────┘
//! ```
//!
//! With a data dir the local scope is `<data_dir>/local.json`; without one
//! everything stays in memory.

use std::path::PathBuf;
use std::sync::Arc;

use crate::board::{BoardError, QuoteBoard};
use crate::config::QuoteboardConfig;
use crate::event_bus::EventBus;
use crate::persistence::{JsonFileStore, KeyValueStore, MemoryStore, PersistenceAdapter};
use crate::surface::{DisplaySurface, EventBusSurface};
use crate::sync::{Reconciler, RemoteEndpoint, SimulatedRemote};
use crate::transfer::DirectoryExchange;

/// Scope name of the file-backed local store.
pub const LOCAL_SCOPE: &str = "local";

#[derive(Default)]
pub struct QuoteboardContextBuilder {
    data_dir: Option<PathBuf>,
    config: Option<QuoteboardConfig>,
    event_bus: Option<Arc<EventBus>>,
    surface: Option<Arc<dyn DisplaySurface>>,
    local_store: Option<Arc<dyn KeyValueStore>>,
    session_store: Option<Arc<dyn KeyValueStore>>,
    remote: Option<Arc<dyn RemoteEndpoint>>,
}

impl QuoteboardContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding `local.json` and the default export target.
    pub fn data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = Some(dir);
        self
    }

    pub fn config(mut self, config: QuoteboardConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Where the board renders. Defaults to publishing on the event bus.
    pub fn surface(mut self, surface: Arc<dyn DisplaySurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Override the local scope (takes precedence over `data_dir`).
    pub fn local_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.local_store = Some(store);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn remote(mut self, remote: Arc<dyn RemoteEndpoint>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Hydrate the board and wire everything together.
    pub fn build(self) -> Result<QuoteboardContext, BoardError> {
        let config = self.config.unwrap_or_default();
        let event_bus = self.event_bus.unwrap_or_else(|| Arc::new(EventBus::new()));
        let surface = self
            .surface
            .unwrap_or_else(|| Arc::new(EventBusSurface::new(Arc::clone(&event_bus))));

        let local = match (self.local_store, &self.data_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => Arc::new(JsonFileStore::in_dir(dir, LOCAL_SCOPE)),
            (None, None) => Arc::new(MemoryStore::new()),
        };
        let session = self
            .session_store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let remote = self
            .remote
            .unwrap_or_else(|| Arc::new(SimulatedRemote::new()));

        let persistence = PersistenceAdapter::new(local, session);
        let board = Arc::new(QuoteBoard::load(
            persistence,
            surface,
            Arc::clone(&event_bus),
        )?);
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&board),
            remote,
            Arc::clone(&event_bus),
            config.remote_latency(),
        ));

        Ok(QuoteboardContext {
            event_bus,
            board,
            reconciler,
            config,
            data_dir: self.data_dir,
        })
    }
}

/// Cloning shares the same board, bus and reconciler.
#[derive(Clone)]
pub struct QuoteboardContext {
    pub event_bus: Arc<EventBus>,
    pub board: Arc<QuoteBoard>,
    pub reconciler: Arc<Reconciler>,
    pub config: QuoteboardConfig,
    data_dir: Option<PathBuf>,
}

impl QuoteboardContext {
    pub fn builder() -> QuoteboardContextBuilder {
        QuoteboardContextBuilder::new()
    }

    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone()
    }

    /// File exchange rooted at the data dir, or the working directory.
    pub fn exchange(&self) -> DirectoryExchange {
        DirectoryExchange::new(self.data_dir.clone().unwrap_or_else(|| PathBuf::from(".")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::Quote;
    use crate::surface::RecordingSurface;
    use tempfile::tempdir;

    #[test]
    fn builder_defaults_to_memory_and_seed_set() {
        let ctx = QuoteboardContext::builder().build().unwrap();

        assert!(ctx.data_dir().is_none());
        assert_eq!(ctx.board.len(), 8);
        assert_eq!(ctx.config, QuoteboardConfig::default());
        assert_eq!(ctx.reconciler.latency().as_millis(), 500);
    }

    #[test]
    fn builder_uses_provided_event_bus() {
        let bus = Arc::new(EventBus::new());
        let ctx = QuoteboardContext::builder()
            .event_bus(Arc::clone(&bus))
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(&ctx.event_bus, &bus));
    }

    #[test]
    fn data_dir_backs_local_scope_across_contexts() {
        let dir = tempdir().unwrap();

        let first = QuoteboardContext::builder()
            .data_dir(dir.path().to_path_buf())
            .surface(Arc::new(RecordingSurface::new()))
            .build()
            .unwrap();
        first.board.add_quote("kept", "Disk").unwrap();
        assert!(dir.path().join("local.json").exists());

        let second = QuoteboardContext::builder()
            .data_dir(dir.path().to_path_buf())
            .build()
            .unwrap();
        assert_eq!(second.board.len(), 9);
        assert!(second.board.quotes().contains(&Quote::new("kept", "Disk")));
    }

    #[test]
    fn default_surface_publishes_on_bus() {
        let ctx = QuoteboardContext::builder().build().unwrap();
        let mut rx = ctx.event_bus.subscribe();

        ctx.board.init().unwrap();

        let first = rx.try_recv().unwrap();
        assert_eq!(first.event_type, crate::event_bus::DISPLAY_CATEGORIES);
    }

    #[test]
    fn exchange_roots_at_data_dir() {
        let dir = tempdir().unwrap();
        let ctx = QuoteboardContext::builder()
            .data_dir(dir.path().to_path_buf())
            .build()
            .unwrap();
        assert_eq!(ctx.exchange().dir(), dir.path());
    }

    #[test]
    fn clones_share_board() {
        let ctx = QuoteboardContext::builder().build().unwrap();
        let ctx2 = ctx.clone();
        assert!(Arc::ptr_eq(&ctx.board, &ctx2.board));
    }
}
