//! QuoteBoard - the controller that owns the quote store.
//!
//! Every read and write of the collection goes through here. The board:
//!
//! 1. Hydrates the store from persistence (or the seed set) at load
//! 2. Persists synchronously after every mutation, rolling the store back
//!    when the save fails
//! 3. Re-renders category options whenever a mutation may have changed them
//! 4. Tells the display surface what to show and raises notifications
//! 5. Publishes what happened on the event bus
//!
//! ## Locking
//!
//! The store and the view state sit behind separate mutexes. Neither lock is
//! held while the other is taken, and neither is held across a call into
//! the display surface, so a surface may call back into the board.
//!
//! Deferred sync callbacks (see [`crate::sync`]) mutate through the same
//! store mutex. A Pull that was started before a user Add can land after
//! it; each mutation is still applied and persisted atomically.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rand::Rng;
use thiserror::Error;

use crate::event_bus::{EventBus, QUOTES_ADDED, QUOTES_IMPORTED, QUOTES_MERGED};
use crate::persistence::{PersistenceAdapter, PersistenceError};
use crate::quotes::{
    categories, category_options, pick_random, seed_quotes, CategoryFilter, CategoryOption, Quote,
    QuoteStore, StoreError, NO_QUOTES_MESSAGE,
};
use crate::surface::{DisplayContent, DisplaySurface};
use crate::sync::reconciler::{merge_remote, PullReport, PushOutcome};
use crate::transfer::{
    export_quotes, parse_import, FileExchange, TransferError, EXPORT_FILE_NAME,
    IMPORT_FAILURE_MESSAGE, IMPORT_SUCCESS_MESSAGE,
};

pub const ADD_SUCCESS_MESSAGE: &str = "Quote added successfully!";
pub const SAVE_FAILURE_MESSAGE: &str = "Could not save quotes. Your change was not kept.";

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Export failed: {0}")]
    Export(#[source] std::io::Error),
}

/// What the board is currently showing.
struct ViewState {
    filter: CategoryFilter,
    content: DisplayContent,
}

/// Owner of the quote collection and its presentation.
pub struct QuoteBoard {
    store: Mutex<QuoteStore>,
    view: Mutex<ViewState>,
    persistence: PersistenceAdapter,
    surface: Arc<dyn DisplaySurface>,
    event_bus: Arc<EventBus>,
}

impl QuoteBoard {
    /// Hydrate a board from persistence.
    ///
    /// Falls back to the seed set when nothing has been saved. A saved but
    /// unreadable collection is an error; the seed set is not substituted.
    pub fn load(
        persistence: PersistenceAdapter,
        surface: Arc<dyn DisplaySurface>,
        event_bus: Arc<EventBus>,
    ) -> Result<Self, BoardError> {
        let quotes = match persistence.load_quotes()? {
            Some(saved) => {
                log::info!("Loaded {} persisted quotes", saved.len());
                saved
            }
            None => {
                log::info!("No persisted quotes, starting from the seed set");
                seed_quotes()
            }
        };

        Ok(Self::with_quotes(quotes, persistence, surface, event_bus))
    }

    /// Build a board over an explicit collection (nothing is read).
    pub fn with_quotes(
        quotes: Vec<Quote>,
        persistence: PersistenceAdapter,
        surface: Arc<dyn DisplaySurface>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            store: Mutex::new(QuoteStore::from_quotes(quotes)),
            view: Mutex::new(ViewState {
                filter: CategoryFilter::All,
                content: DisplayContent::Blank,
            }),
            persistence,
            surface,
            event_bus,
        }
    }

    /// Startup sequence: render options, restore the last selected
    /// category, and show its quotes.
    pub fn init(&self) -> Result<Vec<Quote>, BoardError> {
        let filter = self.restore_selection()?;
        self.render_categories();
        self.filter_quotes(filter)
    }

    /// Make the last selected category current without rendering anything.
    pub fn restore_selection(&self) -> Result<CategoryFilter, BoardError> {
        let filter = self.persistence.load_last_category()?;
        log::debug!("Restoring last selected category: {}", filter);
        self.view.lock().unwrap().filter = filter.clone();
        Ok(filter)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Snapshot of the whole collection.
    pub fn quotes(&self) -> Vec<Quote> {
        self.store.lock().unwrap().all().to_vec()
    }

    pub fn quotes_in(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.store.lock().unwrap().by_category(filter)
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().unwrap().is_empty()
    }

    pub fn categories(&self) -> Vec<String> {
        categories(self.store.lock().unwrap().all())
    }

    pub fn category_options(&self) -> Vec<CategoryOption> {
        category_options(self.store.lock().unwrap().all())
    }

    pub fn selected_category(&self) -> CategoryFilter {
        self.view.lock().unwrap().filter.clone()
    }

    /// What is currently rendered.
    pub fn content(&self) -> DisplayContent {
        self.view.lock().unwrap().content.clone()
    }

    pub fn last_viewed(&self) -> Result<Option<String>, BoardError> {
        Ok(self.persistence.load_last_viewed()?)
    }

    // ========================================================================
    // Presentation
    // ========================================================================

    /// Select a category, remember it, and show every quote in it.
    pub fn filter_quotes(&self, filter: CategoryFilter) -> Result<Vec<Quote>, BoardError> {
        self.persistence.save_last_category(&filter)?;
        let quotes = self.quotes_in(&filter);
        self.view.lock().unwrap().filter = filter;

        if quotes.is_empty() {
            self.show(DisplayContent::Message {
                text: NO_QUOTES_MESSAGE.to_string(),
            });
        } else {
            self.show(DisplayContent::List {
                quotes: quotes.clone(),
            });
        }
        Ok(quotes)
    }

    /// Show one random quote from the selected category.
    pub fn show_random_quote(&self) -> Option<Quote> {
        self.show_random_quote_with(&mut rand::thread_rng())
    }

    /// [`show_random_quote`](Self::show_random_quote) with a caller-supplied RNG.
    pub fn show_random_quote_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Quote> {
        let filter = self.selected_category();
        let pool = self.quotes_in(&filter);

        match pick_random(&pool, rng) {
            Ok(quote) => {
                let quote = quote.clone();
                self.show(DisplayContent::Quote {
                    quote: quote.clone(),
                });
                if let Err(e) = self.persistence.save_last_viewed(&quote.text) {
                    log::warn!("Failed to record last viewed quote: {}", e);
                }
                Some(quote)
            }
            Err(e) => {
                self.show(DisplayContent::Message {
                    text: e.to_string(),
                });
                None
            }
        }
    }

    /// Save whatever is on screen as the session's last viewed quote.
    pub fn unload(&self) -> Result<(), BoardError> {
        let text = self.content().plain_text();
        self.persistence.save_last_viewed(&text)?;
        Ok(())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a user-entered quote.
    ///
    /// Validation and save failures are reported through the surface and
    /// returned; nothing is stored. On success the quote is persisted,
    /// category options are refreshed and a random quote is shown.
    pub fn add_quote(&self, text: &str, category: &str) -> Result<Quote, BoardError> {
        let result = {
            let mut store = self.store.lock().unwrap();
            let before = store.len();
            store
                .add(text, category)
                .map_err(BoardError::from)
                .and_then(|quote| self.commit(&mut store, before).map(|()| quote))
        };

        let added = match result {
            Ok(quote) => quote,
            Err(e) => {
                self.report_failure(&e);
                return Err(e);
            }
        };

        log::info!("Added quote in category '{}'", added.category);
        self.event_bus.emit(QUOTES_ADDED, &added);
        self.render_categories();
        self.surface.notify(ADD_SUCCESS_MESSAGE);
        self.show_random_quote();
        Ok(added)
    }

    /// Serialize the whole collection as an export document.
    pub fn export_quotes(&self) -> String {
        export_quotes(self.store.lock().unwrap().all())
    }

    /// Hand an export document to the file exchange as `quotes.json`.
    pub fn export_to(&self, exchange: &dyn FileExchange) -> Result<PathBuf, BoardError> {
        let document = self.export_quotes();
        let path = exchange
            .offer_download(EXPORT_FILE_NAME, &document)
            .map_err(BoardError::Export)?;
        log::info!("Exported {} quotes to {}", self.len(), path.display());
        Ok(path)
    }

    /// Validate an import document and append its quotes.
    ///
    /// Returns how many quotes were appended. On any failure the collection
    /// is left exactly as it was.
    pub fn import_quotes(&self, document: &str) -> Result<usize, BoardError> {
        let imported = match parse_import(document) {
            Ok(quotes) => quotes,
            Err(e) => {
                log::warn!("Rejected import document: {}", e);
                self.surface.notify(IMPORT_FAILURE_MESSAGE);
                return Err(e.into());
            }
        };

        let count = imported.len();
        let saved = {
            let mut store = self.store.lock().unwrap();
            let before = store.len();
            store.extend(imported);
            self.commit(&mut store, before)
        };
        if let Err(e) = saved {
            self.report_failure(&e);
            return Err(e);
        }

        log::info!("Imported {} quotes", count);
        self.event_bus
            .emit(QUOTES_IMPORTED, &serde_json::json!({ "count": count }));
        self.render_categories();
        self.show_random_quote();
        self.surface.notify(IMPORT_SUCCESS_MESSAGE);
        Ok(count)
    }

    /// Read an import document through the file exchange, then import it.
    pub fn import_from(&self, exchange: &dyn FileExchange, source: &Path) -> Result<usize, BoardError> {
        let document = match exchange.read_upload(source) {
            Ok(document) => document,
            Err(e) => {
                log::warn!("Failed to read {}: {}", source.display(), e);
                self.surface.notify(IMPORT_FAILURE_MESSAGE);
                return Err(TransferError::Read(e).into());
            }
        };
        self.import_quotes(&document)
    }

    /// Merge a remote quote list (Pull callback).
    pub fn merge_remote(&self, remote: Vec<Quote>) -> Result<PullReport, BoardError> {
        let merged = {
            let mut store = self.store.lock().unwrap();
            let before = store.len();
            let report = merge_remote(&mut store, remote);
            if report.added.is_empty() {
                Ok(report)
            } else {
                self.commit(&mut store, before).map(|()| report)
            }
        };
        let report = match merged {
            Ok(report) => report,
            Err(e) => {
                self.report_failure(&e);
                return Err(e);
            }
        };

        if !report.added.is_empty() {
            log::info!(
                "Merged {} remote quotes ({} already present)",
                report.added.len(),
                report.skipped.len()
            );
            self.event_bus.emit(QUOTES_MERGED, &report);
            self.render_categories();
        }
        Ok(report)
    }

    /// Apply a server acknowledgement (Push callback).
    ///
    /// The acknowledged quote is appended only if no local quote has the
    /// same text.
    pub fn accept_acknowledged(&self, quote: Quote) -> Result<PushOutcome, BoardError> {
        let applied = {
            let mut store = self.store.lock().unwrap();
            if store.contains_text(&quote.text) {
                Ok(PushOutcome::AlreadyPresent { quote })
            } else {
                let before = store.len();
                store.push(quote.clone());
                self.commit(&mut store, before)
                    .map(|()| PushOutcome::Inserted { quote })
            }
        };
        let outcome = match applied {
            Ok(outcome) => outcome,
            Err(e) => {
                self.report_failure(&e);
                return Err(e);
            }
        };

        if let PushOutcome::Inserted { quote } = &outcome {
            log::info!("Re-inserted acknowledged quote in '{}'", quote.category);
            self.event_bus.emit(QUOTES_ADDED, quote);
            self.render_categories();
        }
        Ok(outcome)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Save the store, or drop everything appended since `before`.
    fn commit(&self, store: &mut QuoteStore, before: usize) -> Result<(), BoardError> {
        self.persistence.save_quotes(store.all()).map_err(|e| {
            log::warn!(
                "Failed to persist {} quotes, rolling back to {}: {}",
                store.len(),
                before,
                e
            );
            store.truncate(before);
            BoardError::from(e)
        })
    }

    /// Must be called with no lock held.
    fn report_failure(&self, error: &BoardError) {
        match error {
            BoardError::Persistence(_) => self.surface.notify(SAVE_FAILURE_MESSAGE),
            other => self.surface.notify(&other.to_string()),
        }
    }

    fn render_categories(&self) {
        let options = self.category_options();
        let selected = self.selected_category();
        self.surface.render_categories(&options, selected.value());
    }

    fn show(&self, content: DisplayContent) {
        self.view.lock().unwrap().content = content.clone();
        self.surface.render(&content);
    }
}

// ============================================================================
// TESTS
// ============================================================================
