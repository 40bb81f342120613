//! Display surface capability.
//!
//! The board never draws anything itself. It describes what should be on
//! screen as a [`DisplayContent`] and hands it to a [`DisplaySurface`],
//! together with category options and blocking notifications.
//!
//! Implementations in this crate:
//!
//! - [`EventBusSurface`] - publishes everything on the event bus
//! - [`RecordingSurface`] - keeps everything in memory (headless runs, tests)

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::event_bus::{EventBus, DISPLAY_CATEGORIES, DISPLAY_NOTIFY, DISPLAY_RENDER};
use crate::quotes::{CategoryOption, Quote};

/// What the quote area currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DisplayContent {
    /// Nothing rendered yet.
    Blank,
    /// A single quote (random pick).
    Quote { quote: Quote },
    /// A filtered list of quotes.
    List { quotes: Vec<Quote> },
    /// Inline message in place of quotes (e.g. empty category).
    Message { text: String },
}

impl DisplayContent {
    /// The plain text of what is on screen, as saved on unload.
    ///
    /// A single quote yields its raw text; a list yields each text on its
    /// own line.
    pub fn plain_text(&self) -> String {
        match self {
            DisplayContent::Blank => String::new(),
            DisplayContent::Quote { quote } => quote.text.clone(),
            DisplayContent::List { quotes } => quotes
                .iter()
                .map(|q| q.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            DisplayContent::Message { text } => text.clone(),
        }
    }
}

/// Where the board renders.
pub trait DisplaySurface: Send + Sync {
    /// Replace the category picker options.
    fn render_categories(&self, options: &[CategoryOption], selected: &str);

    /// Replace the quote area.
    fn render(&self, content: &DisplayContent);

    /// Blocking notification (validation failures, import results, ...).
    fn notify(&self, message: &str);
}

// ============================================================================
// EVENT BUS SURFACE
// ============================================================================

#[derive(Serialize)]
struct NotifyPayload<'a> {
    message: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoriesPayload<'a> {
    options: &'a [CategoryOption],
    selected: &'a str,
}

/// Surface that publishes to an [`EventBus`] for remote clients to draw.
pub struct EventBusSurface {
    bus: Arc<EventBus>,
}

impl EventBusSurface {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }
}

impl DisplaySurface for EventBusSurface {
    fn render_categories(&self, options: &[CategoryOption], selected: &str) {
        self.bus
            .emit(DISPLAY_CATEGORIES, &CategoriesPayload { options, selected });
    }

    fn render(&self, content: &DisplayContent) {
        self.bus.emit(DISPLAY_RENDER, content);
    }

    fn notify(&self, message: &str) {
        self.bus.emit(DISPLAY_NOTIFY, &NotifyPayload { message });
    }
}

// ============================================================================
// RECORDING SURFACE
// ============================================================================

#[derive(Debug, Default)]
struct Recorded {
    options: Vec<CategoryOption>,
    selected: String,
    content: Option<DisplayContent>,
    notifications: Vec<String>,
}

/// Surface that remembers the latest render and every notification.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    inner: Mutex<Recorded>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> Vec<CategoryOption> {
        self.inner.lock().unwrap().options.clone()
    }

    pub fn selected(&self) -> String {
        self.inner.lock().unwrap().selected.clone()
    }

    pub fn content(&self) -> Option<DisplayContent> {
        self.inner.lock().unwrap().content.clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.inner.lock().unwrap().notifications.clone()
    }

    pub fn last_notification(&self) -> Option<String> {
        self.inner.lock().unwrap().notifications.last().cloned()
    }
}

impl DisplaySurface for RecordingSurface {
    fn render_categories(&self, options: &[CategoryOption], selected: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.options = options.to_vec();
        inner.selected = selected.to_string();
    }

    fn render(&self, content: &DisplayContent) {
        self.inner.lock().unwrap().content = Some(content.clone());
    }

    fn notify(&self, message: &str) {
        self.inner
            .lock()
            .unwrap()
            .notifications
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::category_options;

    #[test]
    fn plain_text_of_each_content_kind() {
        assert_eq!(DisplayContent::Blank.plain_text(), "");
        assert_eq!(
            DisplayContent::Quote {
                quote: Quote::new("one", "c")
            }
            .plain_text(),
            "one"
        );
        assert_eq!(
            DisplayContent::List {
                quotes: vec![Quote::new("a", "c"), Quote::new("b", "c")]
            }
            .plain_text(),
            "a\nb"
        );
        assert_eq!(
            DisplayContent::Message {
                text: "No quotes available in this category.".into()
            }
            .plain_text(),
            "No quotes available in this category."
        );
    }

    #[test]
    fn content_is_tagged_by_kind() {
        let json = serde_json::to_value(DisplayContent::Quote {
            quote: Quote::new("x", "y"),
        })
        .unwrap();
        assert_eq!(json["kind"], "quote");
        assert_eq!(json["quote"]["text"], "x");
    }

    #[tokio::test]
    async fn event_bus_surface_publishes() {
        let bus = Arc::new(EventBus::new());
        let mut rx = bus.subscribe();
        let surface = EventBusSurface::new(Arc::clone(&bus));

        surface.render_categories(&category_options(&[Quote::new("x", "Work")]), "all");
        surface.render(&DisplayContent::Message { text: "hi".into() });
        surface.notify("Quote added successfully!");

        let categories = rx.recv().await.unwrap();
        assert_eq!(categories.event_type, DISPLAY_CATEGORIES);
        assert_eq!(categories.payload["options"][1]["value"], "Work");
        assert_eq!(categories.payload["selected"], "all");

        let render = rx.recv().await.unwrap();
        assert_eq!(render.event_type, DISPLAY_RENDER);
        assert_eq!(render.payload["kind"], "message");

        let notify = rx.recv().await.unwrap();
        assert_eq!(notify.event_type, DISPLAY_NOTIFY);
        assert_eq!(notify.payload["message"], "Quote added successfully!");
    }

    #[test]
    fn recording_surface_keeps_latest_render() {
        let surface = RecordingSurface::new();
        assert!(surface.content().is_none());

        surface.render(&DisplayContent::Blank);
        surface.render(&DisplayContent::Message { text: "m".into() });
        surface.notify("a");
        surface.notify("b");

        assert_eq!(
            surface.content(),
            Some(DisplayContent::Message { text: "m".into() })
        );
        assert_eq!(surface.notifications(), vec!["a", "b"]);
        assert_eq!(surface.last_notification().as_deref(), Some("b"));
    }
}
