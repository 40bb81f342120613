//! HTTP server for browser-based access to a quote board.
//!
//! Exposes board operations via `POST /api/invoke/{command}` and board
//! events via the `/ws/events` WebSocket.

mod routes;
mod state;
mod websocket;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

pub use routes::{InvokeRequest, InvokeResponse};
pub use state::SharedState;

/// Handle to a running HTTP server.
#[derive(Default)]
pub struct HttpServerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<std::thread::JoinHandle<()>>,
}

impl HttpServerHandle {
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }

    /// Stop the server gracefully and wait for its thread.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.join();
        }
    }
}

/// Build the application router.
///
/// When `static_dir` is given, unmatched paths are served from it.
pub fn router(state: Arc<SharedState>, static_dir: Option<String>) -> Router {
    let app = Router::new()
        .route("/api/invoke/{command}", post(routes::invoke_handler))
        .route("/ws/events", get(websocket::ws_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    }
}

/// Start the HTTP server on the given host and port.
///
/// The server runs in a separate thread with its own tokio runtime.
pub fn start(
    state: Arc<SharedState>,
    host: String,
    port: u16,
    static_dir: Option<String>,
) -> Result<HttpServerHandle, String> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let task = std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create HTTP server runtime: {}", e);
                return;
            }
        };

        rt.block_on(async move {
            let app = router(state, static_dir);

            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    log::error!("Failed to bind HTTP server to {}: {}", addr, e);
                    return;
                }
            };

            log::info!("HTTP server listening on http://{}", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                    log::info!("HTTP server shutting down");
                })
                .await
                .ok();
        });
    });

    Ok(HttpServerHandle {
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quoteboard_core::QuoteboardContext;

    fn state() -> Arc<SharedState> {
        Arc::new(SharedState::new(
            QuoteboardContext::builder().build().unwrap(),
        ))
    }

    #[test]
    fn http_server_handle_default() {
        let handle = HttpServerHandle::default();
        assert!(!handle.is_running());
    }

    #[test]
    fn invalid_address_is_rejected() {
        let result = start(state(), "not an ip".to_string(), 80, None);
        assert!(result.is_err());
    }

    #[test]
    fn server_starts_and_stops() {
        let port = 19877;
        let mut handle = start(state(), "127.0.0.1".to_string(), port, None).unwrap();
        assert!(handle.is_running());

        std::thread::sleep(std::time::Duration::from_millis(100));

        handle.stop();
        assert!(!handle.is_running());
    }
}
