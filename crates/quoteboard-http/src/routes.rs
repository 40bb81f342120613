//! HTTP route handlers for command invocation.
//!
//! The main route is `/api/invoke/{command}` which accepts POST requests
//! with JSON body and dispatches to the appropriate board operation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use quoteboard_core::board::BoardError;
use quoteboard_core::{CategoryFilter, Quote};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::SharedState;

type Reply = (StatusCode, Json<InvokeResponse>);

/// Response format for command invocation.
#[derive(Debug, Serialize, Deserialize)]
pub struct InvokeResponse {
    /// Whether the command succeeded.
    pub success: bool,
    /// The result data (if successful).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Error message (if failed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request body for command invocation.
#[derive(Deserialize)]
pub struct InvokeRequest {
    /// Arguments for the command (optional).
    #[serde(default)]
    pub args: serde_json::Value,
}

/// Handler for POST /api/invoke/{command}
pub async fn invoke_handler(
    Path(command): Path<String>,
    State(state): State<Arc<SharedState>>,
    Json(request): Json<InvokeRequest>,
) -> Reply {
    log::debug!("HTTP invoke: {} with args: {:?}", command, request.args);

    match command.as_str() {
        // Reading
        "list_quotes" => dispatch_list_quotes(&state, request.args).await,
        "list_categories" => dispatch_list_categories(&state).await,
        "random_quote" => dispatch_random_quote(&state, request.args).await,
        "select_category" => dispatch_select_category(&state, request.args).await,

        // Mutating
        "add_quote" => dispatch_add_quote(&state, request.args).await,
        "export_quotes" => dispatch_export_quotes(&state).await,
        "import_quotes" => dispatch_import_quotes(&state, request.args).await,

        // Sync
        "sync_pull" => dispatch_sync_pull(&state).await,
        "sync_push" => dispatch_sync_push(&state, request.args).await,

        "get_data_dir" => dispatch_get_data_dir(&state).await,

        // Debug utility
        "echo" => ok(serde_json::json!({
            "command": command,
            "args": request.args,
        })),

        _ => (
            StatusCode::NOT_FOUND,
            Json(InvokeResponse {
                success: false,
                data: None,
                error: Some(format!("Unknown command: {}", command)),
            }),
        ),
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

fn ok(data: serde_json::Value) -> Reply {
    (
        StatusCode::OK,
        Json(InvokeResponse {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
}

fn ok_serialized<T: Serialize>(data: &T) -> Reply {
    ok(serde_json::to_value(data).unwrap_or_default())
}

fn failure(status: StatusCode, error: String) -> Reply {
    (
        status,
        Json(InvokeResponse {
            success: false,
            data: None,
            error: Some(error),
        }),
    )
}

fn missing(name: &str) -> Reply {
    failure(
        StatusCode::BAD_REQUEST,
        format!("Missing required argument: {}", name),
    )
}

/// User-input problems are 400; everything else is a server failure.
fn board_failure(error: BoardError) -> Reply {
    let status = match &error {
        BoardError::Store(_) | BoardError::Transfer(_) => StatusCode::BAD_REQUEST,
        BoardError::Persistence(_) | BoardError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    failure(status, error.to_string())
}

fn str_arg<'a>(args: &'a serde_json::Value, name: &str) -> Option<&'a str> {
    args.get(name).and_then(|v| v.as_str())
}

fn category_arg(args: &serde_json::Value) -> Option<CategoryFilter> {
    str_arg(args, "category").map(CategoryFilter::from_value)
}

// ============================================================================
// READ DISPATCHERS
// ============================================================================

async fn dispatch_list_quotes(state: &SharedState, args: serde_json::Value) -> Reply {
    let filter = category_arg(&args).unwrap_or_default();
    ok_serialized(&state.context.board.quotes_in(&filter))
}

async fn dispatch_list_categories(state: &SharedState) -> Reply {
    ok_serialized(&state.context.board.category_options())
}

/// With a `category` argument the selection changes first, as if the user
/// had picked it before asking for a quote.
async fn dispatch_random_quote(state: &SharedState, args: serde_json::Value) -> Reply {
    let board = &state.context.board;
    if let Some(filter) = category_arg(&args) {
        if let Err(e) = board.filter_quotes(filter) {
            return board_failure(e);
        }
    }

    match board.show_random_quote() {
        Some(quote) => ok_serialized(&quote),
        None => ok(serde_json::Value::Null),
    }
}

async fn dispatch_select_category(state: &SharedState, args: serde_json::Value) -> Reply {
    let filter = match category_arg(&args) {
        Some(f) => f,
        None => return missing("category"),
    };

    match state.context.board.filter_quotes(filter) {
        Ok(quotes) => ok_serialized(&quotes),
        Err(e) => board_failure(e),
    }
}

// ============================================================================
// MUTATION DISPATCHERS
// ============================================================================

async fn dispatch_add_quote(state: &SharedState, args: serde_json::Value) -> Reply {
    let text = match str_arg(&args, "text") {
        Some(t) => t,
        None => return missing("text"),
    };
    let category = match str_arg(&args, "category") {
        Some(c) => c,
        None => return missing("category"),
    };

    match state.context.board.add_quote(text, category) {
        Ok(quote) => ok_serialized(&quote),
        Err(e) => board_failure(e),
    }
}

async fn dispatch_export_quotes(state: &SharedState) -> Reply {
    ok(serde_json::Value::String(state.context.board.export_quotes()))
}

async fn dispatch_import_quotes(state: &SharedState, args: serde_json::Value) -> Reply {
    let document = match str_arg(&args, "document") {
        Some(d) => d,
        None => return missing("document"),
    };

    match state.context.board.import_quotes(document) {
        Ok(count) => ok(serde_json::json!({ "imported": count })),
        Err(e) => board_failure(e),
    }
}

// ============================================================================
// SYNC DISPATCHERS
// ============================================================================

async fn dispatch_sync_pull(state: &SharedState) -> Reply {
    match state.context.reconciler.pull().await {
        Ok(Ok(report)) => ok_serialized(&report),
        Ok(Err(e)) => board_failure(e),
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn dispatch_sync_push(state: &SharedState, args: serde_json::Value) -> Reply {
    let text = match str_arg(&args, "text") {
        Some(t) => t,
        None => return missing("text"),
    };
    let category = match str_arg(&args, "category") {
        Some(c) => c,
        None => return missing("category"),
    };

    let quote = Quote::new(text, category);
    match state.context.reconciler.push(quote).await {
        Ok(Ok(outcome)) => ok_serialized(&outcome),
        Ok(Err(e)) => board_failure(e),
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn dispatch_get_data_dir(state: &SharedState) -> Reply {
    match state.context.data_dir() {
        Some(dir) => ok(serde_json::json!(dir.to_string_lossy())),
        None => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Data directory not set".to_string(),
        ),
    }
}

// ============================================================================
// TESTS
// ============================================================================
