use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    routing::post,
    Json, Router,
};
use http::StatusCode;
use std::sync::Arc;

use crate::protocol::{INVALID_REQUEST, PARSE_ERROR};
use crate::rpc::SERVER_NAME;
use crate::util::{cors_layer_from_env, error_response, AppState};

/// Build the Axum router for the streamable HTTP transport: the MCP endpoint
/// at `/mcp` plus a `/status` page.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/mcp", post(mcp_post).get(mcp_get))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors_layer_from_env())
}

/// Service status endpoint exposing name, version, and available routes.
async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "transport": "http",
        "notes": state.rpc.store().len(),
        "routes": ["/status", "/mcp"]
    }))
}

/// One JSON-RPC frame per POST. Requests get their response as JSON;
/// notifications are acknowledged with 202 and an empty body. Frames that are
/// not valid JSON-RPC come back as 400 with the error body.
async fn mcp_post(State(state): State<Arc<AppState>>, body: String) -> Response {
    match state.rpc.handle_raw(&body) {
        None => StatusCode::ACCEPTED.into_response(),
        Some(resp) => {
            let malformed = resp
                .error
                .as_ref()
                .map(|e| e.code == PARSE_ERROR || e.code == INVALID_REQUEST)
                .unwrap_or(false);
            if malformed {
                (StatusCode::BAD_REQUEST, Json(resp)).into_response()
            } else {
                Json(resp).into_response()
            }
        }
    }
}

/// Stateless mode keeps no server event stream, so there is nothing to GET.
async fn mcp_get() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "this server is stateless; POST JSON-RPC messages to /mcp",
    )
}
