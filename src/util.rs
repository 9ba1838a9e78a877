use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize dotenv and structured tracing based on RUST_LOG.
///
/// - An explicit env file can be given via ENV_FILE; otherwise standard .env
///   discovery applies.
/// - All output goes to stderr. The stdio transport owns stdout for protocol
///   frames, so nothing else may ever write there.
pub fn init_tracing() {
    let mut env_source: String = "none".into();
    if let Ok(p) = std::env::var("ENV_FILE") {
        let p = p.trim();
        if !p.is_empty() && std::path::Path::new(p).is_file() && dotenvy::from_filename(p).is_ok() {
            env_source = format!("{p} (ENV_FILE)");
        }
    }
    if env_source == "none" && dotenvy::dotenv().is_ok() {
        env_source = ".env".into();
    }

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=info".into());
    let subscriber = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("Environment loaded from: {}", env_source);
}

/// Shared application state used by the HTTP server and handlers.
pub struct AppState {
    pub rpc: crate::rpc::McpHandler,
}

/// Build a JSON error response with the given HTTP status and message.
pub fn error_response(status: StatusCode, msg: &str) -> Response {
    let body = serde_json::json!({ "error": { "message": msg } });
    (status, axum::Json(body)).into_response()
}

/// Build a CORS layer from environment variables.
///
/// Environment variables:
/// - CORS_ALLOWED_ORIGINS: "*" or comma-separated origins
/// - CORS_ALLOWED_METHODS: "*" or comma-separated methods
/// - CORS_ALLOWED_HEADERS: "*" or comma-separated request header names
///
/// Defaults are permissive (Any) when not configured.
pub fn cors_layer_from_env() -> tower_http::cors::CorsLayer {
    use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

    let mut layer = CorsLayer::new();

    layer = match csv_env("CORS_ALLOWED_ORIGINS") {
        Some(parts) => {
            let vals: Vec<http::HeaderValue> = parts
                .iter()
                .filter_map(|p| http::HeaderValue::from_str(p).ok())
                .collect();
            if vals.is_empty() {
                layer.allow_origin(Any)
            } else {
                layer.allow_origin(AllowOrigin::list(vals))
            }
        }
        None => layer.allow_origin(Any),
    };

    layer = match csv_env("CORS_ALLOWED_METHODS") {
        Some(parts) => {
            let vals: Vec<http::Method> = parts
                .iter()
                .filter_map(|p| http::Method::from_bytes(p.to_ascii_uppercase().as_bytes()).ok())
                .collect();
            if vals.is_empty() {
                layer.allow_methods(Any)
            } else {
                layer.allow_methods(AllowMethods::list(vals))
            }
        }
        None => layer.allow_methods(Any),
    };

    layer = match csv_env("CORS_ALLOWED_HEADERS") {
        Some(parts) => {
            let vals: Vec<http::HeaderName> = parts
                .iter()
                .filter_map(|p| http::header::HeaderName::try_from(p.as_str()).ok())
                .collect();
            if vals.is_empty() {
                layer.allow_headers(Any)
            } else {
                layer.allow_headers(AllowHeaders::list(vals))
            }
        }
        None => layer.allow_headers(Any),
    };

    layer
}

/// Read a comma-separated env var. `None` means unset or "*" (treat as Any).
fn csv_env(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    let s = raw.trim();
    if s.is_empty() || s == "*" {
        return None;
    }
    Some(
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
    )
}
