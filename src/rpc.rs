use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::protocol::{
    JsonRpcMessage, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::store::NoteStore;
use crate::tools::{call_tool, ToolError, TOOLS};

/// Protocol revisions this server can speak, newest first. The first entry is
/// what we fall back to when the client requests something we don't know.
const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-03-26", "2024-11-05"];

pub const SERVER_NAME: &str = "mcp-notes";

/// Transport-independent MCP dispatcher. Both the HTTP endpoint and the stdio
/// loop feed raw frames through [`McpHandler::handle_raw`].
#[derive(Clone)]
pub struct McpHandler {
    store: Arc<NoteStore>,
}

impl McpHandler {
    pub fn new(store: Arc<NoteStore>) -> Self {
        McpHandler { store }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Parse one inbound text frame and dispatch it. `None` means the frame
    /// must not be answered (a notification, or a stray client response).
    pub fn handle_raw(&self, raw: &str) -> Option<JsonRpcMessage> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                debug!("discarding unparseable frame: {e}");
                return Some(JsonRpcMessage::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("parse error: {e}"),
                ));
            }
        };

        if value.is_array() {
            return Some(JsonRpcMessage::error(
                Value::Null,
                INVALID_REQUEST,
                "batch requests are not supported",
            ));
        }

        let message: JsonRpcMessage = match serde_json::from_value(value) {
            Ok(m) => m,
            Err(e) => {
                return Some(JsonRpcMessage::error(
                    Value::Null,
                    INVALID_REQUEST,
                    format!("invalid request: {e}"),
                ))
            }
        };

        self.handle_message(message)
    }

    /// Dispatch a decoded message.
    pub fn handle_message(&self, message: JsonRpcMessage) -> Option<JsonRpcMessage> {
        if message.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcMessage::error(
                message.id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "unsupported jsonrpc version",
            ));
        }

        if message.is_notification() {
            self.handle_notification(&message);
            return None;
        }

        if !message.is_request() {
            // A response from the client. Nothing here ever sends requests to
            // the client, so there is nothing to correlate it with.
            debug!("ignoring client response frame");
            return None;
        }

        let id = message.id.clone().unwrap_or(Value::Null);
        let method = message.method.as_deref().unwrap_or_default();
        let params = message.params.unwrap_or(Value::Null);

        let response = match method {
            "initialize" => JsonRpcMessage::result(id, self.initialize(&params)),
            "ping" => JsonRpcMessage::result(id, json!({})),
            "tools/list" => JsonRpcMessage::result(id, json!({ "tools": &*TOOLS })),
            "tools/call" => self.tools_call(id, &params),
            other => {
                warn!("method not found: {other}");
                JsonRpcMessage::error(id, METHOD_NOT_FOUND, format!("method not found: {other}"))
            }
        };
        Some(response)
    }

    fn handle_notification(&self, message: &JsonRpcMessage) {
        match message.method.as_deref().unwrap_or_default() {
            "notifications/initialized" => info!("client completed initialization"),
            other => debug!("ignoring notification: {other}"),
        }
    }

    fn initialize(&self, params: &Value) -> Value {
        let requested = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let negotiated = if SUPPORTED_PROTOCOL_VERSIONS.contains(&requested) {
            requested
        } else {
            SUPPORTED_PROTOCOL_VERSIONS[0]
        };

        if let Some(client) = params.get("clientInfo") {
            info!(
                "initialize from client {} {} (protocol {})",
                client.get("name").and_then(|v| v.as_str()).unwrap_or("?"),
                client.get("version").and_then(|v| v.as_str()).unwrap_or("?"),
                negotiated
            );
        }

        json!({
            "protocolVersion": negotiated,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    fn tools_call(&self, id: Value, params: &Value) -> JsonRpcMessage {
        let name = match params.get("name").and_then(Value::as_str) {
            Some(n) => n,
            None => {
                return JsonRpcMessage::error(id, INVALID_PARAMS, "missing tool name");
            }
        };
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        debug!("tools/call {name} with args: {arguments}");

        match call_tool(&self.store, name, arguments) {
            Ok(payload) => {
                let text = serde_json::to_string_pretty(&payload).unwrap_or_default();
                JsonRpcMessage::result(
                    id,
                    json!({
                        "content": [ { "type": "text", "text": text } ],
                        "isError": false
                    }),
                )
            }
            Err(ToolError::InvalidParams(msg)) => {
                JsonRpcMessage::error(id, INVALID_PARAMS, msg)
            }
            Err(ToolError::Failed(msg)) => {
                warn!("tool {name} failed: {msg}");
                JsonRpcMessage::result(
                    id,
                    json!({
                        "content": [ { "type": "text", "text": msg } ],
                        "isError": true
                    }),
                )
            }
        }
    }
}
