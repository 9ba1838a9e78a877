use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::store::NoteStore;

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// How a `tools/call` went wrong.
///
/// `InvalidParams` maps to a JSON-RPC -32602 error (malformed arguments,
/// unknown tool). `Failed` is a tool-level failure and is reported inside a
/// successful response with `isError: true`, the way MCP distinguishes the two.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{0}")]
    InvalidParams(String),
    #[error("{0}")]
    Failed(String),
}

pub static TOOLS: Lazy<Vec<ToolDefinition>> = Lazy::new(|| {
    vec![
        ToolDefinition {
            name: "list_notes",
            description: "List notes with minimal metadata ({id, title, created_at, updated_at}), most recently updated first.",
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDefinition {
            name: "read_notes",
            description: "Read full notes by id, or every note when `all` is true.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Note ids to read. Ignored when `all` is true."
                    },
                    "all": {
                        "type": "boolean",
                        "default": false,
                        "description": "Read every note in the store."
                    }
                }
            }),
        },
        ToolDefinition {
            name: "add_note",
            description: "Create a note with a title and body and return it.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "body": { "type": "string" }
                },
                "required": ["title", "body"]
            }),
        },
    ]
});

#[derive(Debug, Deserialize)]
struct ReadNotesArgs {
    #[serde(default)]
    ids: Option<Vec<String>>,
    #[serde(default)]
    all: bool,
}

#[derive(Debug, Deserialize)]
struct AddNoteArgs {
    title: String,
    body: String,
}

/// Dispatch a `tools/call` by name. Returns the tool's JSON payload; the
/// caller wraps it into the MCP result envelope.
pub fn call_tool(store: &NoteStore, name: &str, arguments: Value) -> Result<Value, ToolError> {
    match name {
        "list_notes" => to_payload(store.list()),
        "read_notes" => {
            let args: ReadNotesArgs = parse_args(arguments)?;
            let notes = if args.all {
                store.get_many(None)
            } else {
                store.get_many(Some(args.ids.unwrap_or_default().as_slice()))
            };
            to_payload(notes)
        }
        "add_note" => {
            let args: AddNoteArgs = parse_args(arguments)?;
            if args.title.trim().is_empty() {
                return Err(ToolError::Failed("title is required".to_string()));
            }
            let note = store
                .add(&args.title, &args.body)
                .map_err(|e| ToolError::Failed(e.to_string()))?;
            to_payload(note)
        }
        other => Err(ToolError::InvalidParams(format!("unknown tool: {other}"))),
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidParams(e.to_string()))
}

fn to_payload<T: Serialize>(value: T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Failed(e.to_string()))
}
