#![forbid(unsafe_code)]
#![doc = r#"
mcp-notes

Minimal MCP server exposing a simple notes system via tools.

Crate highlights
- Three tools: `list_notes`, `read_notes`, `add_note`, backed by a JSON-file store.
- Two transports: stdio (default) and stateless streamable HTTP, selected by `MCP_TRANSPORT`.
- Notes persist to `NOTES_PATH` (default `./notes.json`) via atomic replace.

Modules
- `models`: Note data structures.
- `store`: the JSON-file-backed `NoteStore`.
- `protocol`: JSON-RPC 2.0 message envelope and error codes.
- `tools`: tool definitions, schemas, and dispatch.
- `rpc`: transport-independent MCP dispatcher.
- `server`: Axum router for the HTTP transport.
- `stdio`: line-oriented stdio transport.
- `config` / `util`: environment settings, tracing, shared helpers.
"#]

pub mod config;
pub mod models;
pub mod protocol;
pub mod rpc;
pub mod server;
pub mod stdio;
pub mod store;
pub mod tools;
pub mod util;

// Re-export the pieces embedders typically need.
pub use crate::config::{Settings, Transport};
pub use crate::models::{Note, NoteSummary};
pub use crate::rpc::McpHandler;
pub use crate::store::NoteStore;
