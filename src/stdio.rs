//! Stdio transport: newline-delimited JSON-RPC on stdin/stdout.
//!
//! Stdout carries protocol frames only; all logging goes to stderr (see
//! `util::init_tracing`). EOF on stdin is a clean shutdown.

use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::rpc::McpHandler;

/// Serve MCP over stdio until stdin closes.
pub async fn run_stdio_server(handler: McpHandler) -> Result<()> {
    tracing::info!("serving MCP over stdio; waiting for client frames");

    let mut reader = BufReader::new(io::stdin());
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            break; // EOF
        }
        let frame = line.trim();
        if frame.is_empty() {
            continue;
        }

        if let Some(response) = handler.handle_raw(frame) {
            let out = serde_json::to_string(&response)?;
            stdout.write_all(out.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    tracing::info!("stdin closed; shutting down");
    Ok(())
}
