use std::sync::Arc;

use mcp_notes::config::{Settings, Transport};
use mcp_notes::rpc::McpHandler;
use mcp_notes::server::build_router;
use mcp_notes::stdio::run_stdio_server;
use mcp_notes::store::NoteStore;
use mcp_notes::util::{init_tracing, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings = Settings::from_env();
    tracing::info!(
        "starting mcp-notes v{} (transport: {})",
        env!("CARGO_PKG_VERSION"),
        settings.transport.as_str()
    );

    let store = NoteStore::open(&settings.notes_path);
    tracing::info!(
        "note store at {} ({} notes)",
        store.path().display(),
        store.len()
    );

    let handler = McpHandler::new(Arc::new(store));

    match settings.transport {
        Transport::Http => {
            let app = build_router(Arc::new(AppState {
                rpc: handler,
            }));
            let addr = settings.bind_addr();
            tracing::info!("mcp-notes listening on http://{addr}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await?;
        }
        Transport::Stdio => {
            run_stdio_server(handler).await?;
        }
    }

    Ok(())
}
