// Routing and server startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::services::ServeDir;

use crate::server::AppState;
use anyhow::{Context, Result};

pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        // Liveness check for scripts and process supervisors
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({ "ok": true })) }),
        )
        // Displays that animate the round live on the websocket
        .route("/ws", get(crate::server::ws::ws_handler))
        // Plain HTTP mirror of the same ClientMsg/ServerMsg payloads
        .route("/api/state", get(crate::server::http::state_handler))
        .route("/api/message", post(crate::server::http::message_handler));

    // Anything not matched above is looked up in the asset directory, if one
    // was configured; index.html is served for directory paths.
    let router = match static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "serving display assets");
            router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
        }
        None => router,
    };
    router.with_state(state)
}

pub async fn run_server(addr: SocketAddr, state: AppState, static_dir: Option<PathBuf>) -> Result<()> {
    let app = build_router(state, static_dir);

    let display_addr = if addr.ip().to_string() == "127.0.0.1" {
        format!("localhost:{}", addr.port())
    } else {
        addr.to_string()
    };

    tracing::info!(display_addr = %display_addr, "Higher/Lower server running");

    // Clickable banner for whoever started the server
    println!("\n\x1b[1;36m=== Higher/Lower ===\x1b[0m");
    println!(
        "\x1b[1mURL:\x1b[0m       \x1b[4;34mhttp://{}\x1b[0m",
        display_addr
    );
    println!("\x1b[1mWS:\x1b[0m        ws://{}/ws", display_addr);
    println!("\x1b[1;36m====================\x1b[0m\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", display_addr))?;
    // Runs until the process is stopped; an early return is a real failure
    axum::serve(listener, app)
        .await
        .context("server stopped with an error")?;
    Ok(())
}
