//! Main entry point for the Higher/Lower display server.

use native_hilo::{cli, config, game, logging, server, storage, supply};

use anyhow::Context;
use clap::Parser;
use config::Config;
use hilo_shared::ClientMsg;
use server::AppState;
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use storage::{FileStore, KeyValueStore, MemoryStore};

/// Usage:
///   hilo-server [--config PATH] [--port N] [--offline] [--seed N]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::ServerCli::parse();
    logging::init_tracing(cli.debug);

    let config_path: PathBuf = cli.config.clone();
    let mut cfg = Config::load_or_create(&config_path)
        .with_context(|| format!("loading or creating config '{}'", config_path.display()))?;
    cli.apply_overrides(&mut cfg);
    if cli.persist {
        cfg.save(&config_path)
            .with_context(|| format!("saving updated config '{}'", config_path.display()))?;
    }

    let store_path = cfg.store_path_relative_to(&config_path);
    let store: Box<dyn KeyValueStore> = match FileStore::open(&store_path) {
        Ok(s) => {
            tracing::info!(path = %s.path().display(), "high score store opened");
            Box::new(s)
        }
        Err(e) => {
            tracing::warn!(path = %store_path.display(), error = %e, "store unavailable, high score will not persist");
            Box::new(MemoryStore::default())
        }
    };

    let supply = supply::from_config(&cfg).context("building card supply")?;
    tracing::info!(config = %config_path.display(), supply = supply.name());

    let engine = game::RoundEngine::new(store);
    let state = AppState::new(engine, supply);

    // displays connecting later see the failure and can retry with Draw
    if let Err(e) = server::dispatch(&state, ClientMsg::Draw).await {
        tracing::warn!(error = %e, "initial draw failed");
    }

    let port = find_available_port(cfg.port)
        .map_err(|e| anyhow::anyhow!("Could not find an available port: {}", e))?;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(port, "starting server");
    if port != cfg.port {
        tracing::warn!(port, wanted = cfg.port, "configured port was not available, using alternative port");
    }

    server::run_server(addr, state, cfg.static_dir.clone()).await?;
    Ok(())
}

/// Find the first available port starting from the given port number
fn find_available_port(start_port: u16) -> anyhow::Result<u16> {
    let end = start_port.saturating_add(100);
    for port in start_port..end {
        if TcpListener::bind(("127.0.0.1", port)).is_ok() {
            return Ok(port);
        }
    }
    Err(anyhow::anyhow!(
        "No available ports found in range {}..{}",
        start_port,
        end
    ))
}
