mod cli;

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use cli::{PlayCli, Table};
use native_hilo::config::{Config, SupplyMode};
use native_hilo::game::{RoundEngine, Session};
use native_hilo::storage::{FileStore, KeyValueStore, MemoryStore};
use native_hilo::{logging, supply};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = PlayCli::parse();
    logging::init_tracing(cli.debug);

    let mut cfg = Config::load_or_create(&cli.config)
        .with_context(|| format!("loading or creating config '{}'", cli.config.display()))?;
    if cli.offline {
        cfg.supply = SupplyMode::Local;
    }
    if let Some(seed) = cli.seed {
        cfg.seed = Some(seed);
    }

    let store_path = cfg.store_path_relative_to(&cli.config);
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
    let session = Session::new(RoundEngine::new(store), supply);

    let mut table = Table::new(
        session,
        std::io::stdout().is_terminal(),
        Duration::from_millis(cli.reveal_ms),
    );
    table.onboard(cli.instructions);
    table.run().await
}
