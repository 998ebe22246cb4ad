use clap::Parser;
use std::path::PathBuf;

/// Server CLI for hilo-server
#[derive(Parser, Debug, Clone)]
#[command(name = "hilo-server", version, about = "Higher/Lower display server")]
pub struct ServerCli {
    /// Path to config file
    #[arg(long, default_value = "hilo.toml")]
    pub config: PathBuf,

    /// First port to try (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Never call the remote card API; draw cards locally
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Seed for the local card supply (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Persist CLI overrides back to the config file
    #[arg(long, default_value_t = false)]
    pub persist: bool,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl ServerCli {
    /// Fold command-line overrides into `cfg`.
    pub fn apply_overrides(&self, cfg: &mut crate::config::Config) {
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
        }
        if self.offline {
            cfg.supply = crate::config::SupplyMode::Local;
        }
    }
}
