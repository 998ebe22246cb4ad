use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::supply::DEFAULT_API_BASE;

/// Where cards come from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SupplyMode {
    Remote,
    Local,
    #[default]
    Fallback,
}

/// Game configuration persisted as TOML.
///
/// Fields:
/// - api_base_url: base of the random deck API (`/deck` and `/int` are appended)
/// - request_timeout_ms: per-request timeout for the remote API
/// - supply: remote, local, or remote with local fallback
/// - store_path: JSON file holding the high score and onboarding flag
/// - seed: optional seed for the local supply
/// - port: first port the server tries to bind
/// - static_dir: optional directory of display assets served at `/`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub supply: SupplyMode,
    pub store_path: PathBuf,
    #[serde(default)]
    pub seed: Option<u64>,
    pub port: u16,
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE.to_string(),
            request_timeout_ms: 5000,
            supply: SupplyMode::Fallback,
            store_path: PathBuf::from("hilo-store.json"),
            seed: None,
            port: 3000,
            static_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`. If the file does not exist, create it
    /// with reasonable defaults and return the default config.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)
                .with_context(|| format!("reading config file '{}'", path.display()))?;
            let cfg: Config = toml::from_str(&s)
                .with_context(|| format!("parsing TOML config '{}'", path.display()))?;
            Ok(cfg)
        } else {
            let cfg = Config::default();
            cfg.save(path)
                .with_context(|| format!("writing default config to '{}'", path.display()))?;
            Ok(cfg)
        }
    }

    /// Save the current config state back to the provided path (overwrites).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory '{}'", parent.display()))?;
            }
        }
        let toml_text =
            toml::to_string_pretty(&self).with_context(|| "serializing config to TOML")?;
        fs::write(path, toml_text)
            .with_context(|| format!("writing config to '{}'", path.display()))?;
        Ok(())
    }

    /// Resolve `store_path` relative to the directory holding the config file.
    pub fn store_path_relative_to(&self, config_path: &Path) -> PathBuf {
        if self.store_path.is_absolute() {
            return self.store_path.clone();
        }
        match config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(&self.store_path),
            _ => self.store_path.clone(),
        }
    }
}
