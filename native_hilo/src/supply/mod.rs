//! Card supplies: where the engine's cards come from.
//!
//! - [`QrandomSupply`]: the remote deck + random-index API.
//! - [`LocalSupply`]: pseudo-random cards, optionally seeded.
//! - [`FallbackSupply`]: remote first, local when the remote fails.
//! - [`ScriptedSupply`]: a fixed queue of results for tests and demos.

mod fallback;
mod local;
mod qrandom;
mod scripted;

pub use fallback::FallbackSupply;
pub use local::LocalSupply;
pub use qrandom::{QrandomSupply, DEFAULT_API_BASE};
pub use scripted::ScriptedSupply;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hilo_shared::Card;
use thiserror::Error;

use crate::config::{Config, SupplyMode};

#[derive(Debug, Error)]
pub enum SupplyError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("malformed card data: {0}")]
    Malformed(String),
    #[error("invalid API base URL '{0}'")]
    InvalidUrl(String),
    #[error("scripted supply has no cards left")]
    Exhausted,
}

/// Produces one independently drawn card per call. Repeats are allowed.
#[async_trait]
pub trait CardSupply: Send + Sync {
    async fn supply_random_card(&self) -> Result<Card, SupplyError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: CardSupply + ?Sized> CardSupply for Arc<T> {
    async fn supply_random_card(&self) -> Result<Card, SupplyError> {
        (**self).supply_random_card().await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[async_trait]
impl<T: CardSupply + ?Sized> CardSupply for Box<T> {
    async fn supply_random_card(&self) -> Result<Card, SupplyError> {
        (**self).supply_random_card().await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Build the supply described by `cfg`.
pub fn from_config(cfg: &Config) -> Result<Arc<dyn CardSupply>, SupplyError> {
    let timeout = Duration::from_millis(cfg.request_timeout_ms);
    let local = || match cfg.seed {
        Some(seed) => LocalSupply::seeded(seed),
        None => LocalSupply::new(),
    };
    let supply: Arc<dyn CardSupply> = match cfg.supply {
        SupplyMode::Remote => Arc::new(QrandomSupply::new(&cfg.api_base_url, timeout)?),
        SupplyMode::Local => Arc::new(local()),
        SupplyMode::Fallback => Arc::new(FallbackSupply::new(
            QrandomSupply::new(&cfg.api_base_url, timeout)?,
            local(),
        )),
    };
    tracing::info!(supply = supply.name(), "card supply ready");
    Ok(supply)
}
