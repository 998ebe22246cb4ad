use async_trait::async_trait;
use hilo_shared::Card;

use super::{CardSupply, SupplyError};

/// Try `primary`; if it fails, log the failure and ask `backup` instead.
/// Only when both fail does the caller see an error (the primary's).
pub struct FallbackSupply<P, B> {
    primary: P,
    backup: B,
}

impl<P: CardSupply, B: CardSupply> FallbackSupply<P, B> {
    pub fn new(primary: P, backup: B) -> Self {
        Self { primary, backup }
    }
}

#[async_trait]
impl<P: CardSupply, B: CardSupply> CardSupply for FallbackSupply<P, B> {
    async fn supply_random_card(&self) -> Result<Card, SupplyError> {
        match self.primary.supply_random_card().await {
            Ok(card) => Ok(card),
            Err(primary_err) => {
                tracing::warn!(
                    primary = self.primary.name(),
                    backup = self.backup.name(),
                    error = %primary_err,
                    "primary card supply failed, using backup"
                );
                self.backup
                    .supply_random_card()
                    .await
                    .map_err(|backup_err| {
                        tracing::warn!(error = %backup_err, "backup card supply failed too");
                        primary_err
                    })
            }
        }
    }

    fn name(&self) -> &'static str {
        "qrandom+local"
    }
}
