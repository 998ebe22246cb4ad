use hilo_shared::Phase;
use thiserror::Error;

use crate::supply::SupplyError;

/// Everything a round engine command can fail with. Both kinds are
/// recoverable and neither leaves the round state half-updated.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The card supply failed or handed back something that is not a card.
    #[error("card supply unavailable: {0}")]
    CardSupplyUnavailable(#[from] SupplyError),

    /// A command arrived in a phase that does not accept it.
    #[error("{command} rejected while {phase}: {reason}")]
    InvalidState {
        command: &'static str,
        phase: Phase,
        reason: &'static str,
    },
}

impl EngineError {
    pub(crate) fn invalid(command: &'static str, phase: Phase, reason: &'static str) -> Self {
        EngineError::InvalidState {
            command,
            phase,
            reason,
        }
    }

    pub fn is_supply_failure(&self) -> bool {
        matches!(self, EngineError::CardSupplyUnavailable(_))
    }
}
