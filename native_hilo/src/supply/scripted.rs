use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use hilo_shared::Card;

use super::{CardSupply, SupplyError};

/// Hands out a fixed sequence of results, then `SupplyError::Exhausted`.
#[derive(Debug, Default)]
pub struct ScriptedSupply {
    queue: Mutex<VecDeque<Result<Card, SupplyError>>>,
}

impl ScriptedSupply {
    pub fn new(results: impl IntoIterator<Item = Result<Card, SupplyError>>) -> Self {
        Self {
            queue: Mutex::new(results.into_iter().collect()),
        }
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self::new(cards.into_iter().map(Ok))
    }

    pub fn remaining(&self) -> usize {
        self.queue().len()
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<Card, SupplyError>>> {
        self.queue.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl CardSupply for ScriptedSupply {
    async fn supply_random_card(&self) -> Result<Card, SupplyError> {
        self.queue().pop_front().unwrap_or(Err(SupplyError::Exhausted))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
