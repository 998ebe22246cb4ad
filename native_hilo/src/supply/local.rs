use std::sync::Mutex;

use async_trait::async_trait;
use hilo_shared::{Card, CardRank, CardSuit};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{CardSupply, SupplyError};

/// Draws uniformly from the 52 rank/suit combinations, with replacement.
#[derive(Debug)]
pub struct LocalSupply {
    rng: Mutex<StdRng>,
}

impl LocalSupply {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Same seed, same sequence of cards.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn next_card(&self) -> Card {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        let rank = CardRank::ALL[rng.random_range(0..CardRank::ALL.len())];
        let suit = CardSuit::ALL[rng.random_range(0..CardSuit::ALL.len())];
        Card::new(rank, suit)
    }
}

impl Default for LocalSupply {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardSupply for LocalSupply {
    async fn supply_random_card(&self) -> Result<Card, SupplyError> {
        Ok(self.next_card())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_supply_is_deterministic() {
        let a = LocalSupply::seeded(7);
        let b = LocalSupply::seeded(7);
        let xs: Vec<Card> = (0..20).map(|_| a.next_card()).collect();
        let ys: Vec<Card> = (0..20).map(|_| b.next_card()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn values_stay_in_range() {
        let s = LocalSupply::seeded(1);
        for _ in 0..500 {
            let v = s.next_card().value();
            assert!((2..=14).contains(&v));
        }
    }

    #[tokio::test]
    async fn supplies_through_trait() {
        let s = LocalSupply::seeded(3);
        assert!(s.supply_random_card().await.is_ok());
    }
}
