//! Async driver that pairs a [`RoundEngine`] with a card supply.
//!
//! A `Session` has exclusive ownership of its engine, so its draws can never
//! be overtaken by a restart. Shared owners (the server) drive the engine's
//! ticket API directly instead.

use hilo_shared::{Card, Direction, Outcome};

use super::engine::{DrawApplied, DrawTicket, RoundEngine};
use super::error::EngineError;
use super::state::RoundState;
use crate::supply::CardSupply;

pub struct Session<S> {
    engine: RoundEngine,
    supply: S,
}

impl<S: CardSupply> Session<S> {
    pub fn new(engine: RoundEngine, supply: S) -> Self {
        Self { engine, supply }
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut RoundEngine {
        &mut self.engine
    }

    pub fn state(&self) -> &RoundState {
        self.engine.state()
    }

    pub fn supply(&self) -> &S {
        &self.supply
    }

    /// Draw a card in whatever phase currently wants one. Also the retry path
    /// after a failed draw.
    pub async fn draw_card(&mut self) -> Result<Card, EngineError> {
        let ticket = self.engine.begin_draw()?;
        self.fulfil(ticket).await
    }

    /// Guess and fetch the card the guess is judged against. Returns the
    /// revealed card; call [`Session::resolve_round`] once it has been shown.
    pub async fn guess(&mut self, direction: Direction) -> Result<Card, EngineError> {
        let ticket = self.engine.guess(direction)?;
        self.fulfil(ticket).await
    }

    /// Judge the revealed card. After a correct guess this also draws the
    /// next card; if that draw fails the outcome still stands and the engine
    /// waits in `RoundResolved` for a `draw_card` retry.
    pub async fn resolve_round(&mut self) -> Result<Outcome, EngineError> {
        let resolution = self.engine.resolve_round()?;
        if let Some(ticket) = resolution.next_draw {
            self.fulfil(ticket).await?;
        }
        Ok(resolution.outcome)
    }

    /// Guess, reveal and resolve in one go, for displays without a reveal delay.
    pub async fn play_round(&mut self, direction: Direction) -> Result<Outcome, EngineError> {
        self.guess(direction).await?;
        self.resolve_round().await
    }

    pub async fn restart(&mut self) -> Result<Card, EngineError> {
        let ticket = self.engine.restart();
        self.fulfil(ticket).await
    }

    async fn fulfil(&mut self, ticket: DrawTicket) -> Result<Card, EngineError> {
        let result = self.supply.supply_random_card().await;
        match self.engine.complete_draw(ticket, result)? {
            DrawApplied::Applied(card) => Ok(card),
            DrawApplied::Discarded => Err(EngineError::invalid(
                "draw_card",
                self.engine.phase(),
                "draw was superseded by a restart",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::supply::ScriptedSupply;
    use hilo_shared::{CardRank, CardSuit, Phase};

    fn card(value: u8) -> Card {
        Card::new(CardRank::from_value(value).unwrap(), CardSuit::Clubs)
    }

    fn session(values: &[u8]) -> Session<ScriptedSupply> {
        let supply = ScriptedSupply::from_cards(values.iter().map(|&v| card(v)));
        Session::new(RoundEngine::new(Box::new(MemoryStore::default())), supply)
    }

    #[tokio::test]
    async fn plays_a_streak_until_a_miss() {
        let mut s = session(&[5, 9, 2, 2, 13, 4]);
        s.draw_card().await.unwrap();

        assert_eq!(s.play_round(Direction::Higher).await.unwrap(), Outcome::Correct);
        assert_eq!(s.state().score, 1);
        assert_eq!(s.state().current_card, Some(card(2)));

        assert_eq!(s.play_round(Direction::Higher).await.unwrap(), Outcome::Correct);
        assert_eq!(s.state().score, 2);
        assert_eq!(s.state().current_card, Some(card(13)));

        assert_eq!(s.play_round(Direction::Higher).await.unwrap(), Outcome::Incorrect);
        assert!(s.state().game_over());
        assert_eq!(s.state().score, 2);
        assert_eq!(s.state().high_score, 2);
        assert_eq!(s.supply().remaining(), 0);
    }

    #[tokio::test]
    async fn restart_draws_immediately() {
        let mut s = session(&[5, 3, 11]);
        s.draw_card().await.unwrap();
        s.play_round(Direction::Higher).await.unwrap();
        assert!(s.state().game_over());

        let first = s.restart().await.unwrap();
        assert_eq!(first, card(11));
        assert_eq!(s.state().phase, Phase::AwaitingGuess);
        assert_eq!(s.state().score, 0);
    }

    #[tokio::test]
    async fn exhausted_supply_is_a_supply_failure() {
        let mut s = session(&[]);
        let err = s.draw_card().await.unwrap_err();
        assert!(err.is_supply_failure());
        assert_eq!(s.state().phase, Phase::AwaitingFirstCard);
    }
}
