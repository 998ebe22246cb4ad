//! Round engine: the Higher/Lower state machine.
//!
//! The engine is synchronous. Every draw is split in two: a command hands out
//! a [`DrawTicket`], the caller awaits the card supply, and the result comes
//! back through [`RoundEngine::complete_draw`]. Tickets carry the session
//! generation they were issued under, so a `restart` invalidates any draw that
//! is still outstanding.

use hilo_shared::{Card, Direction, Outcome, Phase, RoundEvent, RoundStatePublic};

use super::error::EngineError;
use super::rules::evaluate_guess;
use super::state::RoundState;
use crate::storage::{self, KeyValueStore};
use crate::supply::SupplyError;

pub(crate) const MAX_RECENT_EVENTS: usize = 50;

/// Proof that a draw was requested. Hand it back to `complete_draw`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawTicket {
    generation: u64,
    serial: u64,
}

impl DrawTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What `complete_draw` did with a supply response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawApplied {
    Applied(Card),
    /// The ticket belonged to an earlier session generation or was already used.
    Discarded,
}

/// Result of resolving a revealed round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Outcome,
    /// Set after a correct guess: the draw that brings in the next card.
    pub next_draw: Option<DrawTicket>,
}

pub struct RoundEngine {
    state: RoundState,
    generation: u64,
    next_serial: u64,
    in_flight: Option<u64>,
    // the card for the pending guess has arrived and awaits resolve_round
    revealed: bool,
    recent_events: Vec<RoundEvent>,
    store: Box<dyn KeyValueStore>,
}

impl RoundEngine {
    /// Start a session. The high score is read from `store`.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let high_score = storage::load_high_score(store.as_ref());
        tracing::debug!(high_score, "loaded high score");
        Self {
            state: RoundState::new(high_score),
            generation: 0,
            next_serial: 0,
            in_flight: None,
            revealed: false,
            recent_events: Vec::new(),
            store,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn draw_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn recent_events(&self) -> &[RoundEvent] {
        &self.recent_events
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    pub fn public(&self) -> RoundStatePublic {
        let s = &self.state;
        RoundStatePublic {
            previous_card: s.previous_card,
            current_card: s.current_card,
            score: s.score,
            high_score: s.high_score,
            pending_guess: s.pending_guess,
            last_outcome: s.last_outcome,
            game_over: s.game_over(),
            phase: s.phase,
            hints: s.hints(self.draw_in_flight(), self.revealed),
            event_log: self.recent_events.clone(),
        }
    }

    /// Ask for a card. Allowed while waiting for the first card, while a guess
    /// waits for its card, and after a correct round; never while another
    /// draw is outstanding.
    pub fn begin_draw(&mut self) -> Result<DrawTicket, EngineError> {
        self.ensure_can_draw("draw_card")?;
        Ok(self.issue_ticket())
    }

    /// Apply the supply's answer to a ticket.
    ///
    /// A failure clears the outstanding draw and leaves the phase untouched so
    /// the same draw can be retried. Stale tickets are ignored.
    pub fn complete_draw(
        &mut self,
        ticket: DrawTicket,
        result: Result<Card, SupplyError>,
    ) -> Result<DrawApplied, EngineError> {
        if ticket.generation != self.generation || self.in_flight != Some(ticket.serial) {
            tracing::debug!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding stale draw result"
            );
            return Ok(DrawApplied::Discarded);
        }
        self.in_flight = None;

        let card = match result {
            Ok(card) => card,
            Err(e) => {
                tracing::warn!(error = %e, phase = %self.state.phase, "card draw failed");
                self.log(RoundEvent::SupplyFailed(e.to_string()));
                return Err(EngineError::CardSupplyUnavailable(e));
            }
        };

        if let Some(prior) = self.state.current_card.take() {
            self.state.previous_card = Some(prior);
        }
        self.state.current_card = Some(card);
        self.state.last_outcome = None;
        self.log(RoundEvent::CardDrawn(card));
        tracing::info!(card = %card.short(), value = card.value(), "card drawn");

        match self.state.phase {
            Phase::AwaitingFirstCard | Phase::RoundResolved => {
                self.transition(Phase::AwaitingGuess)
            }
            Phase::Revealing => self.revealed = true,
            // ensure_can_draw never issues tickets in the other phases
            Phase::AwaitingGuess | Phase::GameOver => {}
        }
        Ok(DrawApplied::Applied(card))
    }

    /// Record a guess and ask for the card it will be judged against.
    pub fn guess(&mut self, direction: Direction) -> Result<DrawTicket, EngineError> {
        if self.state.phase != Phase::AwaitingGuess {
            return Err(self.reject("guess", "a guess needs a face-up card and no pending guess"));
        }
        self.state.pending_guess = Some(direction);
        self.revealed = false;
        self.transition(Phase::Revealing);
        self.log(RoundEvent::GuessMade(direction));
        Ok(self.issue_ticket())
    }

    pub fn guess_higher(&mut self) -> Result<DrawTicket, EngineError> {
        self.guess(Direction::Higher)
    }

    pub fn guess_lower(&mut self) -> Result<DrawTicket, EngineError> {
        self.guess(Direction::Lower)
    }

    /// Judge the revealed card. A correct guess scores, may raise the high
    /// score, and asks for the next card; a wrong one ends the game.
    pub fn resolve_round(&mut self) -> Result<Resolution, EngineError> {
        if self.state.phase != Phase::Revealing || !self.revealed {
            return Err(self.reject("resolve_round", "the next card has not been revealed"));
        }
        let (Some(previous), Some(current), Some(direction)) = (
            self.state.previous_card,
            self.state.current_card,
            self.state.pending_guess,
        ) else {
            return Err(self.reject("resolve_round", "no card to compare against"));
        };

        let outcome = Outcome::from_correct(evaluate_guess(previous, current, direction));
        self.state.pending_guess = None;
        self.state.last_outcome = Some(outcome);
        self.revealed = false;

        if !outcome.is_correct() {
            self.transition(Phase::GameOver);
            self.log(RoundEvent::GameOver {
                score: self.state.score,
            });
            return Ok(Resolution {
                outcome,
                next_draw: None,
            });
        }

        let score = self.state.score + 1;
        if score > self.state.high_score {
            self.state.high_score = score;
            if let Err(e) = storage::store_high_score(self.store.as_mut(), score) {
                tracing::warn!(error = %e, high_score = score, "failed to persist high score");
            }
            self.log(RoundEvent::NewHighScore(score));
        }
        self.state.score = score;
        self.log(RoundEvent::Correct { score });
        self.transition(Phase::RoundResolved);

        Ok(Resolution {
            outcome,
            next_draw: Some(self.issue_ticket()),
        })
    }

    /// Throw the current game away and ask for a fresh first card. Any draw
    /// still outstanding becomes stale. The high score survives.
    pub fn restart(&mut self) -> DrawTicket {
        self.generation += 1;
        self.in_flight = None;
        self.revealed = false;
        self.transition(Phase::AwaitingFirstCard);
        self.state = RoundState::new(self.state.high_score);
        self.log(RoundEvent::Restarted);
        self.issue_ticket()
    }

    fn ensure_can_draw(&self, command: &'static str) -> Result<(), EngineError> {
        if self.in_flight.is_some() {
            return Err(self.reject(command, "a draw is already in flight"));
        }
        match self.state.phase {
            Phase::AwaitingFirstCard | Phase::RoundResolved => Ok(()),
            Phase::Revealing if !self.revealed => Ok(()),
            _ => Err(self.reject(command, "no card is wanted right now")),
        }
    }

    fn issue_ticket(&mut self) -> DrawTicket {
        self.next_serial += 1;
        self.in_flight = Some(self.next_serial);
        DrawTicket {
            generation: self.generation,
            serial: self.next_serial,
        }
    }

    fn transition(&mut self, next: Phase) {
        let from = self.state.phase;
        if !from.can_transition_to(next) {
            tracing::error!(%from, to = %next, "illegal phase transition");
            debug_assert!(false, "illegal phase transition {from} -> {next}");
        }
        tracing::info!(%from, to = %next, score = self.state.score, "phase change");
        self.state.phase = next;
    }

    fn reject(&self, command: &'static str, reason: &'static str) -> EngineError {
        tracing::warn!(command, phase = %self.state.phase, reason, "command rejected");
        EngineError::invalid(command, self.state.phase, reason)
    }

    fn log(&mut self, ev: RoundEvent) {
        self.recent_events.push(ev);
        if self.recent_events.len() > MAX_RECENT_EVENTS {
            let excess = self.recent_events.len() - MAX_RECENT_EVENTS;
            self.recent_events.drain(0..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, HIGH_SCORE_KEY};
    use hilo_shared::{CardRank, CardSuit};

    fn card(value: u8) -> Card {
        Card::new(CardRank::from_value(value).unwrap(), CardSuit::Hearts)
    }

    fn engine_with(store: &MemoryStore) -> RoundEngine {
        RoundEngine::new(Box::new(store.clone()))
    }

    fn draw(e: &mut RoundEngine, value: u8) {
        let t = e.begin_draw().unwrap();
        e.complete_draw(t, Ok(card(value))).unwrap();
    }

    fn guess_and_reveal(e: &mut RoundEngine, dir: Direction, value: u8) -> Resolution {
        let t = e.guess(dir).unwrap();
        e.complete_draw(t, Ok(card(value))).unwrap();
        e.resolve_round().unwrap()
    }

    #[test]
    fn first_card_goes_face_up() {
        let mut e = engine_with(&MemoryStore::default());
        draw(&mut e, 7);
        let s = e.state();
        assert_eq!(s.phase, Phase::AwaitingGuess);
        assert!(s.previous_card.is_none());
        assert_eq!(s.current_card.map(|c| c.value()), Some(7));
    }

    #[test]
    fn correct_guess_scores_and_rotates() {
        let mut e = engine_with(&MemoryStore::default());
        draw(&mut e, 7);

        let r = guess_and_reveal(&mut e, Direction::Higher, 10);
        assert_eq!(r.outcome, Outcome::Correct);
        assert_eq!(e.phase(), Phase::RoundResolved);
        assert_eq!(e.state().score, 1);
        assert_eq!(e.state().last_outcome, Some(Outcome::Correct));

        let next = r.next_draw.expect("correct guess asks for the next card");
        e.complete_draw(next, Ok(card(4))).unwrap();
        let s = e.state();
        assert_eq!(s.phase, Phase::AwaitingGuess);
        assert_eq!(s.previous_card.map(|c| c.value()), Some(10));
        assert_eq!(s.current_card.map(|c| c.value()), Some(4));
        assert_eq!(s.last_outcome, None);
        assert_eq!(s.pending_guess, None);
    }

    #[test]
    fn wrong_guess_ends_game_and_freezes_score() {
        let mut e = engine_with(&MemoryStore::default());
        draw(&mut e, 7);
        let r = guess_and_reveal(&mut e, Direction::Higher, 9);
        e.complete_draw(r.next_draw.unwrap(), Ok(card(9))).unwrap();

        let r = guess_and_reveal(&mut e, Direction::Lower, 12);
        assert_eq!(r.outcome, Outcome::Incorrect);
        assert!(r.next_draw.is_none());
        let s = e.state();
        assert!(s.game_over());
        assert_eq!(s.phase, Phase::GameOver);
        assert_eq!(s.score, 1);
        assert_eq!(s.pending_guess, None);

        assert!(e.guess(Direction::Higher).is_err());
        assert!(e.begin_draw().is_err());
        assert_eq!(e.state().score, 1);
    }

    #[test]
    fn tie_counts_as_correct() {
        let mut e = engine_with(&MemoryStore::default());
        draw(&mut e, 8);
        let r = guess_and_reveal(&mut e, Direction::Lower, 8);
        assert_eq!(r.outcome, Outcome::Correct);
    }

    #[test]
    fn supply_failure_leaves_state_untouched() {
        let mut e = engine_with(&MemoryStore::default());
        let before = e.state().clone();

        let t = e.begin_draw().unwrap();
        let err = e
            .complete_draw(t, Err(SupplyError::Malformed("empty deck".into())))
            .unwrap_err();
        assert!(err.is_supply_failure());
        assert_eq!(e.state(), &before);
        assert!(!e.draw_in_flight());

        draw(&mut e, 5);
        assert_eq!(e.phase(), Phase::AwaitingGuess);
    }

    #[test]
    fn failed_reveal_can_be_retried() {
        let mut e = engine_with(&MemoryStore::default());
        draw(&mut e, 5);
        let t = e.guess(Direction::Higher).unwrap();
        assert!(e
            .complete_draw(t, Err(SupplyError::Malformed("x".into())))
            .is_err());
        assert_eq!(e.phase(), Phase::Revealing);
        assert_eq!(e.state().pending_guess, Some(Direction::Higher));
        assert!(e.resolve_round().is_err());

        draw(&mut e, 6);
        assert_eq!(e.resolve_round().unwrap().outcome, Outcome::Correct);
    }

    #[test]
    fn commands_rejected_in_wrong_phase_do_not_mutate() {
        let mut e = engine_with(&MemoryStore::default());
        let before = e.state().clone();
        assert!(matches!(
            e.guess(Direction::Higher),
            Err(EngineError::InvalidState {
                command: "guess",
                phase: Phase::AwaitingFirstCard,
                ..
            })
        ));
        assert!(e.resolve_round().is_err());
        assert_eq!(e.state(), &before);

        draw(&mut e, 3);
        assert!(e.begin_draw().is_err());
        assert!(e.resolve_round().is_err());

        let _t = e.guess(Direction::Higher).unwrap();
        let revealing = e.state().clone();
        assert!(e.guess(Direction::Lower).is_err());
        assert!(e.begin_draw().is_err(), "one draw at a time");
        assert_eq!(e.state(), &revealing);
    }

    #[test]
    fn restart_discards_outstanding_draw() {
        let mut e = engine_with(&MemoryStore::default());
        draw(&mut e, 7);
        let old = e.guess(Direction::Higher).unwrap();

        let fresh = e.restart();
        assert_eq!(e.phase(), Phase::AwaitingFirstCard);
        assert_ne!(old.generation(), fresh.generation());

        assert_eq!(
            e.complete_draw(old, Ok(card(10))).unwrap(),
            DrawApplied::Discarded
        );
        assert!(e.state().current_card.is_none());

        e.complete_draw(fresh, Ok(card(2))).unwrap();
        assert_eq!(e.phase(), Phase::AwaitingGuess);
        assert_eq!(e.state().current_card.map(|c| c.value()), Some(2));
    }

    #[test]
    fn ticket_cannot_be_used_twice() {
        let mut e = engine_with(&MemoryStore::default());
        let t = e.begin_draw().unwrap();
        e.complete_draw(t, Ok(card(4))).unwrap();
        assert_eq!(
            e.complete_draw(t, Ok(card(9))).unwrap(),
            DrawApplied::Discarded
        );
        assert_eq!(e.state().current_card.map(|c| c.value()), Some(4));
    }

    #[test]
    fn restart_resets_but_keeps_high_score() {
        let store = MemoryStore::default();
        let mut e = engine_with(&store);
        draw(&mut e, 2);
        let r = guess_and_reveal(&mut e, Direction::Higher, 5);
        e.complete_draw(r.next_draw.unwrap(), Ok(card(5))).unwrap();
        guess_and_reveal(&mut e, Direction::Higher, 3);
        assert!(e.state().game_over());

        let _t = e.restart();
        let s = e.state();
        assert_eq!(s.phase, Phase::AwaitingFirstCard);
        assert_eq!(s.score, 0);
        assert!(!s.game_over());
        assert_eq!(s.high_score, 1);
        assert!(s.previous_card.is_none() && s.current_card.is_none());
        assert!(s.pending_guess.is_none() && s.last_outcome.is_none());
    }

    #[test]
    fn high_score_is_written_through_and_reloaded() {
        let store = MemoryStore::default();
        let mut e = engine_with(&store);
        draw(&mut e, 2);
        for v in [3, 4, 5] {
            let r = guess_and_reveal(&mut e, Direction::Higher, v);
            e.complete_draw(r.next_draw.unwrap(), Ok(card(v))).unwrap();
            assert!(e.state().score <= e.state().high_score);
        }
        assert_eq!(e.state().high_score, 3);
        assert_eq!(store.get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("3"));

        let reloaded = engine_with(&store);
        assert_eq!(reloaded.state().high_score, 3);
        assert_eq!(reloaded.state().score, 0);
    }

    #[test]
    fn lower_score_does_not_touch_high_score() {
        let store = MemoryStore::default();
        storage::store_high_score(&mut store.clone(), 10).unwrap();
        let mut e = engine_with(&store);
        draw(&mut e, 2);
        guess_and_reveal(&mut e, Direction::Higher, 3);
        assert_eq!(e.state().score, 1);
        assert_eq!(e.state().high_score, 10);
        assert!(!e
            .recent_events()
            .iter()
            .any(|ev| matches!(ev, RoundEvent::NewHighScore(_))));
    }

    #[test]
    fn event_log_is_capped() {
        let mut e = engine_with(&MemoryStore::default());
        for _ in 0..(MAX_RECENT_EVENTS * 2) {
            let _ = e.restart();
        }
        assert_eq!(e.recent_events().len(), MAX_RECENT_EVENTS);
    }

    #[test]
    fn public_view_mirrors_state() {
        let mut e = engine_with(&MemoryStore::default());
        let t = e.begin_draw().unwrap();
        assert!(e.public().hints.loading);
        e.complete_draw(t, Ok(card(11))).unwrap();

        let p = e.public();
        assert_eq!(p.phase, Phase::AwaitingGuess);
        assert_eq!(p.current_card, Some(card(11)));
        assert!(!p.game_over);
        assert!(p.hints.controls_enabled);
        assert_eq!(p.event_log.last(), Some(&RoundEvent::CardDrawn(card(11))));
    }
}
