//! The mutable round state owned by [`super::RoundEngine`].

use hilo_shared::{Card, Direction, DisplayHints, Outcome, Phase};

/// One game session's state. Only the engine holds a mutable handle; everyone
/// else reads it through `RoundEngine::state`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundState {
    pub previous_card: Option<Card>,
    pub current_card: Option<Card>,
    pub score: u32,
    pub high_score: u32,
    pub pending_guess: Option<Direction>,
    pub last_outcome: Option<Outcome>,
    pub phase: Phase,
}

impl RoundState {
    pub fn new(high_score: u32) -> Self {
        Self {
            previous_card: None,
            current_card: None,
            score: 0,
            high_score,
            pending_guess: None,
            last_outcome: None,
            phase: Phase::AwaitingFirstCard,
        }
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Presentation hints. `draw_in_flight` and `revealed` come from the
    /// engine's draw bookkeeping; everything else follows from the phase.
    pub fn hints(&self, draw_in_flight: bool, revealed: bool) -> DisplayHints {
        DisplayHints {
            loading: draw_in_flight,
            face_down: self.phase == Phase::Revealing && revealed,
            controls_enabled: self.phase == Phase::AwaitingGuess && !draw_in_flight,
            show_restart: self.phase == Phase::GameOver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state() {
        let s = RoundState::new(9);
        assert_eq!(s.phase, Phase::AwaitingFirstCard);
        assert_eq!(s.score, 0);
        assert_eq!(s.high_score, 9);
        assert!(s.previous_card.is_none() && s.current_card.is_none());
        assert!(!s.game_over());
    }

    #[test]
    fn hints_follow_phase() {
        let mut s = RoundState::new(0);
        assert!(s.hints(true, false).loading);
        assert!(!s.hints(true, false).controls_enabled);

        s.phase = Phase::AwaitingGuess;
        assert!(s.hints(false, false).controls_enabled);

        s.phase = Phase::Revealing;
        assert!(!s.hints(false, false).face_down);
        assert!(s.hints(false, true).face_down);

        s.phase = Phase::GameOver;
        let h = s.hints(false, false);
        assert!(h.show_restart && !h.controls_enabled);
    }
}
