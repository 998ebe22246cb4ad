//! Round phases, guesses, outcomes and events for the Higher/Lower game.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::Card;

/// The player's prediction for the next card.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Higher,
    Lower,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Higher => f.write_str("higher"),
            Direction::Lower => f.write_str("lower"),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }

    pub fn is_correct(self) -> bool {
        self == Outcome::Correct
    }
}

/// Where a round currently stands.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    AwaitingFirstCard,
    AwaitingGuess,
    Revealing,
    RoundResolved,
    GameOver,
}

impl Phase {
    /// Edges of the round state machine. `restart` may leave any phase, so
    /// every phase can move back to `AwaitingFirstCard`.
    pub fn can_transition_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (_, AwaitingFirstCard)
                | (AwaitingFirstCard, AwaitingGuess)
                | (AwaitingGuess, Revealing)
                | (Revealing, RoundResolved)
                | (Revealing, GameOver)
                | (RoundResolved, AwaitingGuess)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::AwaitingFirstCard => "awaiting first card",
            Phase::AwaitingGuess => "awaiting guess",
            Phase::Revealing => "revealing",
            Phase::RoundResolved => "round resolved",
            Phase::GameOver => "game over",
        };
        f.write_str(s)
    }
}

/// Presentation hints derived from the phase. Never stored; recomputed from state.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DisplayHints {
    /// A draw is outstanding; show a loading indicator.
    pub loading: bool,
    /// The newest card should be rendered face-down until the round resolves.
    pub face_down: bool,
    /// Higher/Lower buttons accept input.
    pub controls_enabled: bool,
    pub show_restart: bool,
}

/// Something the display layer may want to tell the player about.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoundEvent {
    CardDrawn(Card),
    GuessMade(Direction),
    Correct { score: u32 },
    NewHighScore(u32),
    GameOver { score: u32 },
    SupplyFailed(String),
    Restarted,
}

impl RoundEvent {
    /// User-facing message, if this event has one.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            RoundEvent::Correct { .. } => Some("Correct! Keep going!"),
            RoundEvent::GameOver { .. } => Some("Game Over! Your guess was wrong."),
            RoundEvent::NewHighScore(_) => Some("New high score!"),
            RoundEvent::SupplyFailed(_) => Some("Failed to fetch card from API"),
            _ => None,
        }
    }
}
