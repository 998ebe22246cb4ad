//! Client-server messaging protocol for the Higher/Lower game.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::{Direction, DisplayHints, Outcome, Phase, RoundEvent};

/// Complete read-only view of the round state
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundStatePublic {
    pub previous_card: Option<Card>,
    pub current_card: Option<Card>,
    pub score: u32,
    pub high_score: u32,
    pub pending_guess: Option<Direction>,
    pub last_outcome: Option<Outcome>,
    pub game_over: bool,
    pub phase: Phase,
    #[serde(default)]
    pub hints: DisplayHints,
    #[serde(default)]
    pub event_log: Vec<RoundEvent>,
}

/// Messages that clients can send to the server
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMsg {
    Draw,
    Guess(Direction),
    /// Tell the server the reveal animation finished.
    Resolve,
    Restart,
    RequestState,
    Subscribe,
    Ping,
}

/// Messages that the server can send to clients
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMsg {
    Welcome,
    State(RoundStatePublic),
    Error(String),
    Pong,
}
