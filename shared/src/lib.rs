//! Types shared between the Higher/Lower engine and anything that displays it.

pub mod cards;
pub mod game;
pub mod messages;

pub use cards::{Card, CardParseError, CardRank, CardSuit};
pub use game::{Direction, DisplayHints, Outcome, Phase, RoundEvent};
pub use messages::{ClientMsg, RoundStatePublic, ServerMsg};
