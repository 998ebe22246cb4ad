//! Round engine for the Higher/Lower game.
//
//! `rules` holds the compare rule, `engine` the synchronous state machine,
//! and `session` the async driver that feeds it cards.

mod engine;
mod error;
mod rules;
mod session;
mod state;

pub use engine::{DrawApplied, DrawTicket, Resolution, RoundEngine};
pub use error::EngineError;
pub use rules::evaluate_guess;
pub use session::Session;
pub use state::RoundState;
