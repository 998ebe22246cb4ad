//! The compare rule.

use hilo_shared::{Card, Direction};

/// Decide a guess. Equal values always count as correct.
pub fn evaluate_guess(previous: Card, current: Card, direction: Direction) -> bool {
    if previous.value() == current.value() {
        return true;
    }
    match direction {
        Direction::Higher => current.value() > previous.value(),
        Direction::Lower => current.value() < previous.value(),
    }
}
