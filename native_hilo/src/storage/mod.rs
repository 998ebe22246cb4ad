//! Durable key-value state: the high score and the onboarding flag.
//!
//! The engine only sees [`KeyValueStore`]. `MemoryStore` backs tests and
//! throwaway sessions; `FileStore` keeps values in a small JSON file.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

pub const HIGH_SCORE_KEY: &str = "highScore";
pub const INSTRUCTIONS_KEY: &str = "hasSeenInstructions";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// String-keyed, string-valued storage with last-write-wins semantics.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read the stored high score. Missing or unreadable values count as 0.
pub fn load_high_score(store: &dyn KeyValueStore) -> u32 {
    match store.get(HIGH_SCORE_KEY) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(raw = %raw, "ignoring unparsable stored high score");
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            tracing::warn!(error = %e, "could not read high score");
            0
        }
    }
}

pub fn store_high_score(store: &mut dyn KeyValueStore, score: u32) -> Result<(), StoreError> {
    store.set(HIGH_SCORE_KEY, &score.to_string())
}

pub fn has_seen_instructions(store: &dyn KeyValueStore) -> bool {
    matches!(store.get(INSTRUCTIONS_KEY), Ok(Some(v)) if v.trim() == "true")
}

pub fn mark_instructions_seen(store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
    store.set(INSTRUCTIONS_KEY, "true")
}
