//! High score persistence
//!
//! Features:
//! - One integer value under a fixed key
//! - JSON file backend (native)
//! - LocalStorage backend (web)
//! - In-memory backend for tests and headless runs

use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Key the high score is stored under
pub const HIGH_SCORE_KEY: &str = "HighScore";

/// Persistence failures. The rules never act on these, they only get logged.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend unavailable")]
    Unavailable,
}

/// Somewhere to keep the best score between sessions
pub trait HighScoreStore {
    /// Stored value, 0 when nothing was saved yet
    fn load(&self) -> u64;

    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: u64,
    writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously stored value
    pub fn with_value(value: u64) -> Self {
        Self { value, writes: 0 }
    }

    /// Number of successful saves
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u64 {
        self.value
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        self.value = score;
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::with_value(10);
        assert_eq!(store.load(), 10);
        store.save(20).unwrap();
        assert_eq!(store.load(), 20);
        assert_eq!(store.writes(), 1);
    }
}
