//! LocalStorage backend (WASM only)

use super::{HIGH_SCORE_KEY, HighScoreStore, StoreError};

/// Stores the high score as a decimal string under [`HIGH_SCORE_KEY`]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> u64 {
        Self::storage()
            .and_then(|s| s.get_item(HIGH_SCORE_KEY).ok().flatten())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        let storage = Self::storage().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(HIGH_SCORE_KEY, &score.to_string())
            .map_err(|_| StoreError::Unavailable)?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}
