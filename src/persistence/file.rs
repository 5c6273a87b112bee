//! JSON file backend
//!
//! The file holds a flat object of key → integer so other counters can share
//! it later. Writes go to a temp file first and are renamed into place.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{HIGH_SCORE_KEY, HighScoreStore, StoreError};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> Result<BTreeMap<String, u64>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> u64 {
        match self.read_map() {
            Ok(map) => map.get(HIGH_SCORE_KEY).copied().unwrap_or(0),
            Err(e) => {
                log::warn!("Unreadable score file {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking the save
        let mut map = self.read_map().unwrap_or_default();
        map.insert(HIGH_SCORE_KEY.to_string(), score);

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&map)?)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}
