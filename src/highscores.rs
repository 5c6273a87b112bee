//! Best score across sessions
//!
//! The store may be shared with other sessions, so the cached value is
//! refreshed at session start and again before every submit. A finished
//! session only writes when it beats what is stored right now.

use crate::persistence::HighScoreStore;

/// Cached best score backed by a store
#[derive(Debug)]
pub struct HighScore<S> {
    store: S,
    best: u64,
}

impl<S: HighScoreStore> HighScore<S> {
    /// Load the stored best score
    pub fn load(store: S) -> Self {
        let best = store.load();
        log::info!("Loaded high score {}", best);
        Self { store, best }
    }

    /// Re-read the store. Never lowers the cached best.
    pub fn refresh(&mut self) -> u64 {
        let stored = self.store.load();
        if stored > self.best {
            log::debug!("High score raised to {} by another session", stored);
        }
        self.best = self.best.max(stored);
        self.best
    }

    /// Current best score
    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a score would replace the best one (strictly greater)
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished session's score.
    /// Returns true if it became the new best.
    pub fn submit(&mut self, score: u64) -> bool {
        self.refresh();
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        if let Err(e) = self.store.save(score) {
            log::warn!("Failed to persist high score {}: {}", score, e);
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_higher_score_is_written() {
        let mut hs = HighScore::load(MemoryStore::with_value(1000));
        assert!(hs.submit(1001));
        assert_eq!(hs.best(), 1001);
        assert_eq!(hs.store().load(), 1001);
    }

    #[test]
    fn test_equal_score_is_not_rewritten() {
        let mut hs = HighScore::load(MemoryStore::with_value(1000));
        assert!(!hs.submit(1000));
        assert!(!hs.submit(999));
        assert_eq!(hs.store().writes(), 0);
    }

    #[test]
    fn test_submit_sees_scores_saved_elsewhere() {
        let mut hs = HighScore::load(MemoryStore::new());
        assert_eq!(hs.best(), 0);

        // Another session wrote to the same store after we loaded
        hs.store.save(5790).unwrap();
        assert!(!hs.submit(1158));
        assert_eq!(hs.best(), 5790);
        assert_eq!(hs.store().load(), 5790);
        assert_eq!(hs.store().writes(), 1);
    }

    #[test]
    fn test_refresh_never_lowers_best() {
        let mut hs = HighScore::load(MemoryStore::with_value(900));
        hs.store.save(100).unwrap();
        assert_eq!(hs.refresh(), 900);
    }

    #[test]
    fn test_zero_never_qualifies_on_fresh_store() {
        let hs = HighScore::load(MemoryStore::new());
        assert!(!hs.qualifies(0));
        assert!(hs.qualifies(1));
    }
}
