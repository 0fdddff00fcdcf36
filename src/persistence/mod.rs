//! Campaign progress persistence
//!
//! Progress is a small JSON record stored under a fixed key. Storage is best
//! effort: a missing or corrupt record loads as fresh progress, and a failed
//! save is logged and dropped. Neither ever reaches the player as an error.

pub mod backend;

#[cfg(target_arch = "wasm32")]
pub use backend::LocalStorageBackend;
#[cfg(not(target_arch = "wasm32"))]
pub use backend::FileBackend;
pub use backend::{MemoryBackend, StorageBackend};

use crate::error::StorageError;
use crate::progression::{CompletionOutcome, LevelResult, Progress};

/// Namespace key for the progress record
pub const STORAGE_KEY: &str = "swordcery_progress";

/// Loaded progress plus the backend it is written back to
#[derive(Debug)]
pub struct ProgressionStore<B: StorageBackend> {
    backend: B,
    progress: Progress,
}

impl<B: StorageBackend> ProgressionStore<B> {
    /// Load progress from `backend`, falling back to fresh progress
    pub fn open(backend: B) -> Self {
        let progress = match Self::read(&backend) {
            Ok(Some(progress)) => {
                log::info!("Loaded progress ({} levels unlocked)", progress.unlocked_levels());
                progress
            }
            Ok(None) => {
                log::info!("No saved progress, starting fresh");
                Progress::default()
            }
            Err(e) => {
                log::warn!("Could not load progress, starting fresh: {}", e);
                Progress::default()
            }
        };
        Self { backend, progress }
    }

    fn read(backend: &B) -> Result<Option<Progress>, StorageError> {
        let Some(json) = backend.load(STORAGE_KEY)? else {
            return Ok(None);
        };
        let progress: Progress = serde_json::from_str(&json)?;
        Ok(Some(progress))
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Apply a level completion and persist the result
    pub fn record_completion(&mut self, level_index: usize, result: &LevelResult) -> CompletionOutcome {
        let outcome = self.progress.record_completion(level_index, result);
        if outcome.new_best || outcome.unlocked.is_some() {
            self.save();
        }
        outcome
    }

    /// Forget all progress
    pub fn reset(&mut self) {
        self.progress = Progress::default();
        self.save();
    }

    /// Write the current progress; failures are logged and ignored
    pub fn save(&mut self) {
        if let Err(e) = self.try_save() {
            log::warn!("Progress not saved: {}", e);
        }
    }

    fn try_save(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.progress)?;
        self.backend.save(STORAGE_KEY, &json)?;
        log::info!("Progress saved ({} levels unlocked)", self.progress.unlocked_levels());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::Rank;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Backend whose every operation fails
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn save(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_empty_backend_gives_fresh_progress() {
        init_logger();
        let store = ProgressionStore::open(MemoryBackend::new());
        assert_eq!(store.progress(), &Progress::default());
    }

    #[test]
    fn test_corrupt_record_gives_fresh_progress() {
        init_logger();
        let mut backend = MemoryBackend::new();
        backend.insert(STORAGE_KEY, "{ not json");
        let store = ProgressionStore::open(backend);
        assert_eq!(store.progress().unlocked_levels(), 1);
        assert_eq!(store.progress(), &Progress::default());
    }

    #[test]
    fn test_completion_is_persisted() {
        init_logger();
        let mut store = ProgressionStore::open(MemoryBackend::new());
        let result = LevelResult::compute(800, 3600, 5400, 5, 5);
        let outcome = store.record_completion(0, &result);
        assert!(outcome.new_best);

        let saved = store.backend().get(STORAGE_KEY).unwrap().to_string();
        let mut backend = MemoryBackend::new();
        backend.insert(STORAGE_KEY, &saved);
        let reopened = ProgressionStore::open(backend);
        assert_eq!(reopened.progress().unlocked_levels(), 2);
        assert_eq!(reopened.progress().high_score(0), 1600);
        assert_eq!(reopened.progress().best_rank(0), Some(Rank::B));
    }

    #[test]
    fn test_keeps_progress_saved_with_empty_rank_slots() {
        init_logger();
        let mut backend = MemoryBackend::new();
        backend.insert(
            STORAGE_KEY,
            r#"{"unlockedLevels":2,"highScores":[1300,0,0,0,0,0,0,0],"bestRanks":["B","","","","","","",""]}"#,
        );
        let mut store = ProgressionStore::open(backend);
        assert_eq!(store.progress().unlocked_levels(), 2);
        assert_eq!(store.progress().high_score(0), 1300);
        assert_eq!(store.progress().best_rank(0), Some(Rank::B));

        let outcome = store.record_completion(1, &LevelResult::compute(700, 0, 0, 0, 1));
        assert_eq!(outcome.unlocked, Some(2));
        let saved = store.backend().get(STORAGE_KEY).unwrap();
        assert!(saved.contains(r#""bestRanks":["B","C","","#));
    }

    #[test]
    fn test_broken_backend_is_tolerated() {
        init_logger();
        let mut store = ProgressionStore::open(BrokenBackend);
        assert_eq!(store.progress(), &Progress::default());
        let result = LevelResult::compute(100, 0, 10, 1, 1);
        let outcome = store.record_completion(0, &result);
        assert_eq!(outcome.unlocked, Some(1));
        assert_eq!(store.progress().unlocked_levels(), 2);
    }

    #[test]
    fn test_reset() {
        let mut store = ProgressionStore::open(MemoryBackend::new());
        store.record_completion(0, &LevelResult::compute(100, 0, 10, 1, 1));
        store.reset();
        assert_eq!(store.progress(), &Progress::default());
    }
}
