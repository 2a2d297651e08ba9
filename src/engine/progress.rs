//! Persisted counters (last completed level, high score) kept outside the round state.
//!
//! Values are stored as plain integer strings, one per key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::engine::error::ProgressError;

pub const LAST_LEVEL_KEY: &str = "last_level";
pub const HIGH_SCORE_KEY: &str = "high_score";

pub trait ProgressStore {
    fn load(&self, key: &str) -> Result<Option<u64>, ProgressError>;
    fn store(&mut self, key: &str, value: u64) -> Result<(), ProgressError>;
}

fn parse_counter(key: &str, raw: &str) -> Result<u64, ProgressError> {
    raw.trim().parse().map_err(|_| ProgressError::Corrupt {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

/// In-memory store, for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    values: HashMap<String, String>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self, key: &str) -> Result<Option<u64>, ProgressError> {
        self.values
            .get(key)
            .map(|raw| parse_counter(key, raw))
            .transpose()
    }

    fn store(&mut self, key: &str, value: u64) -> Result<(), ProgressError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    dir: PathBuf,
}

impl FileProgressStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self, key: &str) -> Result<Option<u64>, ProgressError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => parse_counter(key, &raw).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ProgressError::Io { path, source }),
        }
    }

    fn store(&mut self, key: &str, value: u64) -> Result<(), ProgressError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ProgressError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, value.to_string())
            .map_err(|source| ProgressError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryProgressStore::new();
        assert_eq!(store.load(HIGH_SCORE_KEY).unwrap(), None);
        store.store(HIGH_SCORE_KEY, 1250).unwrap();
        assert_eq!(store.load(HIGH_SCORE_KEY).unwrap(), Some(1250));
    }

    #[test]
    fn test_file_store_writes_integer_strings() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileProgressStore::new(dir.path().join("progress"));
        assert_eq!(store.load(LAST_LEVEL_KEY).unwrap(), None);
        store.store(LAST_LEVEL_KEY, 4).unwrap();
        let file = dir.path().join("progress").join(LAST_LEVEL_KEY);
        let raw = std::fs::read_to_string(file).unwrap();
        assert_eq!(raw, "4");
        assert_eq!(store.load(LAST_LEVEL_KEY).unwrap(), Some(4));
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(HIGH_SCORE_KEY), "lots").unwrap();
        let store = FileProgressStore::new(dir.path());
        assert!(matches!(
            store.load(HIGH_SCORE_KEY),
            Err(ProgressError::Corrupt { .. })
        ));
    }
}
