//! Concurrent skip list index
//!
//! [`SkipIndex`] wraps the single-threaded [`SkipList`] engine in a
//! read-write lock: `insert`, `delete` and `clear` take the write half, so
//! at most one mutation runs at a time, and lookups take the read half.

mod arena;
mod level;
mod skiplist;

pub use level::LevelGenerator;
pub use skiplist::{Iter, SkipList};

use crate::{config, Result, StoreError};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Outcome of an insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertStatus {
    /// The key was new and the pair is now stored
    Inserted,
    /// The key was already present; the stored value is unchanged
    AlreadyExists,
}

impl InsertStatus {
    /// Check if the pair was stored
    pub fn is_inserted(self) -> bool {
        self == InsertStatus::Inserted
    }
}

/// Outcome of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// The key was present and has been removed
    Deleted,
    /// No entry with that key
    NotFound,
}

impl DeleteStatus {
    /// Check if an entry was removed
    pub fn is_deleted(self) -> bool {
        self == DeleteStatus::Deleted
    }
}

/// Index configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Upper bound on skip list levels
    pub max_level: usize,
    /// Separator between key and value in the store file
    pub delimiter: char,
    /// File written by `dump`
    pub store_file: PathBuf,
}

impl IndexConfig {
    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 || self.max_level > config::MAX_LEVEL_LIMIT {
            return Err(StoreError::Config(format!(
                "max_level must be in 1..={}, got {}",
                config::MAX_LEVEL_LIMIT,
                self.max_level
            )));
        }
        if self.delimiter.is_whitespace() || self.delimiter.is_ascii_digit() {
            return Err(StoreError::Config(format!(
                "delimiter {:?} cannot separate keys from values",
                self.delimiter
            )));
        }
        if self.store_file.as_os_str().is_empty() {
            return Err(StoreError::Config("store_file path is empty".into()));
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_level: config::DEFAULT_MAX_LEVEL,
            delimiter: config::DEFAULT_DELIMITER,
            store_file: PathBuf::from(config::DEFAULT_STORE_FILE),
        }
    }
}

/// Thread-safe skip list index
pub struct SkipIndex<K, V, R = StdRng> {
    config: IndexConfig,
    pub(crate) inner: RwLock<SkipList<K, V, R>>,
}

impl<K: Ord, V> SkipIndex<K, V, StdRng> {
    /// Create an index whose levels are drawn from an OS-seeded generator
    pub fn new(config: IndexConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an index with a deterministic level sequence
    pub fn with_seed(config: IndexConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<K: Ord, V, R: Rng> SkipIndex<K, V, R> {
    /// Create an index drawing levels from `rng`
    pub fn with_rng(config: IndexConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let list = SkipList::new(config.max_level, rng);
        Ok(Self {
            config,
            inner: RwLock::new(list),
        })
    }

    /// Insert a key-value pair
    pub fn insert(&self, key: K, value: V) -> InsertStatus {
        let mut list = self.inner.write();
        let status = list.insert(key, value);
        match status {
            InsertStatus::Inserted => debug!(len = list.len(), "inserted key"),
            InsertStatus::AlreadyExists => debug!("key exists, insert skipped"),
        }
        status
    }

    /// Look up the value stored for `key`
    pub fn search(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// Check whether `key` is present
    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    /// Remove the entry stored for `key`
    pub fn delete(&self, key: &K) -> DeleteStatus {
        let mut list = self.inner.write();
        match list.remove(key) {
            Some(_) => {
                debug!(len = list.len(), "deleted key");
                DeleteStatus::Deleted
            }
            None => {
                debug!("key not found, delete skipped");
                DeleteStatus::NotFound
            }
        }
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl<K, V, R> SkipIndex<K, V, R> {
    /// Number of stored entries
    pub fn size(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Highest populated level (0-indexed)
    pub fn top_level(&self) -> usize {
        self.inner.read().top_level()
    }

    /// Upper bound on levels
    pub fn max_level(&self) -> usize {
        self.config.max_level
    }

    /// Get the configuration
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Snapshot of every pair in ascending key order
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Keys on each populated level, bottom level first
    pub fn levels(&self) -> Vec<Vec<K>>
    where
        K: Clone,
    {
        self.inner
            .read()
            .level_keys()
            .into_iter()
            .map(|keys| keys.into_iter().cloned().collect())
            .collect()
    }
}

impl<K: fmt::Display, V: fmt::Display, R> fmt::Display for SkipIndex<K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner.read(), f)
    }
}

impl<K, V, R> fmt::Debug for SkipIndex<K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipIndex")
            .field("config", &self.config)
            .field("list", &*self.inner.read())
            .finish()
    }
}
