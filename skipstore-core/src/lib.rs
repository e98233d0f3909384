//! SkipStore Core - Skip List Index with Flat-File Persistence
//!
//! An ordered key-value index built on a probabilistic skip list:
//! - Expected O(log n) insert, search and delete
//! - Unique keys; duplicate inserts are reported, never overwritten
//! - Dump to and load from a plain `key: value` text file
//!
//! # Architecture
//!
//! - **Index**: the skip list engine. Entries live in an arena and every
//!   level chain links them by index, so one entry is shared by all the levels
//!   it was promoted to without shared ownership.
//! - **Persistence**: writes the bottom level chain in key order, and reads a
//!   file back line by line through the regular insert path.
//!
//! # Example
//!
//! ```rust
//! use skipstore_core::{IndexConfig, InsertStatus, SkipIndex};
//!
//! let index: SkipIndex<i64, String> = SkipIndex::with_seed(IndexConfig::default(), 7).unwrap();
//! assert_eq!(index.insert(1, "a".to_string()), InsertStatus::Inserted);
//! assert_eq!(index.insert(1, "b".to_string()), InsertStatus::AlreadyExists);
//! assert_eq!(index.search(&1), Some("a".to_string()));
//! ```

pub mod index;
pub mod persist;

mod error;

pub use error::{Result, StoreError};
pub use index::{DeleteStatus, IndexConfig, InsertStatus, SkipIndex, SkipList};
pub use persist::LoadReport;

/// SkipStore version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod config {
    /// Default upper bound on skip list levels
    pub const DEFAULT_MAX_LEVEL: usize = 16;

    /// Largest accepted `max_level`
    pub const MAX_LEVEL_LIMIT: usize = 32;

    /// Separator between key and value in the store file
    pub const DEFAULT_DELIMITER: char = ':';

    /// Backing file written by `dump`
    pub const DEFAULT_STORE_FILE: &str = "store/dumpFile";
}
