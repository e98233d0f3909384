//! Error types for SkipStore

use thiserror::Error;

/// Result type alias for SkipStore operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// SkipStore error types
///
/// Duplicate keys and missing keys are not errors: they are reported through
/// [`InsertStatus`](crate::InsertStatus) and [`DeleteStatus`](crate::DeleteStatus).
#[derive(Error, Debug)]
pub enum StoreError {
    /// IO operation on the backing file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid index configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A record cannot be represented in the line format
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    /// Check if error came from the filesystem
    pub fn is_io(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let err: StoreError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.is_io());
        assert_eq!(err.to_string(), "IO error: gone");

        let err = StoreError::Config("max_level must be positive".into());
        assert!(!err.is_io());
    }
}
