use thiserror::Error;

/// Errors related to the core types of the short-code store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(String),
    #[error("storage serialization failed: {0}")]
    Serialization(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}
