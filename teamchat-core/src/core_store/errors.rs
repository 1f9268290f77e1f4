//! Error types for the storage subsystem

use thiserror::Error;

/// Errors that can occur in the storage subsystem
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage I/O error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
