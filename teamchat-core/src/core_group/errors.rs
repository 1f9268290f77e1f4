//! Error types for group membership operations
//!
//! Group operations treat unknown groups and absent members as silent
//! no-ops, so storage failures are the only way they fail.

use crate::core_store::errors::StoreError;
use thiserror::Error;

/// Errors that can occur in group membership operations
#[derive(Debug, Error)]
pub enum GroupError {
    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
