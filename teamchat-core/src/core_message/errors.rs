//! Error types for messaging operations

use crate::core_store::errors::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when sending or querying messages
#[derive(Debug, Error)]
pub enum MessageError {
    /// The target group does not exist; a message must reference an
    /// existing group at creation time
    #[error("Group not found.")]
    GroupNotFound,

    /// The sender is still inside the send-rate window
    #[error("You are on cooldown for another {} seconds.", .remaining.as_secs())]
    CooldownActive { remaining: Duration },

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
