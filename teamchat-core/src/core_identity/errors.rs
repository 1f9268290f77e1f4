//! Error types for identity and approval operations
//!
//! Display strings double as the user-facing messages; the presentation
//! layer shows them verbatim.

use crate::core_store::errors::StoreError;
use thiserror::Error;

/// Errors that can occur during signup, login and approval management
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Malformed signup input
    #[error("{0}")]
    Validation(String),

    /// Email already registered (case-insensitive)
    #[error("An account with this email already exists.")]
    DuplicateEmail,

    /// Unknown email or wrong password. Deliberately the same message for
    /// both so a caller cannot probe which field was wrong.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Account exists but is still pending approval
    #[error("Your account is not approved yet.")]
    NotApproved,

    /// Account exists but was rejected
    #[error("Your account has been rejected.")]
    Rejected,

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
