//! User records and the approval status gate
//!
//! Two shapes for one entity: the internal [`StoredUser`] carries the raw
//! password for the mock credential check and never leaves this module's
//! crate boundary; the [`User`] projection is what every caller sees.

use crate::core_store::model::{Handle, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state gate controlling login eligibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Fresh signup, waiting on an admin (or the auto-approval policy)
    Pending,
    /// May log in
    Approved,
    /// Turned away at login
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Internal user record, password included
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredUser {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub username: Handle,
    pub is_admin: bool,
    pub approval_status: ApprovalStatus,
}

impl StoredUser {
    /// Case-insensitive email comparison; emails are unique up to case
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }

    /// Total conversion to the credential-stripped projection
    pub fn to_public(&self) -> User {
        User {
            id: self.id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            is_admin: self.is_admin,
            approval_status: self.approval_status,
        }
    }
}

/// Credential-stripped user projection handed to callers and persisted
/// under the `loggedInUser` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: Handle,
    pub is_admin: bool,
    pub approval_status: ApprovalStatus,
}
