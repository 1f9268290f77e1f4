//! Approval policies
//!
//! What happens to a fresh signup is a pluggable decision: the demo
//! configuration approves automatically after a short delay, production
//! configurations leave every account to an admin. The policy only picks
//! a due time; the manager applies due approvals when the caller ticks it.

use super::user::User;
use crate::config::IdentityConfig;
use crate::core_store::model::Timestamp;
use std::sync::Arc;
use std::time::Duration;

/// Decides whether, and when, a fresh signup is approved automatically
pub trait ApprovalPolicy: Send + Sync {
    /// The time at which `user` becomes due for automatic approval, or
    /// `None` to leave approval entirely to an admin
    fn approval_due(&self, user: &User, now: Timestamp) -> Option<Timestamp>;
}

/// Demo policy: every signup is approved after a fixed delay unless an
/// admin intervenes first
#[derive(Debug, Clone)]
pub struct AutoApprove {
    delay: Duration,
}

impl AutoApprove {
    pub fn new(delay: Duration) -> Self {
        AutoApprove { delay }
    }
}

impl Default for AutoApprove {
    fn default() -> Self {
        AutoApprove::new(Duration::from_secs(2))
    }
}

impl ApprovalPolicy for AutoApprove {
    fn approval_due(&self, _user: &User, now: Timestamp) -> Option<Timestamp> {
        Some(now + self.delay)
    }
}

/// Production policy: approvals happen only through an admin
#[derive(Debug, Clone, Default)]
pub struct ManualApproval;

impl ApprovalPolicy for ManualApproval {
    fn approval_due(&self, _user: &User, _now: Timestamp) -> Option<Timestamp> {
        None
    }
}

/// Build the policy selected by the identity configuration
pub fn policy_from_config(config: &IdentityConfig) -> Arc<dyn ApprovalPolicy> {
    if config.auto_approve {
        Arc::new(AutoApprove::new(config.auto_approve_delay))
    } else {
        Arc::new(ManualApproval)
    }
}
