//! Logical key layout of the persistent store
//!
//! The store is a flat key-value namespace. Collections (`users`, `groups`,
//! `messages`) live under a single key each and are read, mutated and
//! written back whole; the session projection and per-user cooldown stamps
//! are single-record keys.

use super::model::UserId;

/// Ordered sequence of internal user records (including passwords)
pub const USERS: &str = "users";

/// Ordered sequence of group records
pub const GROUPS: &str = "groups";

/// Ordered sequence of message records
pub const MESSAGES: &str = "messages";

/// Credential-stripped projection of the logged-in user, absent when
/// nobody is logged in
pub const LOGGED_IN_USER: &str = "loggedInUser";

/// Per-user last-send stamp, an epoch-millisecond string
pub fn cooldown(user_id: &UserId) -> String {
    format!("cooldown_{}", user_id)
}
