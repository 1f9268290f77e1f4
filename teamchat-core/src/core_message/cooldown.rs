//! Per-user send-rate limiting
//!
//! Each user has at most one last-send stamp under `cooldown_<userId>`,
//! stored as an epoch-millisecond string. The cooldown is global per user,
//! not per group. The tracker holds no timers; callers poll
//! [`remaining`](CooldownTracker::remaining) on their own tick to drive a
//! countdown.

use crate::clock::Clock;
use crate::core_store::errors::StoreResult;
use crate::core_store::model::{Timestamp, UserId};
use crate::core_store::{keys, Store};
use std::sync::Arc;
use std::time::Duration;

/// Tracks when each user last sent a message
pub struct CooldownTracker {
    store: Store,
    clock: Arc<dyn Clock>,
    window: Duration,
}

impl CooldownTracker {
    pub fn new(store: Store, clock: Arc<dyn Clock>, window: Duration) -> Self {
        CooldownTracker {
            store,
            clock,
            window,
        }
    }

    /// The configured minimum gap between two sends
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The user's last send time; absent or unparsable stamps read as 0
    pub fn last_send(&self, user_id: &UserId) -> StoreResult<Timestamp> {
        let millis = self
            .store
            .get_raw(&keys::cooldown(user_id))?
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(0);
        Ok(Timestamp::from_millis(millis))
    }

    /// Time left before the user may send again, zero when clear
    pub fn remaining(&self, user_id: &UserId) -> StoreResult<Duration> {
        let elapsed = self
            .clock
            .now()
            .saturating_duration_since(self.last_send(user_id)?);
        Ok(self.window.saturating_sub(elapsed))
    }

    /// Stamp a successful send
    pub(crate) fn record_send(&self, user_id: &UserId, now: Timestamp) -> StoreResult<()> {
        self.store
            .put_raw(&keys::cooldown(user_id), &now.as_millis().to_string())
    }
}
