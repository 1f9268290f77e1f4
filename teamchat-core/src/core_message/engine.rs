//! Messaging engine
//!
//! Owns the message collection and the per-user cooldown. Mention
//! extraction and autocomplete live in [`super::mention`]; the engine only
//! binds the suggestion limit from configuration.

use super::cooldown::CooldownTracker;
use super::errors::MessageError;
use super::mention;
use super::message::Message;
use crate::clock::Clock;
use crate::config::MessagingConfig;
use crate::core_group::Group;
use crate::core_store::model::{GroupId, Handle, UserId};
use crate::core_store::{keys, Store};
use crate::core_identity::User;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Owns message records, send-rate limiting and mention suggestion
pub struct MessageEngine {
    store: Store,
    clock: Arc<dyn Clock>,
    cooldown: CooldownTracker,
    suggestion_limit: usize,
}

impl MessageEngine {
    pub fn new(store: Store, clock: Arc<dyn Clock>, config: &MessagingConfig) -> Self {
        let cooldown = CooldownTracker::new(store.clone(), clock.clone(), config.cooldown_window);
        MessageEngine {
            store,
            clock,
            cooldown,
            suggestion_limit: config.mention_suggestion_limit,
        }
    }

    /// Append a message to a group.
    ///
    /// Fails when the group does not exist or the sender's cooldown is
    /// still running. On success the sender's cooldown restarts at the
    /// full window, across all groups.
    ///
    /// Content must already be trimmed and non-empty; that check belongs
    /// to the caller.
    pub fn send_message(
        &self,
        group_id: &GroupId,
        sender: &User,
        content: &str,
    ) -> Result<Message, MessageError> {
        debug_assert!(!content.trim().is_empty(), "caller must reject empty content");

        let groups: Vec<Group> = self.store.get_or_default(keys::GROUPS)?;
        if !groups.iter().any(|g| &g.id == group_id) {
            return Err(MessageError::GroupNotFound);
        }

        let remaining = self.cooldown.remaining(&sender.id)?;
        if remaining > Duration::ZERO {
            warn!(sender = %sender.username, ?remaining, "send rejected by cooldown");
            return Err(MessageError::CooldownActive { remaining });
        }

        let now = self.clock.now();
        let message = Message::new(content, sender.username.clone(), now, group_id.clone());

        let mut messages: Vec<Message> = self.store.get_or_default(keys::MESSAGES)?;
        messages.push(message.clone());
        self.store.put(keys::MESSAGES, &messages)?;
        self.cooldown.record_send(&sender.id, now)?;

        info!(sender = %sender.username, group = %group_id, "message sent");
        Ok(message)
    }

    /// Time left before the user may send again, zero when clear. Pure
    /// query; callers poll it to drive a countdown.
    pub fn remaining_cooldown(&self, user_id: &UserId) -> Result<Duration, MessageError> {
        Ok(self.cooldown.remaining(user_id)?)
    }

    /// The configured cooldown window
    pub fn cooldown_window(&self) -> Duration {
        self.cooldown.window()
    }

    /// Messages of one group in creation order
    pub fn list_messages(&self, group_id: &GroupId) -> Result<Vec<Message>, MessageError> {
        let messages: Vec<Message> = self.store.get_or_default(keys::MESSAGES)?;
        Ok(messages
            .into_iter()
            .filter(|m| &m.group_id == group_id)
            .collect())
    }

    /// Mention autocomplete against a handle directory, capped at the
    /// configured limit
    pub fn suggest_mentions(&self, partial: &str, directory: &[Handle]) -> Vec<Handle> {
        mention::suggest_mentions(partial, directory, self.suggestion_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::core_group::GroupManager;
    use crate::core_identity::ApprovalStatus;
    use crate::core_store::model::Timestamp;

    fn engine() -> (MessageEngine, GroupManager, Arc<ManualClock>) {
        let store = Store::memory();
        let clock = Arc::new(ManualClock::new(Timestamp::from_millis(1_000_000)));
        let engine = MessageEngine::new(store.clone(), clock.clone(), &MessagingConfig::default());
        (engine, GroupManager::new(store), clock)
    }

    fn sender(name: &str) -> User {
        User {
            id: UserId::new(name),
            email: format!("{}@example.com", name),
            username: Handle::from_base(name),
            is_admin: false,
            approval_status: ApprovalStatus::Approved,
        }
    }

    #[test]
    fn test_send_message_appends_to_group() {
        let (engine, groups, _) = engine();
        let group = groups
            .create_group("General", &Handle::from_base("admin"))
            .unwrap();
        let user = sender("joe");

        let message = engine
            .send_message(&group.id, &user, "hello @admin")
            .unwrap();
        assert_eq!(message.sender, user.username);
        assert_eq!(message.group_id, group.id);

        let listed = engine.list_messages(&group.id).unwrap();
        assert_eq!(listed, vec![message]);
    }

    #[test]
    fn test_send_to_unknown_group_fails() {
        let (engine, _, _) = engine();
        let err = engine
            .send_message(&GroupId::new("ghost"), &sender("joe"), "hello")
            .unwrap_err();
        assert!(matches!(err, MessageError::GroupNotFound));
    }

    #[test]
    fn test_second_send_within_window_is_rejected() {
        let (engine, groups, clock) = engine();
        let group = groups
            .create_group("General", &Handle::from_base("admin"))
            .unwrap();
        let user = sender("joe");

        engine.send_message(&group.id, &user, "first").unwrap();
        let err = engine
            .send_message(&group.id, &user, "second")
            .unwrap_err();
        assert!(matches!(err, MessageError::CooldownActive { .. }));

        clock.advance(engine.cooldown_window());
        engine.send_message(&group.id, &user, "second").unwrap();
    }

    #[test]
    fn test_cooldown_is_global_across_groups() {
        let (engine, groups, _) = engine();
        let admin = Handle::from_base("admin");
        let g1 = groups.create_group("General", &admin).unwrap();
        let g2 = groups.create_group("Project-Alpha", &admin).unwrap();
        let user = sender("joe");

        engine.send_message(&g1.id, &user, "here").unwrap();
        let err = engine.send_message(&g2.id, &user, "and here").unwrap_err();
        assert!(matches!(err, MessageError::CooldownActive { .. }));
    }

    #[test]
    fn test_cooldown_is_per_user() {
        let (engine, groups, _) = engine();
        let group = groups
            .create_group("General", &Handle::from_base("admin"))
            .unwrap();

        engine
            .send_message(&group.id, &sender("joe"), "from joe")
            .unwrap();
        engine
            .send_message(&group.id, &sender("jane"), "from jane")
            .unwrap();
        assert_eq!(engine.list_messages(&group.id).unwrap().len(), 2);
    }

    #[test]
    fn test_remaining_cooldown_counts_down() {
        let (engine, groups, clock) = engine();
        let group = groups
            .create_group("General", &Handle::from_base("admin"))
            .unwrap();
        let user = sender("joe");

        assert_eq!(
            engine.remaining_cooldown(&user.id).unwrap(),
            Duration::ZERO
        );

        engine.send_message(&group.id, &user, "hello").unwrap();
        assert_eq!(
            engine.remaining_cooldown(&user.id).unwrap(),
            engine.cooldown_window()
        );

        clock.advance(Duration::from_secs(60));
        assert_eq!(
            engine.remaining_cooldown(&user.id).unwrap(),
            engine.cooldown_window() - Duration::from_secs(60)
        );
    }

    #[test]
    fn test_suggestion_limit_comes_from_config() {
        let store = Store::memory();
        let clock = Arc::new(ManualClock::new(Timestamp::from_millis(0)));
        let config = MessagingConfig {
            mention_suggestion_limit: 2,
            ..Default::default()
        };
        let engine = MessageEngine::new(store, clock, &config);

        let directory: Vec<Handle> = ["@ua", "@ub", "@uc"]
            .iter()
            .map(|h| Handle::new(*h))
            .collect();
        assert_eq!(engine.suggest_mentions("u", &directory).len(), 2);
    }

    #[test]
    fn test_messages_of_other_groups_are_not_listed() {
        let (engine, groups, clock) = engine();
        let admin = Handle::from_base("admin");
        let g1 = groups.create_group("General", &admin).unwrap();
        let g2 = groups.create_group("Project-Alpha", &admin).unwrap();

        engine.send_message(&g1.id, &sender("joe"), "to g1").unwrap();
        clock.advance(engine.cooldown_window());
        engine.send_message(&g2.id, &sender("joe"), "to g2").unwrap();

        let listed = engine.list_messages(&g1.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, "to g1");
    }
}
