//! Demo fixtures
//!
//! Seeds the store with the stock accounts, channels and welcome messages
//! so a fresh installation has something to click on. Each collection is
//! only written when its key is absent, so existing state is never
//! overwritten.

use crate::clock::Clock;
use crate::core_group::Group;
use crate::core_identity::{ApprovalStatus, StoredUser};
use crate::core_message::Message;
use crate::core_store::errors::StoreResult;
use crate::core_store::model::{GroupId, Handle, MessageId, Timestamp, UserId};
use crate::core_store::{keys, Store};
use std::time::Duration;
use tracing::debug;

fn demo_users() -> Vec<StoredUser> {
    vec![
        StoredUser {
            id: UserId::new("admin123"),
            email: "Casual@gmail.com".to_string(),
            password: "Casual777".to_string(),
            username: Handle::new("@admin"),
            is_admin: true,
            approval_status: ApprovalStatus::Approved,
        },
        StoredUser {
            id: UserId::new("user1"),
            email: "user1@example.com".to_string(),
            password: "password123".to_string(),
            username: Handle::new("@user1"),
            is_admin: false,
            approval_status: ApprovalStatus::Approved,
        },
        StoredUser {
            id: UserId::new("user2"),
            email: "user2@example.com".to_string(),
            password: "password123".to_string(),
            username: Handle::new("@user2"),
            is_admin: false,
            approval_status: ApprovalStatus::Pending,
        },
    ]
}

fn demo_groups() -> Vec<Group> {
    vec![
        Group {
            id: GroupId::new("g1"),
            name: "General".to_string(),
            members: vec![Handle::new("@admin"), Handle::new("@user1")],
        },
        Group {
            id: GroupId::new("g2"),
            name: "Project-Alpha".to_string(),
            members: vec![Handle::new("@admin")],
        },
    ]
}

fn demo_messages(now: Timestamp) -> Vec<Message> {
    let at = |seconds_ago: u64| {
        Timestamp::from_millis(
            now.as_millis()
                .saturating_sub(Duration::from_secs(seconds_ago).as_millis() as u64),
        )
    };
    vec![
        Message {
            id: MessageId::new("m1"),
            content: "Hello @user1, welcome to the General channel!".to_string(),
            sender: Handle::new("@admin"),
            timestamp: at(200),
            group_id: GroupId::new("g1"),
        },
        Message {
            id: MessageId::new("m2"),
            content: "Thanks @admin! Glad to be here.".to_string(),
            sender: Handle::new("@user1"),
            timestamp: at(100),
            group_id: GroupId::new("g1"),
        },
        Message {
            id: MessageId::new("m3"),
            content: "This is the private channel for Project Alpha.".to_string(),
            sender: Handle::new("@admin"),
            timestamp: at(50),
            group_id: GroupId::new("g2"),
        },
    ]
}

/// Write the demo fixtures for every collection key that is still absent
pub fn seed_demo_data(store: &Store, clock: &dyn Clock) -> StoreResult<()> {
    if store.get_raw(keys::USERS)?.is_none() {
        debug!("seeding demo users");
        store.put(keys::USERS, &demo_users())?;
    }
    if store.get_raw(keys::GROUPS)?.is_none() {
        debug!("seeding demo groups");
        store.put(keys::GROUPS, &demo_groups())?;
    }
    if store.get_raw(keys::MESSAGES)?.is_none() {
        debug!("seeding demo messages");
        store.put(keys::MESSAGES, &demo_messages(clock.now()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_seed_populates_empty_store() {
        let store = Store::memory();
        let clock = ManualClock::new(Timestamp::from_millis(1_000_000));
        seed_demo_data(&store, &clock).unwrap();

        let users: Vec<StoredUser> = store.get_or_default(keys::USERS).unwrap();
        let groups: Vec<Group> = store.get_or_default(keys::GROUPS).unwrap();
        let messages: Vec<Message> = store.get_or_default(keys::MESSAGES).unwrap();

        assert_eq!(users.len(), 3);
        assert!(users[0].is_admin);
        assert_eq!(groups.len(), 2);
        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| m.timestamp.as_millis() < 1_000_000));
    }

    #[test]
    fn test_seed_never_overwrites_existing_collections() {
        let store = Store::memory();
        let clock = ManualClock::new(Timestamp::from_millis(1_000_000));
        store.put(keys::USERS, &Vec::<StoredUser>::new()).unwrap();

        seed_demo_data(&store, &clock).unwrap();

        let users: Vec<StoredUser> = store.get_or_default(keys::USERS).unwrap();
        assert!(users.is_empty());
        // Other collections were still absent and got seeded
        let groups: Vec<Group> = store.get_or_default(keys::GROUPS).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_seeded_admin_can_log_in() {
        use crate::core_identity::{IdentityManager, ManualApproval};
        use std::sync::Arc;

        let store = Store::memory();
        let clock = Arc::new(ManualClock::new(Timestamp::from_millis(1_000_000)));
        seed_demo_data(&store, clock.as_ref()).unwrap();

        let mut identity =
            IdentityManager::new(store, clock, Arc::new(ManualApproval)).unwrap();
        let admin = identity.login("casual@gmail.com", "Casual777").unwrap();
        assert!(admin.is_admin);
        assert_eq!(admin.username.as_str(), "@admin");
    }
}
