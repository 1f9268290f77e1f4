//! Group membership manager
//!
//! Owns the group collection. Creating a group is an admin action, but the
//! admin gate itself sits with the caller (see the identity manager notes).

use super::errors::GroupError;
use super::group::Group;
use crate::core_message::Message;
use crate::core_store::model::{GroupId, Handle};
use crate::core_store::{keys, Store};
use tracing::{debug, info};

/// Owns group records and membership mutation
pub struct GroupManager {
    store: Store,
}

impl GroupManager {
    pub fn new(store: Store) -> Self {
        GroupManager { store }
    }

    fn load(&self) -> Result<Vec<Group>, GroupError> {
        Ok(self.store.get_or_default(keys::GROUPS)?)
    }

    fn save(&self, groups: &[Group]) -> Result<(), GroupError> {
        Ok(self.store.put(keys::GROUPS, &groups)?)
    }

    /// All groups in creation order
    pub fn list_groups(&self) -> Result<Vec<Group>, GroupError> {
        self.load()
    }

    /// Look up one group
    pub fn get_group(&self, group_id: &GroupId) -> Result<Option<Group>, GroupError> {
        Ok(self.load()?.into_iter().find(|g| &g.id == group_id))
    }

    /// Create a group with `creator` as its sole member.
    ///
    /// Duplicate names are permitted.
    pub fn create_group(&self, name: &str, creator: &Handle) -> Result<Group, GroupError> {
        let group = Group::new(name, creator.clone());
        let mut groups = self.load()?;
        groups.push(group.clone());
        self.save(&groups)?;

        info!(group = %group.name, creator = %creator, "group created");
        Ok(group)
    }

    /// Add `handle` to a group. No-op when already a member or when the
    /// group does not exist.
    pub fn join_group(&self, group_id: &GroupId, handle: &Handle) -> Result<(), GroupError> {
        let mut groups = self.load()?;
        let Some(group) = groups.iter_mut().find(|g| &g.id == group_id) else {
            debug!(%group_id, "join for unknown group ignored");
            return Ok(());
        };

        if group.add_member(handle.clone()) {
            info!(group = %group.name, member = %handle, "member joined");
            self.save(&groups)?;
        }
        Ok(())
    }

    /// Add `handle` to every group it is not yet a member of
    pub fn join_all_groups(&self, handle: &Handle) -> Result<(), GroupError> {
        let mut groups = self.load()?;
        let mut changed = false;
        for group in groups.iter_mut() {
            changed |= group.add_member(handle.clone());
        }

        if changed {
            info!(member = %handle, "joined all groups");
            self.save(&groups)?;
        }
        Ok(())
    }

    /// Remove `handle` from a group's member list. No-op when absent or
    /// when the group does not exist. Deselecting the group in an open
    /// view is the caller's concern.
    pub fn remove_member(&self, group_id: &GroupId, handle: &Handle) -> Result<(), GroupError> {
        let mut groups = self.load()?;
        let Some(group) = groups.iter_mut().find(|g| &g.id == group_id) else {
            debug!(%group_id, "member removal for unknown group ignored");
            return Ok(());
        };

        if group.remove_member(handle) {
            info!(group = %group.name, member = %handle, "member removed");
            self.save(&groups)?;
        }
        Ok(())
    }

    /// Delete a group and every message that references it.
    ///
    /// The shrunken group and message collections go out in a single
    /// atomic write, so no reader can observe messages with a dangling
    /// group id. Unknown group ids are silently ignored.
    pub fn delete_group(&self, group_id: &GroupId) -> Result<(), GroupError> {
        let mut groups = self.load()?;
        let before = groups.len();
        groups.retain(|g| &g.id != group_id);
        if groups.len() == before {
            debug!(%group_id, "delete for unknown group ignored");
            return Ok(());
        }

        let mut messages: Vec<Message> = self.store.get_or_default(keys::MESSAGES)?;
        let message_count = messages.len();
        messages.retain(|m| &m.group_id != group_id);

        self.store.put_many(vec![
            (keys::GROUPS.to_string(), Store::encode(&groups)?),
            (keys::MESSAGES.to_string(), Store::encode(&messages)?),
        ])?;

        info!(
            %group_id,
            cascaded = message_count - messages.len(),
            "group deleted with message cascade"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_store::model::{MessageId, Timestamp};

    fn manager() -> GroupManager {
        GroupManager::new(Store::memory())
    }

    fn admin() -> Handle {
        Handle::from_base("admin")
    }

    #[test]
    fn test_create_group_with_creator_as_sole_member() {
        let manager = manager();
        let group = manager.create_group("General", &admin()).unwrap();

        assert_eq!(group.members, vec![admin()]);
        let listed = manager.list_groups().unwrap();
        assert_eq!(listed, vec![group]);
    }

    #[test]
    fn test_duplicate_group_names_are_permitted() {
        let manager = manager();
        manager.create_group("General", &admin()).unwrap();
        manager.create_group("General", &admin()).unwrap();
        assert_eq!(manager.list_groups().unwrap().len(), 2);
    }

    #[test]
    fn test_join_group_is_idempotent() {
        let manager = manager();
        let group = manager.create_group("General", &admin()).unwrap();
        let joe = Handle::from_base("joe");

        manager.join_group(&group.id, &joe).unwrap();
        let once = manager.get_group(&group.id).unwrap().unwrap().members;

        manager.join_group(&group.id, &joe).unwrap();
        let twice = manager.get_group(&group.id).unwrap().unwrap().members;

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 2);
    }

    #[test]
    fn test_join_unknown_group_is_silent() {
        let manager = manager();
        manager
            .join_group(&GroupId::new("ghost"), &admin())
            .unwrap();
        assert!(manager.list_groups().unwrap().is_empty());
    }

    #[test]
    fn test_join_all_groups() {
        let manager = manager();
        let g1 = manager.create_group("General", &admin()).unwrap();
        let g2 = manager.create_group("Project-Alpha", &admin()).unwrap();
        let joe = Handle::from_base("joe");
        manager.join_group(&g1.id, &joe).unwrap();

        manager.join_all_groups(&joe).unwrap();

        for id in [g1.id, g2.id] {
            let group = manager.get_group(&id).unwrap().unwrap();
            assert!(group.is_member(&joe));
            // No duplicate entries from the group joined beforehand
            assert_eq!(group.members.iter().filter(|m| **m == joe).count(), 1);
        }
    }

    #[test]
    fn test_remove_member() {
        let manager = manager();
        let group = manager.create_group("General", &admin()).unwrap();
        let joe = Handle::from_base("joe");
        manager.join_group(&group.id, &joe).unwrap();

        manager.remove_member(&group.id, &joe).unwrap();
        assert!(!manager
            .get_group(&group.id)
            .unwrap()
            .unwrap()
            .is_member(&joe));

        // Absent member and unknown group are silent no-ops
        manager.remove_member(&group.id, &joe).unwrap();
        manager
            .remove_member(&GroupId::new("ghost"), &joe)
            .unwrap();
    }

    #[test]
    fn test_delete_group_cascades_messages() {
        let store = Store::memory();
        let manager = GroupManager::new(store.clone());
        let keep = manager.create_group("General", &admin()).unwrap();
        let doomed = manager.create_group("Project-Alpha", &admin()).unwrap();

        let messages = vec![
            Message {
                id: MessageId::new("m1"),
                content: "hello".to_string(),
                sender: admin(),
                timestamp: Timestamp::from_millis(1),
                group_id: keep.id.clone(),
            },
            Message {
                id: MessageId::new("m2"),
                content: "secret plans".to_string(),
                sender: admin(),
                timestamp: Timestamp::from_millis(2),
                group_id: doomed.id.clone(),
            },
        ];
        store.put(keys::MESSAGES, &messages).unwrap();

        manager.delete_group(&doomed.id).unwrap();

        assert_eq!(manager.list_groups().unwrap(), vec![keep.clone()]);
        let remaining: Vec<Message> = store.get_or_default(keys::MESSAGES).unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|m| m.group_id == keep.id));
    }

    #[test]
    fn test_delete_unknown_group_leaves_messages_alone() {
        let store = Store::memory();
        let manager = GroupManager::new(store.clone());
        let group = manager.create_group("General", &admin()).unwrap();
        let messages = vec![Message {
            id: MessageId::new("m1"),
            content: "hello".to_string(),
            sender: admin(),
            timestamp: Timestamp::from_millis(1),
            group_id: group.id.clone(),
        }];
        store.put(keys::MESSAGES, &messages).unwrap();

        manager.delete_group(&GroupId::new("ghost")).unwrap();

        let remaining: Vec<Message> = store.get_or_default(keys::MESSAGES).unwrap();
        assert_eq!(remaining.len(), 1);
    }
}
