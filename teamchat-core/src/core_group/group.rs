//! Group data structure

use crate::core_store::model::{GroupId, Handle};
use serde::{Deserialize, Serialize};

/// A chat channel with an ordered member list.
///
/// Members are handles, kept in insertion order; a handle appears at most
/// once. Group names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub members: Vec<Handle>,
}

impl Group {
    /// Create a group with its creator as the sole member
    pub fn new(name: impl Into<String>, creator: Handle) -> Self {
        Group {
            id: GroupId::generate(),
            name: name.into(),
            members: vec![creator],
        }
    }

    /// Check membership
    pub fn is_member(&self, handle: &Handle) -> bool {
        self.members.contains(handle)
    }

    /// Append a member, returns false when already present
    pub fn add_member(&mut self, handle: Handle) -> bool {
        if self.is_member(&handle) {
            return false;
        }
        self.members.push(handle);
        true
    }

    /// Remove a member, returns false when not present
    pub fn remove_member(&mut self, handle: &Handle) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != handle);
        self.members.len() != before
    }
}
