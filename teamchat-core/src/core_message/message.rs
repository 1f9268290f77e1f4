//! Message data structure

use crate::core_store::model::{GroupId, Handle, MessageId, Timestamp};
use serde::{Deserialize, Serialize};

/// An immutable chat message.
///
/// Content is raw text and may embed `@handle` mention tokens. Messages
/// are never edited or individually deleted; they only disappear when
/// their group is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub sender: Handle,
    pub timestamp: Timestamp,
    pub group_id: GroupId,
}

impl Message {
    pub fn new(content: impl Into<String>, sender: Handle, timestamp: Timestamp, group_id: GroupId) -> Self {
        Message {
            id: MessageId::generate(),
            content: content.into(),
            sender,
            timestamp,
            group_id,
        }
    }
}
