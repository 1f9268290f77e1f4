//! teamchat-core
//!
//! Domain logic of a small approval-gated group chat: identity and
//! approval management, group membership, messaging with a per-user send
//! cooldown and `@mention` tooling, all persisted through a key-value
//! store abstraction. There is no network layer; a presentation layer
//! (the CLI, a future UI) drives these modules directly and owns all
//! rendering and admin gating.

pub mod clock;
pub mod config;
pub mod core_group;
pub mod core_identity;
pub mod core_message;
pub mod core_store;
pub mod demo;
pub mod logging;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use core_group::{Group, GroupError, GroupManager};
pub use core_identity::{
    ApprovalStatus, IdentityError, IdentityManager, Session, User,
};
pub use core_message::{Message, MessageEngine, MessageError};
pub use core_store::model::{GroupId, Handle, MessageId, Timestamp, UserId};
pub use core_store::Store;
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogLevel};
