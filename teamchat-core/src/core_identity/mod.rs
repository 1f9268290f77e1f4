//! Identity and approval management
//!
//! Signup, credential checks, the session and the pending/approved/rejected
//! gate that controls who may log in.

mod approval;
mod errors;
mod manager;
mod session;
mod user;
mod validation;

pub use approval::{policy_from_config, ApprovalPolicy, AutoApprove, ManualApproval};
pub use errors::IdentityError;
pub use manager::IdentityManager;
pub use session::Session;
pub use user::{ApprovalStatus, User};

pub(crate) use user::StoredUser;
