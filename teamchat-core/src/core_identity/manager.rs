//! Identity manager: signup, login, logout and approval transitions
//!
//! Owns the user collection, the session and the scheduled automatic
//! approvals. Admin authorization for `update_user_status` is the
//! caller's responsibility; the core trusts the claimed admin flag.

use super::approval::ApprovalPolicy;
use super::errors::IdentityError;
use super::session::Session;
use super::user::{ApprovalStatus, StoredUser, User};
use super::validation::validate_handle_base;
use crate::clock::Clock;
use crate::core_store::model::{Handle, Timestamp, UserId};
use crate::core_store::{keys, Store};
use std::sync::Arc;
use tracing::{debug, info};

/// An automatic approval that becomes applicable at `due`.
///
/// Scheduled approvals live in memory only and do not survive a process
/// restart.
#[derive(Debug, Clone)]
struct ScheduledApproval {
    user_id: UserId,
    due: Timestamp,
}

/// Owns user records, credential checks and approval-status transitions
pub struct IdentityManager {
    store: Store,
    clock: Arc<dyn Clock>,
    policy: Arc<dyn ApprovalPolicy>,
    session: Session,
    scheduled: Vec<ScheduledApproval>,
}

impl IdentityManager {
    /// Create a manager, rehydrating the session from the store
    pub fn new(
        store: Store,
        clock: Arc<dyn Clock>,
        policy: Arc<dyn ApprovalPolicy>,
    ) -> Result<Self, IdentityError> {
        let session = Session::hydrate(&store)?;
        Ok(IdentityManager {
            store,
            clock,
            policy,
            session,
            scheduled: Vec::new(),
        })
    }

    fn load_users(&self) -> Result<Vec<StoredUser>, IdentityError> {
        Ok(self.store.get_or_default(keys::USERS)?)
    }

    fn save_users(&self, users: &[StoredUser]) -> Result<(), IdentityError> {
        Ok(self.store.put(keys::USERS, &users)?)
    }

    /// Register a new account.
    ///
    /// The handle base must be 3-20 word characters. On collision the
    /// assigned handle gets the first free numeric suffix: `@joe`, `@joe1`,
    /// `@joe2`, … The account starts out `pending` and is never logged in
    /// here; the configured approval policy may schedule an automatic
    /// approval applied on a later [`tick`](Self::tick).
    pub fn signup(
        &mut self,
        email: &str,
        password: &str,
        handle_base: &str,
    ) -> Result<Handle, IdentityError> {
        validate_handle_base(handle_base)?;

        let mut users = self.load_users()?;
        if users.iter().any(|u| u.email_matches(email)) {
            return Err(IdentityError::DuplicateEmail);
        }

        let mut handle = Handle::from_base(handle_base);
        let mut counter = 1u32;
        while users.iter().any(|u| u.username == handle) {
            handle = Handle::new(format!("@{}{}", handle_base, counter));
            counter += 1;
        }

        let user = StoredUser {
            id: UserId::generate(),
            email: email.to_string(),
            password: password.to_string(),
            username: handle.clone(),
            is_admin: false,
            approval_status: ApprovalStatus::Pending,
        };

        let public = user.to_public();
        users.push(user);
        self.save_users(&users)?;

        let now = self.clock.now();
        if let Some(due) = self.policy.approval_due(&public, now) {
            debug!(user = %public.username, %due, "scheduled automatic approval");
            self.scheduled.push(ScheduledApproval {
                user_id: public.id.clone(),
                due,
            });
        }

        info!(user = %handle, "signup accepted, pending approval");
        Ok(handle)
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password produce the same
    /// [`IdentityError::InvalidCredentials`]. A matching credential still
    /// fails while the account is `pending` or `rejected`. Success stores
    /// the credential-stripped projection in the session.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, IdentityError> {
        let users = self.load_users()?;
        let found = users
            .iter()
            .find(|u| u.email_matches(email) && u.password == password);

        let user = match found {
            Some(user) => user,
            None => return Err(IdentityError::InvalidCredentials),
        };

        match user.approval_status {
            ApprovalStatus::Approved => {
                let public = user.to_public();
                self.session.set(&self.store, public.clone())?;
                info!(user = %public.username, "login successful");
                Ok(public)
            }
            ApprovalStatus::Pending => Err(IdentityError::NotApproved),
            ApprovalStatus::Rejected => Err(IdentityError::Rejected),
        }
    }

    /// Clear the session; safe to call when nobody is logged in
    pub fn logout(&mut self) -> Result<(), IdentityError> {
        self.session.clear(&self.store)?;
        debug!("session cleared");
        Ok(())
    }

    /// The authenticated user, if any
    pub fn current_user(&self) -> Option<&User> {
        self.session.current()
    }

    /// Move a user to a new approval status.
    ///
    /// Any transition between the three states is allowed. An unknown
    /// `user_id` is silently ignored. The caller is responsible for
    /// checking that the actor is an admin.
    pub fn update_user_status(
        &mut self,
        user_id: &UserId,
        status: ApprovalStatus,
    ) -> Result<(), IdentityError> {
        let mut users = self.load_users()?;
        let Some(user) = users.iter_mut().find(|u| &u.id == user_id) else {
            debug!(%user_id, "status update for unknown user ignored");
            return Ok(());
        };

        let previous = user.approval_status;
        user.approval_status = status;
        let public = user.to_public();
        self.save_users(&users)?;
        self.session.refresh(&self.store, public)?;

        info!(%user_id, %previous, %status, "approval status changed");
        Ok(())
    }

    /// All users in signup order, credential-stripped
    pub fn list_users(&self) -> Result<Vec<User>, IdentityError> {
        Ok(self
            .load_users()?
            .iter()
            .map(StoredUser::to_public)
            .collect())
    }

    /// Approved users only, for the active-user directory
    pub fn list_active_users(&self) -> Result<Vec<User>, IdentityError> {
        Ok(self
            .list_users()?
            .into_iter()
            .filter(|u| u.approval_status == ApprovalStatus::Approved)
            .collect())
    }

    /// Apply scheduled automatic approvals that have come due.
    ///
    /// Invoked by the caller on its own timer tick. A scheduled approval is
    /// dropped without effect when an admin already moved the account out
    /// of `pending`. Returns the ids that were approved.
    pub fn tick(&mut self) -> Result<Vec<UserId>, IdentityError> {
        let now = self.clock.now();
        let due: Vec<ScheduledApproval> = self
            .scheduled
            .iter()
            .filter(|s| s.due <= now)
            .cloned()
            .collect();
        if due.is_empty() {
            return Ok(Vec::new());
        }
        self.scheduled.retain(|s| s.due > now);

        let mut users = self.load_users()?;
        let mut approved = Vec::new();
        for entry in due {
            let Some(user) = users.iter_mut().find(|u| u.id == entry.user_id) else {
                continue;
            };
            if user.approval_status != ApprovalStatus::Pending {
                debug!(user = %user.username, "automatic approval superseded by admin");
                continue;
            }
            user.approval_status = ApprovalStatus::Approved;
            info!(user = %user.username, "user auto-approved");
            approved.push(entry.user_id);
        }

        if !approved.is_empty() {
            self.save_users(&users)?;
        }
        Ok(approved)
    }
}
