//! Session state
//!
//! A session holds at most one authenticated user as a credential-stripped
//! projection. It is an explicit object owned by the identity manager and
//! passed where identity is needed, not a process-wide global. The
//! projection is mirrored under the `loggedInUser` key so a restart picks
//! it back up.

use super::user::User;
use crate::core_store::errors::StoreResult;
use crate::core_store::{keys, Store};

/// At most one logged-in user
#[derive(Debug, Default)]
pub struct Session {
    current: Option<User>,
}

impl Session {
    /// Restore the session from the persisted projection, empty when absent
    pub fn hydrate(store: &Store) -> StoreResult<Self> {
        let current = store.get::<User>(keys::LOGGED_IN_USER)?;
        Ok(Session { current })
    }

    /// The authenticated user, if any
    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Record a successful login and persist the projection
    pub(crate) fn set(&mut self, store: &Store, user: User) -> StoreResult<()> {
        store.put(keys::LOGGED_IN_USER, &user)?;
        self.current = Some(user);
        Ok(())
    }

    /// Clear the session unconditionally; safe to call when already empty
    pub(crate) fn clear(&mut self, store: &Store) -> StoreResult<()> {
        store.remove(keys::LOGGED_IN_USER)?;
        self.current = None;
        Ok(())
    }

    /// Refresh the in-memory copy of an already-set session, used after a
    /// status change touches the logged-in user
    pub(crate) fn refresh(&mut self, store: &Store, user: User) -> StoreResult<()> {
        if self
            .current
            .as_ref()
            .is_some_and(|current| current.id == user.id)
        {
            self.set(store, user)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_identity::user::ApprovalStatus;
    use crate::core_store::model::{Handle, UserId};

    fn user() -> User {
        User {
            id: UserId::new("user1"),
            email: "user1@example.com".to_string(),
            username: Handle::from_base("user1"),
            is_admin: false,
            approval_status: ApprovalStatus::Approved,
        }
    }

    #[test]
    fn test_hydrate_empty_store() {
        let store = Store::memory();
        let session = Session::hydrate(&store).unwrap();
        assert!(session.current().is_none());
    }

    #[test]
    fn test_set_persists_and_hydrates() {
        let store = Store::memory();
        let mut session = Session::hydrate(&store).unwrap();
        session.set(&store, user()).unwrap();

        // A fresh session sees the same user
        let rehydrated = Session::hydrate(&store).unwrap();
        assert_eq!(rehydrated.current(), Some(&user()));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = Store::memory();
        let mut session = Session::hydrate(&store).unwrap();
        session.set(&store, user()).unwrap();

        session.clear(&store).unwrap();
        session.clear(&store).unwrap();
        assert!(session.current().is_none());
        assert!(Session::hydrate(&store).unwrap().current().is_none());
    }

    #[test]
    fn test_refresh_only_touches_matching_user() {
        let store = Store::memory();
        let mut session = Session::hydrate(&store).unwrap();
        session.set(&store, user()).unwrap();

        let mut other = user();
        other.id = UserId::new("someone-else");
        other.approval_status = ApprovalStatus::Rejected;
        session.refresh(&store, other).unwrap();
        assert_eq!(
            session.current().unwrap().approval_status,
            ApprovalStatus::Approved
        );

        let mut same = user();
        same.approval_status = ApprovalStatus::Rejected;
        session.refresh(&store, same).unwrap();
        assert_eq!(
            session.current().unwrap().approval_status,
            ApprovalStatus::Rejected
        );
    }
}
