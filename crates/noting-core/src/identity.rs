//! Current authenticated identity

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use crate::util::normalize_text_option;

/// Supplies the external id of the signed-in user, if any
pub trait IdentityProvider {
    fn current_identity_id(&self) -> Option<String>;
}

/// Identity held in memory and swapped on sign-in / sign-out.
///
/// Clones observe the same identity.
#[derive(Clone, Debug, Default)]
pub struct SessionIdentity(Arc<RwLock<Option<String>>>);

impl SessionIdentity {
    /// Start with `user_id` signed in; blank ids count as signed out
    pub fn new(user_id: Option<String>) -> Self {
        Self(Arc::new(RwLock::new(normalize_text_option(user_id))))
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        *self.slot() = normalize_text_option(Some(user_id.into()));
    }

    pub fn sign_out(&self) {
        *self.slot() = None;
    }

    /// Writable identity; a writer that panicked left a whole value behind
    fn slot(&self) -> RwLockWriteGuard<'_, Option<String>> {
        self.0.write().unwrap_or_else(|poisoned| {
            tracing::warn!("Identity lock was poisoned; recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_identity_id(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identity_is_signed_out() {
        assert_eq!(
            SessionIdentity::new(Some("  ".to_string())).current_identity_id(),
            None
        );
    }

    #[test]
    fn sign_in_and_out_are_shared_between_clones() {
        let identity = SessionIdentity::signed_out();
        let observer = identity.clone();

        identity.sign_in(" user-1 ");
        assert_eq!(observer.current_identity_id().as_deref(), Some("user-1"));

        identity.sign_out();
        assert_eq!(observer.current_identity_id(), None);
    }

    #[test]
    fn poisoned_lock_still_switches_identity() {
        let identity = SessionIdentity::new(Some("user-1".to_string()));
        let poisoner = identity.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.0.write().unwrap();
            panic!("writer died holding the identity lock");
        })
        .join();
        assert!(identity.0.is_poisoned());

        identity.sign_in("user-2");
        assert_eq!(identity.current_identity_id().as_deref(), Some("user-2"));

        identity.sign_out();
        assert_eq!(identity.current_identity_id(), None);
    }
}
