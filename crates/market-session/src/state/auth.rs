//! # Auth State
//!
//! The signed-in user, as far as the cart needs to know. Credentials are
//! checked elsewhere; `sign_in` receives a user that is already verified.
//!
//! The user is kept under `@market-app:auth-user` so a restart keeps the
//! session. Storage failures are logged and never undo the in-memory change.

use std::sync::{Arc, PoisonError, RwLock};

use market_core::validation::validate_email;
use market_core::{CoreResult, SessionUser};
use market_storage::SessionUserRepository;
use tracing::{info, warn};

/// Shared handle to the current user.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    user: Arc<RwLock<Option<SessionUser>>>,
    repo: Option<SessionUserRepository>,
}

impl AuthState {
    /// Auth state persisted through `repo`. Starts signed out; call `restore`.
    pub fn new(repo: SessionUserRepository) -> Self {
        AuthState {
            user: Arc::default(),
            repo: Some(repo),
        }
    }

    /// Auth state that never persists.
    pub fn ephemeral() -> Self {
        AuthState::default()
    }

    /// Loads the stored user, if any. Returns whether one was restored.
    pub async fn restore(&self) -> bool {
        let Some(repo) = &self.repo else {
            return false;
        };

        match repo.load().await {
            Ok(Some(user)) => {
                info!(user_id = %user.id, "Session restored");
                self.set(Some(user));
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Failed to load stored user");
                false
            }
        }
    }

    /// Signs a verified user in. The email is normalized first.
    ///
    /// ## Errors
    /// `Validation` when the email is malformed; nothing changes.
    pub async fn sign_in(&self, mut user: SessionUser) -> CoreResult<()> {
        user.email = validate_email(&user.email)?;
        info!(user_id = %user.id, role = ?user.role, "Signed in");

        self.set(Some(user.clone()));

        if let Some(repo) = &self.repo {
            if let Err(e) = repo.save(&user).await {
                warn!(error = %e, "Failed to persist signed-in user");
            }
        }
        Ok(())
    }

    pub async fn sign_out(&self) {
        info!("Signed out");
        self.set(None);

        if let Some(repo) = &self.repo {
            if let Err(e) = repo.clear().await {
                warn!(error = %e, "Failed to clear stored user");
            }
        }
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<SessionUser> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|u| u.is_admin())
    }

    pub fn is_customer(&self) -> bool {
        self.current_user().is_some_and(|u| u.is_customer())
    }

    fn set(&self, user: Option<SessionUser>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::UserRole;
    use market_storage::{Storage, StorageConfig};

    fn user(email: &str, role: UserRole) -> SessionUser {
        SessionUser {
            id: "u1".to_string(),
            name: "Caio".to_string(),
            email: email.to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_sign_in_normalizes_email() {
        let auth = AuthState::ephemeral();
        auth.sign_in(user(" Caio@Example.COM ", UserRole::Customer)).await.unwrap();

        assert_eq!(auth.current_user().unwrap().email, "caio@example.com");
        assert!(auth.is_customer());
        assert!(!auth.is_admin());
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_email() {
        let auth = AuthState::ephemeral();
        assert!(auth.sign_in(user("not-an-email", UserRole::Customer)).await.is_err());
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();

        let auth = AuthState::new(storage.session_user());
        auth.sign_in(user("admin@example.com", UserRole::Admin)).await.unwrap();

        let restarted = AuthState::new(storage.session_user());
        assert!(restarted.restore().await);
        assert!(restarted.is_admin());

        restarted.sign_out().await;
        let again = AuthState::new(storage.session_user());
        assert!(!again.restore().await);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_user_in_memory() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        let auth = AuthState::new(storage.session_user());
        storage.close().await;

        auth.sign_in(user("x@y.com", UserRole::Customer)).await.unwrap();
        assert!(auth.is_authenticated());
    }
}
