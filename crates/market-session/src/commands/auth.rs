//! # Auth Commands
//!
//! Hand a verified user to the session, or drop it. Checking credentials is
//! the login screen's job.

use market_core::SessionUser;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AuthState;

/// Signs a verified user in and returns it with its email normalized.
pub async fn sign_in(auth: &AuthState, user: SessionUser) -> Result<SessionUser, ApiError> {
    debug!(user_id = %user.id, "sign_in command");
    auth.sign_in(user).await?;
    auth.current_user()
        .ok_or_else(|| ApiError::internal("Signed-in user missing after sign in"))
}

pub async fn sign_out(auth: &AuthState) {
    debug!("sign_out command");
    auth.sign_out().await;
}

/// The signed-in user, if any.
pub fn get_current_user(auth: &AuthState) -> Option<SessionUser> {
    auth.current_user()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use market_core::UserRole;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let auth = AuthState::ephemeral();
        let user = sign_in(
            &auth,
            SessionUser {
                id: "u1".to_string(),
                name: "Leo".to_string(),
                email: "LEO@example.com".to_string(),
                role: UserRole::Customer,
            },
        )
        .await
        .unwrap();

        assert_eq!(user.email, "leo@example.com");
        assert_eq!(get_current_user(&auth), Some(user));

        sign_out(&auth).await;
        assert_eq!(get_current_user(&auth), None);
    }

    #[tokio::test]
    async fn test_bad_email_is_validation_error() {
        let auth = AuthState::ephemeral();
        let err = sign_in(
            &auth,
            SessionUser {
                id: "u1".to_string(),
                name: "Leo".to_string(),
                email: "leo@".to_string(),
                role: UserRole::Customer,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
