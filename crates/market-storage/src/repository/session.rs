//! # Session User Repository
//!
//! Persists the signed-in user so a restart keeps the session.

use market_core::SessionUser;
use tracing::warn;

use crate::error::StorageResult;
use crate::repository::kv::KeyValueRepository;

/// Storage key of the signed-in user.
pub const AUTH_USER_STORAGE_KEY: &str = "@market-app:auth-user";

/// Repository for the signed-in user record.
#[derive(Debug, Clone)]
pub struct SessionUserRepository {
    kv: KeyValueRepository,
}

impl SessionUserRepository {
    pub fn new(kv: KeyValueRepository) -> Self {
        SessionUserRepository { kv }
    }

    /// Loads the stored user. A malformed record loads as `None`.
    pub async fn load(&self) -> StorageResult<Option<SessionUser>> {
        let Some(raw) = self.kv.get(AUTH_USER_STORAGE_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed stored user");
                Ok(None)
            }
        }
    }

    pub async fn save(&self, user: &SessionUser) -> StorageResult<()> {
        let json = serde_json::to_string(user)?;
        self.kv.set(AUTH_USER_STORAGE_KEY, &json).await
    }

    pub async fn clear(&self) -> StorageResult<()> {
        self.kv.remove(AUTH_USER_STORAGE_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Storage, StorageConfig};
    use market_core::UserRole;

    #[tokio::test]
    async fn test_save_load_clear() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        let repo = storage.session_user();
        let user = SessionUser {
            id: "u1".to_string(),
            name: "Bia".to_string(),
            email: "bia@example.com".to_string(),
            role: UserRole::Customer,
        };

        assert_eq!(repo.load().await.unwrap(), None);

        repo.save(&user).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(user));

        repo.clear().await.unwrap();
        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_user_loads_as_none() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        storage.kv().set(AUTH_USER_STORAGE_KEY, "[]").await.unwrap();

        assert_eq!(storage.session_user().load().await.unwrap(), None);
    }
}
