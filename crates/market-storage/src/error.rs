//! # Storage Error Types
//!
//! Error types for durable storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / MigrateError / serde_json::Error                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError (this module)                                            │
//! │       │                                                                 │
//! │       ├── Snapshot writer: logged at warn, never surfaced              │
//! │       │                                                                 │
//! │       └── Startup (open, migrate): ApiError::STORAGE_ERROR             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Durable storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not open the store.
    ///
    /// ## When This Occurs
    /// - Data directory can't be created
    /// - File permissions issue
    /// - Pool already closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Statement failed at runtime (disk full, locked, ...).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A value could not be encoded as JSON.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Internal storage error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to StorageError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::PoolClosed     → StorageError::ConnectionFailed
/// sqlx::Error::PoolTimedOut   → StorageError::ConnectionFailed
/// sqlx::Error::Database       → StorageError::QueryFailed
/// Other                       → StorageError::Internal
/// ```
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => StorageError::ConnectionFailed("Pool is closed".to_string()),
            sqlx::Error::PoolTimedOut => {
                StorageError::ConnectionFailed("Timed out acquiring a connection".to_string())
            }
            sqlx::Error::Database(db_err) => StorageError::QueryFailed(db_err.message().to_string()),
            _ => StorageError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StorageError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
