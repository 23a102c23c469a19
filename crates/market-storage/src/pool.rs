//! # Storage Pool Management
//!
//! Connection pool creation and configuration for the SQLite store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storage Connection Pool                            │
//! │                                                                         │
//! │  Session startup                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageConfig::new(path) / ::in_memory()                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Storage::new(config).await ← Create pool + run migrations             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐                        │                           │
//! │  │  │Conn1│ │Conn2│  (max_connections)     │                           │
//! │  │  └─────┘ └─────┘                        │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ├── storage.kv()            raw key-value access                 │
//! │       ├── storage.cart()          cart snapshot record                 │
//! │       └── storage.session_user()  signed-in user record                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## In-Memory Stores
//! Every SQLite `:memory:` connection is its own database, so the in-memory
//! pool is pinned to one connection that never expires.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::migrations;
use crate::repository::cart::CartSnapshotRepository;
use crate::repository::kv::KeyValueRepository;
use crate::repository::session::SessionUserRepository;

/// File name used inside a data directory.
pub const DATABASE_FILE_NAME: &str = "market.db";

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// A SQLite file, created if missing.
    File(PathBuf),
    /// A private in-memory database (tests, ephemeral sessions).
    Memory,
}

/// Storage configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StorageConfig::new("/path/to/market.db")
///     .max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub location: StorageLocation,

    /// Maximum number of connections in the pool.
    /// Default: 4 (the app writes one record at a time)
    pub max_connections: u32,

    /// Connection timeout.
    /// Default: 10 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps connections open.
    pub idle_timeout: Option<Duration>,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl StorageConfig {
    /// File-backed configuration. The file and its parent directory are
    /// created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StorageConfig {
            location: StorageLocation::File(path.into()),
            max_connections: 4,
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// `<data_dir>/market.db`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        StorageConfig::new(data_dir.as_ref().join(DATABASE_FILE_NAME))
    }

    /// Creates an in-memory configuration (for testing).
    pub fn in_memory() -> Self {
        StorageConfig {
            location: StorageLocation::Memory,
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections. Ignored for in-memory stores.
    pub fn max_connections(mut self, max: u32) -> Self {
        if self.location != StorageLocation::Memory {
            self.max_connections = max.max(1);
        }
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn connect_options(&self) -> StorageResult<SqliteConnectOptions> {
        match &self.location {
            StorageLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StorageError::ConnectionFailed(e.to_string())),
            StorageLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StorageError::ConnectionFailed(format!(
                            "cannot create {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }

                Ok(SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal))
            }
        }
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Storage handle providing repository access.
///
/// Cloning is cheap: clones share the same pool.
#[derive(Debug, Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Opens the store and applies pending migrations.
    ///
    /// ## Returns
    /// * `Ok(Storage)` - Ready-to-use handle
    /// * `Err(StorageError)` - Connection or migration failed
    pub async fn new(config: StorageConfig) -> StorageResult<Self> {
        info!(location = ?config.location, "Opening storage");

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);

        if config.location == StorageLocation::Memory {
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Storage pool created");

        let storage = Storage { pool };

        if config.run_migrations {
            migrations::run_migrations(&storage.pool).await?;
        }

        Ok(storage)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn kv(&self) -> KeyValueRepository {
        KeyValueRepository::new(self.pool.clone())
    }

    /// Returns the cart snapshot repository.
    pub fn cart(&self) -> CartSnapshotRepository {
        CartSnapshotRepository::new(self.kv())
    }

    /// Returns the signed-in user repository.
    pub fn session_user(&self) -> SessionUserRepository {
        SessionUserRepository::new(self.kv())
    }

    /// Closes the pool. Every later operation fails with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing storage pool");
        self.pool.close().await;
    }

    /// Checks that the store can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_storage() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        assert!(storage.health_check().await);
    }

    #[tokio::test]
    async fn test_file_storage_creates_parent_dir() {
        let dir = std::env::temp_dir().join(format!(
            "market-storage-test-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let storage = Storage::new(StorageConfig::in_dir(dir.join("nested"))).await.unwrap();

        assert!(storage.health_check().await);
        assert!(dir.join("nested").join(DATABASE_FILE_NAME).exists());

        storage.close().await;
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_closed_storage_is_unhealthy() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        storage.close().await;
        assert!(!storage.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = StorageConfig::new("/tmp/market.db")
            .max_connections(2)
            .run_migrations(false);
        assert_eq!(config.max_connections, 2);
        assert!(!config.run_migrations);

        // in-memory stays pinned to one connection
        assert_eq!(StorageConfig::in_memory().max_connections(8).max_connections, 1);
    }
}
