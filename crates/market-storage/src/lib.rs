//! # market-storage: Durable Local Storage for Market Cart
//!
//! A small key-value store on SQLite. The session layer keeps the cart
//! snapshot and the signed-in user here so both survive an app restart.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Market Cart Data Flow                            │
//! │                                                                         │
//! │  CartStore mutation ──► SnapshotWriter (background task)               │
//! │                                │                                        │
//! │                                ▼                                        │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  market-storage (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Storage     │    │   Repositories     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ KeyValue           │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ CartSnapshot       │  │ 001_kv.sql │  │   │
//! │  │   │               │    │ SessionUser        │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                   <data dir>/market.db (or :memory:)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use market_storage::{Storage, StorageConfig};
//!
//! let storage = Storage::new(StorageConfig::new("./market.db")).await?;
//! let snapshot = storage.cart().load().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult};
pub use pool::{Storage, StorageConfig};

pub use repository::cart::{CartSnapshotRepository, CART_STORAGE_KEY};
pub use repository::kv::KeyValueRepository;
pub use repository::session::{SessionUserRepository, AUTH_USER_STORAGE_KEY};
