//! # State Module
//!
//! Session state, one type per concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │ SharedCartStore  │  │    AuthState     │  │   SessionConfig      │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  Arc<Mutex<      │  │  Arc<RwLock<     │  │  storage paths       │  │
//! │  │    CartStore     │  │   Option<User>   │  │  currency display    │  │
//! │  │  >>              │  │  >>              │  │                      │  │
//! │  └────────┬─────────┘  └──────────────────┘  └──────────────────────┘  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  CartStore = Arc<Cart> + CartPanel + last_added + SnapshotWriter        │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartStore: exclusive access through the Mutex                       │
//! │  • AuthState: many readers, rare writers                               │
//! │  • SessionConfig: read-only after startup                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod cart;
mod config;
mod panel;
mod shared;

pub use auth::AuthState;
pub use cart::{CartStore, Hydration};
pub use config::{ConfigError, ConfigResult, DisplaySettings, SessionConfig, StorageSettings};
pub use panel::CartPanel;
pub use shared::SharedCartStore;
