//! # market-session: Cart/Session Store for Market Cart
//!
//! Owns the cart of a running app session: applies cart rules from
//! `market-core`, persists through `market-storage`, and decides where
//! checkout goes.
//!
//! ## Module Organization
//! ```text
//! market_session/
//! ├── lib.rs          ◄─── You are here (startup, tracing)
//! ├── state/
//! │   ├── cart.rs     ◄─── CartStore: the authoritative cart
//! │   ├── panel.rs    ◄─── Cart panel state machine
//! │   ├── shared.rs   ◄─── Arc<Mutex<CartStore>> handle
//! │   ├── auth.rs     ◄─── Signed-in user
//! │   └── config.rs   ◄─── SessionConfig (env + TOML + defaults)
//! ├── commands/
//! │   ├── cart.rs     ◄─── add_to_cart, select_market, checkout, ...
//! │   ├── auth.rs     ◄─── sign_in, sign_out
//! │   └── config.rs   ◄─── get_config, format_amount
//! ├── persist.rs      ◄─── Background snapshot writer
//! ├── routing.rs      ◄─── Route + Router
//! └── error.rs        ◄─── ApiError for commands
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use market_session::{commands, init_tracing, Session, SessionConfig};
//!
//! init_tracing();
//! let session = Session::start(SessionConfig::load_or_default(None)).await?;
//!
//! commands::cart::select_market(&session.cart, &market)?;
//! commands::cart::add_to_cart(&session.cart, &product, Some(2))?;
//! ```

pub mod commands;
pub mod error;
pub mod persist;
pub mod routing;
pub mod state;

use market_storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ErrorCode};
pub use routing::{Route, Router};
pub use state::{AuthState, CartStore, Hydration, SessionConfig, SharedCartStore};

/// A running session: storage plus the state commands operate on.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: SessionConfig,
    pub storage: Storage,
    pub cart: SharedCartStore,
    pub auth: AuthState,
}

impl Session {
    /// Opens storage and restores the previous session.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │  1. Resolve storage location (config → env → platform data dir)        │
    /// │  2. Open SQLite, run migrations                                        │
    /// │  3. Create CartStore (spawns the snapshot writer)                      │
    /// │  4. Hydrate the cart, restore the signed-in user                       │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// Must run inside a tokio runtime.
    pub async fn start(config: SessionConfig) -> Result<Self, ApiError> {
        let storage_config = config
            .storage_config()
            .map_err(|e| ApiError::new(ErrorCode::StorageError, e.to_string()))?;

        let storage = Storage::new(storage_config).await?;
        let cart = SharedCartStore::new(CartStore::new(storage.cart()));
        let auth = AuthState::new(storage.session_user());

        let hydration = cart.hydrate().await;
        let user_restored = auth.restore().await;
        info!(?hydration, user_restored, "Session ready");

        Ok(Session {
            config,
            storage,
            cart,
            auth,
        })
    }

    /// Writes pending snapshots and closes storage.
    pub async fn shutdown(&self) {
        self.cart.flush().await;
        self.storage.close().await;
        info!("Session closed");
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=market_session=trace` - Trace this crate only
/// - Default: `info,market=debug,sqlx=warn`
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,market=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use market_core::{Market, Money, Product};

    fn market(id: &str) -> Market {
        Market {
            id: id.to_string(),
            name: "Mercado".to_string(),
            description: String::new(),
            address: "Av. C, 5".to_string(),
            neighborhood: "Boqueirão".to_string(),
            city: "Santos".to_string(),
            state: "SP".to_string(),
            admin_id: "admin".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_session_restart_restores_cart() {
        init_tracing();
        let dir = std::env::temp_dir().join(format!(
            "market-session-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let mut config = SessionConfig::default();
        config.storage.data_dir = Some(dir.clone());
        config.storage.database_path = None;

        let product = Product {
            id: "feijão".to_string(),
            market_id: "m1".to_string(),
            name: "Feijão 1kg".to_string(),
            description: String::new(),
            price: Money::from_cents(899),
            stock: 10,
            discount: 0,
            image_url: String::new(),
            category: "Mercearia".to_string(),
            subcategory: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
        .priced()
        .unwrap();

        let session = Session::start(config.clone()).await.unwrap();
        commands::cart::select_market(&session.cart, &market("m1")).unwrap();
        commands::cart::add_to_cart(&session.cart, &product, Some(4)).unwrap();
        session.shutdown().await;

        let session = Session::start(config).await.unwrap();
        let view = commands::cart::get_cart(&session.cart);
        assert_eq!(view.selected_market_id.as_deref(), Some("m1"));
        assert_eq!(view.totals.total_quantity, 4);
        assert_eq!(view.totals.total_amount.cents(), 3596);
        session.shutdown().await;

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_in_memory_session() {
        let session = Session::start(SessionConfig::in_memory()).await.unwrap();
        assert!(session.cart.with_store(|s| s.is_hydrated()));
        assert!(!session.auth.is_authenticated());
    }
}
