//! # market-core: Pure Cart Logic for the Market App
//!
//! The shopping cart of a multi-market grocery app, as plain data and pure
//! functions. Persistence, logging and navigation live in the crates above.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Market App Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Screens (market list, product, checkout)     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    market-session                               │   │
//! │  │    CartStore, AuthState, panel + routing, snapshot writer       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ market-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  quantity │  │   │
//! │  │   │  Session  │  │ discounts │  │ CartLine  │  │   email   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO LOGGING                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    market-storage                               │   │
//! │  │              SQLite key-value store for snapshots               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - Cart lines, stock rules, market scoping, snapshots
//! - [`types`] - Product, PricedProduct, SessionUser
//! - [`money`] - Integer centavo amounts
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use market_core::{Cart, Money, PricedProduct, Product};
//!
//! let product = Product {
//!     id: "arroz".to_string(),
//!     market_id: "m1".to_string(),
//!     name: "Arroz 5kg".to_string(),
//!     description: String::new(),
//!     price: Money::from_cents(2500),
//!     stock: 5,
//!     discount: 10,
//!     image_url: String::new(),
//!     category: "Mercearia".to_string(),
//!     subcategory: None,
//!     created_at: Utc::now(),
//!     updated_at: Utc::now(),
//! };
//! let priced: PricedProduct = product.priced().unwrap();
//!
//! let mut cart = Cart::new();
//! cart.select_market("m1");
//! cart.add_item(&priced, 2).unwrap();
//!
//! assert_eq!(cart.total_amount().cents(), 4500);
//! assert!(cart.add_item(&priced, 4).is_err()); // 2 + 4 > 5
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{
    AddedNotification, Cart, CartLine, CartSection, CartSnapshot, CartTotals, QuantityChange,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
