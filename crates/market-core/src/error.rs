//! # Error Types
//!
//! Domain-specific error types for market-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  market-core errors (this file)                                        │
//! │  ├── CoreError        - Cart rule violations                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  market-storage errors (separate crate)                                │
//! │  └── StorageError     - Durable storage failures (logged, swallowed)   │
//! │                                                                         │
//! │  market-session errors                                                 │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` leaves the cart exactly as it was before the call.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Requested (or combined) quantity is above the product's stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart has 3 × Arroz 5kg (stock: 5)
    ///      │
    ///      ▼
    /// add_item(Arroz, 3)  →  3 + 3 = 6 > 5
    ///      │
    ///      ▼
    /// StockExceeded { available: 5, requested: 6 }
    ///      │
    ///      ▼
    /// UI shows the message, cart still holds 3
    /// ```
    #[error("Requested quantity {requested} exceeds available stock ({available}) for product {product_id}")]
    StockExceeded {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Checkout was requested but the cart panel was opened without a
    /// navigation context.
    #[error("Navigation is unavailable: reopen the cart from a screen to check out")]
    NavigationUnavailable,

    /// Checkout was requested with no lines in the cart.
    #[error("Cart is empty: add products before checking out")]
    EmptyCart,

    /// Checkout was requested before any market was selected.
    #[error("Select a market before checking out")]
    NoMarketSelected,

    /// Input validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a StockExceeded error.
    pub fn stock_exceeded(product_id: impl Into<String>, available: i64, requested: i64) -> Self {
        CoreError::StockExceeded {
            product_id: product_id.into(),
            available,
            requested,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
