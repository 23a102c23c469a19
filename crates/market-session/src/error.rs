//! # API Error Type
//!
//! Unified error type for session commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Market Cart                            │
//! │                                                                         │
//! │  Screen                      Rust Session                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  add_to_cart(product, 3)                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function → Result<T, ApiError>                          │  │
//! │  │         │                                                        │  │
//! │  │         ├── CoreError::StockExceeded ───► STOCK_EXCEEDED         │  │
//! │  │         ├── CoreError::Validation ──────► VALIDATION_ERROR       │  │
//! │  │         ├── CoreError::NavigationUnavailable ► NAVIGATION_...    │  │
//! │  │         └── StorageError (startup only) ► STORAGE_ERROR          │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "STOCK_EXCEEDED",                                            │
//! │    "message": "Requested quantity 6 exceeds available stock (5) ..." } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use market_core::CoreError;
use market_storage::StorageError;
use serde::Serialize;

/// Error returned from session commands.
///
/// ```json
/// { "code": "STOCK_EXCEEDED", "message": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Quantity above available stock. The cart is unchanged.
    StockExceeded,

    /// Checkout without a navigation context. Reopen the cart and retry.
    NavigationUnavailable,

    /// Input validation failed
    ValidationError,

    /// Checkout on an empty cart
    CartEmpty,

    /// Checkout before choosing a market
    MarketNotSelected,

    /// Durable storage could not be opened
    StorageError,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts cart errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let code = match err {
            CoreError::StockExceeded { .. } => ErrorCode::StockExceeded,
            CoreError::NavigationUnavailable => ErrorCode::NavigationUnavailable,
            CoreError::EmptyCart => ErrorCode::CartEmpty,
            CoreError::NoMarketSelected => ErrorCode::MarketNotSelected,
            CoreError::Validation(e) => return ApiError::validation(e.to_string()),
        };
        ApiError::new(code, message)
    }
}

/// Converts storage errors to API errors.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Local storage is unavailable")
            }
            StorageError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Local storage could not be upgraded")
            }
            StorageError::QueryFailed(e) | StorageError::Internal(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Storage operation failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Storage operation failed")
            }
            StorageError::Serialization(e) => {
                tracing::error!("Serialization failed: {}", e);
                ApiError::internal("Could not encode data for storage")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::ValidationError;

    #[test]
    fn test_stock_exceeded_maps_code() {
        let err: ApiError = CoreError::stock_exceeded("p1", 5, 6).into();
        assert_eq!(err.code, ErrorCode::StockExceeded);
        assert!(err.message.contains("exceeds available stock (5)"));
    }

    #[test]
    fn test_validation_message_unwrapped() {
        let err: ApiError = CoreError::from(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "quantity must be positive");
    }

    #[test]
    fn test_serialized_shape() {
        let err: ApiError = CoreError::NavigationUnavailable.into();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NAVIGATION_UNAVAILABLE");

        let err: ApiError = CoreError::EmptyCart.into();
        assert_eq!(serde_json::to_value(&err).unwrap()["code"], "CART_EMPTY");
    }

    #[test]
    fn test_storage_error_hides_details() {
        let err: ApiError = StorageError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("disk"));
    }
}
