//! # Validation Module
//!
//! Input validation for cart and session operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI (TypeScript)                                              │
//! │  ├── Quantity steppers never go below 1                                │
//! │  └── Email field format hints                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Shape checks: positive quantity, discount range, email format     │
//! │  └── Runs before any cart state is touched                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart rules (cart.rs)                                         │
//! │  └── Stock ceilings, market scoping                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use market_core::validation::{validate_email, validate_quantity};
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_email("x@y.com").is_ok());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest identifier accepted for products and markets.
const MAX_ID_LEN: usize = 64;

/// Longest email accepted (RFC 5321 path limit).
const MAX_EMAIL_LEN: usize = 254;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity being added to the cart.
///
/// ## Rules
/// - Must be at least 1
///
/// Stock is checked separately by the cart, since it depends on what the
/// cart already holds.
///
/// ```rust
/// use market_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-3).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - 0 to 100 inclusive
pub fn validate_discount_percent(percent: u8) -> ValidationResult<()> {
    if percent > 100 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a product or market identifier.
///
/// ## Rules
/// - Not empty after trimming
/// - At most 64 characters
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Email Validator
// =============================================================================

/// Validates an email address used for checkout.
///
/// ## Rules
/// - Not empty after trimming
/// - No whitespace
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot with text on both sides
///
/// ## Returns
/// The trimmed, lowercased address.
///
/// ```rust
/// use market_core::validation::validate_email;
///
/// assert_eq!(validate_email("  Ana@Example.com ").unwrap(), "ana@example.com");
/// assert!(validate_email("ana@example").is_err());
/// assert!(validate_email("ana example@x.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain @"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must have exactly one @ after a name"));
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => {}
        _ => return Err(invalid("domain must look like example.com")),
    }

    Ok(email.to_lowercase())
}

// =============================================================================
// Unit Tests
// =============================================================================
