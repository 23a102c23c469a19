//! # Domain Types
//!
//! Catalog and session types the cart is built from.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Market ─── sells ──► Product                                           │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────────┐                    │
//! │  │    Product      │ priced │   PricedProduct     │                    │
//! │  │  ─────────────  │ ─────► │  ─────────────────  │ ──► CartLine       │
//! │  │  id, market_id  │        │  product            │                    │
//! │  │  price, stock   │        │  final_price        │                    │
//! │  │  discount (%)   │        └─────────────────────┘                    │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │  SessionUser    │        │    UserRole     │                        │
//! │  │  ─────────────  │        │  ─────────────  │                        │
//! │  │  id, email      │        │  Customer       │                        │
//! │  │  role           │        │  Admin          │                        │
//! │  └─────────────────┘        └─────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Freezing
//! A `CartLine` stores the whole `PricedProduct` it was added with. Stock and
//! final price are read from that copy, never re-fetched from the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::validate_discount_percent;

// =============================================================================
// Market
// =============================================================================

/// A store the customer can shop from. A cart holds products of one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Market {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub address: String,
    pub neighborhood: String,
    pub city: String,

    /// Two-letter state code (e.g. "SP").
    pub state: String,

    /// Admin user who manages this market.
    pub admin_id: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Market {
    /// "Neighborhood, City - ST", as shown under the market name.
    pub fn location_label(&self) -> String {
        format!("{}, {} - {}", self.neighborhood, self.city, self.state)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product listed by one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Catalog identifier.
    pub id: String,

    /// Market that sells this product.
    pub market_id: String,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// List price before discount.
    pub price: Money,

    /// Units available. Upper bound for any cart line of this product.
    pub stock: i64,

    /// Discount percentage, 0-100.
    #[serde(default)]
    pub discount: u8,

    #[serde(default)]
    pub image_url: String,

    /// Top-level category (e.g. "Limpeza"). Empty means uncategorized.
    #[serde(default)]
    pub category: String,

    /// Optional second level (e.g. "Sujeira pesada").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Computes the discounted price and wraps the product for the cart.
    ///
    /// ## Errors
    /// `ValidationError::OutOfRange` when `discount` is above 100.
    pub fn priced(self) -> Result<PricedProduct, ValidationError> {
        validate_discount_percent(self.discount)?;
        let final_price = self.price.apply_discount_percent(self.discount);
        Ok(PricedProduct {
            product: self,
            final_price,
        })
    }
}

// =============================================================================
// Priced Product
// =============================================================================

/// A product together with its pre-computed final (discounted) price.
///
/// Serialized flat: `{ "id": ..., "price": ..., "finalPrice": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedProduct {
    #[serde(flatten)]
    pub product: Product,

    /// Price per unit after discount. Taken as given by the cart.
    pub final_price: Money,
}

impl PricedProduct {
    /// Wraps a product whose final price was computed elsewhere.
    pub fn new(product: Product, final_price: Money) -> Self {
        PricedProduct {
            product,
            final_price,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.product.id
    }

    #[inline]
    pub fn market_id(&self) -> &str {
        &self.product.market_id
    }

    #[inline]
    pub fn stock(&self) -> i64 {
        self.product.stock
    }

    #[inline]
    pub fn category(&self) -> &str {
        &self.product.category
    }
}

// =============================================================================
// Session User
// =============================================================================

/// Role of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

/// The authenticated user as seen by the cart.
///
/// Credentials never reach this type; the auth flow hands over a user it has
/// already verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl SessionUser {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    #[inline]
    pub fn is_customer(&self) -> bool {
        self.role == UserRole::Customer
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price_cents: i64, discount: u8) -> Product {
        Product {
            id: "p-1".to_string(),
            market_id: "m-1".to_string(),
            name: "Arroz 5kg".to_string(),
            description: String::new(),
            price: Money::from_cents(price_cents),
            stock: 10,
            discount,
            image_url: String::new(),
            category: "Mercearia".to_string(),
            subcategory: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_priced_applies_discount() {
        let priced = product(2000, 25).priced().unwrap();
        assert_eq!(priced.final_price.cents(), 1500);
        assert_eq!(priced.id(), "p-1");
        assert_eq!(priced.stock(), 10);
    }

    #[test]
    fn test_priced_rejects_discount_over_100() {
        assert!(product(2000, 101).priced().is_err());
    }

    #[test]
    fn test_priced_product_serializes_flat() {
        let priced = product(1000, 10).priced().unwrap();
        let json = serde_json::to_value(&priced).unwrap();

        assert_eq!(json["id"], "p-1");
        assert_eq!(json["marketId"], "m-1");
        assert_eq!(json["price"], 1000);
        assert_eq!(json["finalPrice"], 900);
        assert!(json.get("product").is_none());
    }

    #[test]
    fn test_market_location_label() {
        let market = Market {
            id: "m1".to_string(),
            name: "Mercado Central".to_string(),
            description: String::new(),
            address: "Rua A, 100".to_string(),
            neighborhood: "Centro".to_string(),
            city: "Campinas".to_string(),
            state: "SP".to_string(),
            admin_id: "u-admin".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(market.location_label(), "Centro, Campinas - SP");

        let json = serde_json::to_value(&market).unwrap();
        assert_eq!(json["adminId"], "u-admin");
    }

    #[test]
    fn test_user_roles() {
        let user = SessionUser {
            id: "u-1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: UserRole::Admin,
        };
        assert!(user.is_admin());
        assert!(!user.is_customer());

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "ADMIN");
    }
}
