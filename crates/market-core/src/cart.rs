//! # Cart Model
//!
//! The pure shopping-cart model: line items, market scoping, stock rules and
//! derived totals. Nothing here persists, logs, or navigates; the session
//! store in `market-session` wraps this type and adds those effects.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation            Rule                          Effect on lines     │
//! │  ─────────            ────                          ───────────────     │
//! │                                                                         │
//! │  add_item(p, q)       q ≥ 1, existing + q ≤ stock   push or sum         │
//! │                                                                         │
//! │  set_quantity(id, q)  q ≤ 0 → remove                replace quantity    │
//! │                       q ≤ stock                                         │
//! │                                                                         │
//! │  remove_item(id)      absent is a no-op             retain others       │
//! │                                                                         │
//! │  clear()              -                             empty               │
//! │                                                                         │
//! │  select_market(m)     different non-null market     empty, then select  │
//! │                       already selected                                  │
//! │                                                                         │
//! │  Every failing call returns before touching `items`.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id, in first-added order
//! - `1 ≤ quantity ≤ product.stock` for every line
//! - All lines were added while the current market was selected

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::PricedProduct;
use crate::validation::validate_quantity;

/// Section title for products with no category.
pub const UNCATEGORIZED_SECTION: &str = "Other";

// =============================================================================
// Cart Line
// =============================================================================

/// One product-quantity pairing in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Product as it was when first added (price frozen).
    pub product: PricedProduct,

    /// Units in the cart. Always between 1 and `product.stock`.
    pub quantity: i64,
}

impl CartLine {
    /// `final_price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product.final_price.multiply_quantity(self.quantity)
    }

    fn is_valid(&self) -> bool {
        self.quantity >= 1
            && self.quantity <= self.product.stock()
            && self
                .product
                .final_price
                .checked_multiply_quantity(self.quantity)
                .is_some()
    }
}

// =============================================================================
// Notification & Outcomes
// =============================================================================

/// What was just added, for the "added to cart" toast.
///
/// `quantity_added` is the amount of this call, not the new line total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AddedNotification {
    pub product: PricedProduct,
    pub quantity_added: i64,
}

/// Result of `set_quantity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now holds the requested quantity.
    Updated,
    /// The requested quantity was ≤ 0 and the line was removed (or absent).
    Removed,
    /// No line for that product; nothing changed.
    NotInCart,
}

// =============================================================================
// Snapshot
// =============================================================================

/// The durable form of a cart: `{ "items": [...], "selectedMarketId": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSnapshot {
    #[serde(default)]
    pub items: Vec<CartLine>,

    #[serde(default)]
    pub selected_market_id: Option<String>,
}

impl CartSnapshot {
    /// Serializes to the JSON record kept in durable storage.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses a stored record.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

// =============================================================================
// Totals & Sections
// =============================================================================

/// Cart totals summary for UI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Distinct products.
    pub line_count: usize,
    /// Σ quantity.
    pub total_quantity: i64,
    /// Σ quantity × final price.
    pub total_amount: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_quantity: cart.total_item_count(),
            total_amount: cart.total_amount(),
        }
    }
}

/// Lines of one category, as the cart panel lists them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSection {
    pub title: String,
    pub lines: Vec<CartLine>,
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: ordered lines scoped to one market.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLine>,
    selected_market_id: Option<String>,
}

impl Cart {
    /// Creates an empty cart with no market selected.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Rebuilds a cart from a stored snapshot.
    ///
    /// Lines that break the cart invariants (quantity outside `1..=stock`,
    /// or a repeated product id) are dropped. A snapshot written by this
    /// crate never contains such lines.
    pub fn from_snapshot(snapshot: CartSnapshot) -> Self {
        let mut items: Vec<CartLine> = Vec::with_capacity(snapshot.items.len());
        let mut amount = Money::zero();
        let mut units: i64 = 0;
        for line in snapshot.items {
            if !line.is_valid() || items.iter().any(|l| l.product.id() == line.product.id()) {
                continue;
            }

            // totals of the kept lines must stay representable
            let next_amount = amount.checked_add(line.line_total());
            let next_units = units.checked_add(line.quantity);
            if let (Some(next_amount), Some(next_units)) = (next_amount, next_units) {
                amount = next_amount;
                units = next_units;
                items.push(line);
            }
        }

        Cart {
            items,
            selected_market_id: snapshot.selected_market_id,
        }
    }

    /// Captures the durable form of this cart.
    pub fn to_snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            selected_market_id: self.selected_market_id.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Lines in first-added order.
    #[inline]
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    #[inline]
    pub fn selected_market_id(&self) -> Option<&str> {
        self.selected_market_id.as_deref()
    }

    /// The line for a product, if present.
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.items.iter().find(|l| l.product.id() == product_id)
    }

    /// Units of a product in the cart (0 if absent).
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.line(product_id).map_or(0, |l| l.quantity)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Σ quantity × final price.
    pub fn total_amount(&self) -> Money {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Σ quantity.
    pub fn total_item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Lines grouped by category, sections sorted by title ignoring case
    /// and accents ("Água" sorts with "agua", before "Bebidas").
    ///
    /// Within a section, lines keep their cart order.
    pub fn sections(&self) -> Vec<CartSection> {
        let mut by_category: BTreeMap<&str, Vec<CartLine>> = BTreeMap::new();
        for line in &self.items {
            let title = match line.product.category().trim() {
                "" => UNCATEGORIZED_SECTION,
                category => category,
            };
            by_category.entry(title).or_default().push(line.clone());
        }

        let mut sections: Vec<CartSection> = by_category
            .into_iter()
            .map(|(title, lines)| CartSection {
                title: title.to_string(),
                lines,
            })
            .collect();
        sections.sort_by_cached_key(|s| (collation_key(&s.title), s.title.clone()));
        sections
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds `quantity` units of a product, merging with an existing line.
    ///
    /// ## Errors
    /// - `Validation` when `quantity < 1`
    /// - `StockExceeded` when `quantity > stock`, or when the existing line
    ///   plus `quantity` would exceed `stock`
    ///
    /// ## Returns
    /// The notification record for the toast (quantity of this call).
    pub fn add_item(
        &mut self,
        product: &PricedProduct,
        quantity: i64,
    ) -> CoreResult<AddedNotification> {
        validate_quantity(quantity)?;

        let stock = product.stock();
        if quantity > stock {
            return Err(CoreError::stock_exceeded(product.id(), stock, quantity));
        }

        match self.items.iter_mut().find(|l| l.product.id() == product.id()) {
            Some(line) => {
                let combined = line.quantity.saturating_add(quantity);
                if combined > stock || line.quantity.checked_add(quantity).is_none() {
                    return Err(CoreError::stock_exceeded(product.id(), stock, combined));
                }
                line.quantity = combined;
            }
            None => self.items.push(CartLine {
                product: product.clone(),
                quantity,
            }),
        }

        Ok(AddedNotification {
            product: product.clone(),
            quantity_added: quantity,
        })
    }

    /// Removes a product's line. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|l| l.product.id() != product_id);
        self.items.len() != before
    }

    /// Replaces a line's quantity.
    ///
    /// - `quantity ≤ 0` removes the line (same as `remove_item`)
    /// - Missing line: no-op
    /// - `quantity > stock`: `StockExceeded`, line unchanged
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<QuantityChange> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(QuantityChange::Removed);
        }

        let Some(line) = self.items.iter_mut().find(|l| l.product.id() == product_id) else {
            return Ok(QuantityChange::NotInCart);
        };

        let stock = line.product.stock();
        if quantity > stock {
            return Err(CoreError::stock_exceeded(product_id, stock, quantity));
        }

        line.quantity = quantity;
        Ok(QuantityChange::Updated)
    }

    /// Empties the cart. The market selection is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Selects a market, clearing the lines if a different market was
    /// already selected.
    ///
    /// ## Returns
    /// `true` when lines were cleared because the market changed.
    pub fn select_market(&mut self, market_id: &str) -> bool {
        let switched = self
            .selected_market_id
            .as_deref()
            .is_some_and(|current| current != market_id);

        if switched {
            self.clear();
        }
        self.selected_market_id = Some(market_id.to_string());
        switched
    }
}

/// Sort key for section titles: lowercase with Latin accents removed.
fn collation_key(title: &str) -> String {
    title
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            'ý' | 'ÿ' => 'y',
            other => other,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
