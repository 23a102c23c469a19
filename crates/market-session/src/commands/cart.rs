//! # Cart Commands
//!
//! Commands for cart manipulation, the cart panel and checkout.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────────┐   │
//! │  │  Market  │────►│ In Cart  │────►│  Panel   │────►│  Checkout    │   │
//! │  │ selected │     │          │     │  open    │     │  hand-off    │   │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────────┘   │
//! │       ▲                │                │                              │
//! │       │           add_to_cart       checkout                          │
//! │       │           update_item       (CollectEmail | CheckoutData)     │
//! │       │           remove_item                                          │
//! │       │                                 │                              │
//! │  select_market (other market) ◄── go_to_markets                        │
//! │  empties the cart                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use market_core::validation::validate_id;
use market_core::{
    AddedNotification, CartLine, CartSection, CartTotals, Market, PricedProduct,
};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::routing::{Route, Router};
use crate::state::{AuthState, CartStore, SharedCartStore};

/// Everything the cart UI renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub sections: Vec<CartSection>,
    pub totals: CartTotals,
    pub selected_market_id: Option<String>,
    pub panel_open: bool,
    pub last_added: Option<AddedNotification>,
}

impl From<&CartStore> for CartView {
    fn from(store: &CartStore) -> Self {
        CartView {
            items: store.items().to_vec(),
            sections: store.sections(),
            totals: CartTotals::from(store.cart()),
            selected_market_id: store.selected_market_id().map(str::to_string),
            panel_open: store.is_panel_open(),
            last_added: store.last_added().cloned(),
        }
    }
}

/// Where checkout sent the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub route: Route,
    pub path: &'static str,
    pub cart: CartView,
}

/// Gets the current cart contents.
pub fn get_cart(cart: &SharedCartStore) -> CartView {
    cart.with_store(|store| CartView::from(store))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Already in cart: quantity is summed
/// - New: appended with its price frozen
/// - Over stock: `STOCK_EXCEEDED`, cart unchanged
///
/// ## Arguments
/// * `product` - Product as shown on screen, with its final price
/// * `quantity` - Units to add (default: 1)
pub fn add_to_cart(
    cart: &SharedCartStore,
    product: &PricedProduct,
    quantity: Option<i64>,
) -> Result<CartView, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product.id(), quantity, "add_to_cart command");

    cart.with_store_mut(|s| {
        s.add_item(product, quantity)?;
        Ok::<_, ApiError>(CartView::from(&*s))
    })
}

/// Sets an item's quantity. Zero or less removes it.
pub fn update_cart_item(
    cart: &SharedCartStore,
    product_id: &str,
    quantity: i64,
) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, quantity, "update_cart_item command");

    cart.with_store_mut(|s| {
        s.set_quantity(product_id, quantity)?;
        Ok::<_, ApiError>(CartView::from(&*s))
    })
}

/// Removes an item. Unknown ids are ignored.
pub fn remove_from_cart(cart: &SharedCartStore, product_id: &str) -> CartView {
    debug!(product_id = %product_id, "remove_from_cart command");

    cart.with_store_mut(|s| {
        s.remove_item(product_id);
        CartView::from(&*s)
    })
}

/// Clears all items from the cart.
pub fn clear_cart(cart: &SharedCartStore) -> CartView {
    debug!("clear_cart command");

    cart.with_store_mut(|s| {
        s.clear();
        CartView::from(&*s)
    })
}

/// Selects the market the user is shopping in.
///
/// Choosing a different market than the current one empties the cart.
pub fn select_market(cart: &SharedCartStore, market: &Market) -> Result<CartView, ApiError> {
    debug!(market_id = %market.id, "select_market command");
    validate_id("market_id", &market.id).map_err(|e| ApiError::validation(e.to_string()))?;

    Ok(cart.with_store_mut(|s| {
        s.select_market(&market.id);
        CartView::from(&*s)
    }))
}

/// Opens the cart panel from a screen that can navigate.
pub fn open_cart(cart: &SharedCartStore, router: Option<Box<dyn Router>>) -> CartView {
    cart.with_store_mut(|s| {
        s.open_panel(router);
        CartView::from(&*s)
    })
}

pub fn close_cart(cart: &SharedCartStore) -> CartView {
    cart.with_store_mut(|s| {
        s.close_panel();
        CartView::from(&*s)
    })
}

/// "Keep shopping": back to the market list, panel closed.
pub fn go_to_markets(cart: &SharedCartStore) -> CartView {
    cart.with_store_mut(|s| {
        s.close_panel_and_go_to_markets();
        CartView::from(&*s)
    })
}

/// Starts checkout for whoever is signed in.
///
/// ## Errors
/// - `CART_EMPTY`, `MARKET_NOT_SELECTED`: panel stays open
/// - `NAVIGATION_UNAVAILABLE`: panel closed, reopen it and retry
pub fn checkout(cart: &SharedCartStore, auth: &AuthState) -> Result<CheckoutResponse, ApiError> {
    let user = auth.current_user();
    debug!(signed_in = user.is_some(), "checkout command");

    cart.with_store_mut(|s| {
        let route = s.request_checkout(user.as_ref())?;
        Ok::<_, ApiError>(CheckoutResponse {
            path: route.path(),
            route,
            cart: CartView::from(&*s),
        })
    })
}

/// Acknowledges the "added to cart" toast.
pub fn dismiss_toast(cart: &SharedCartStore) -> CartView {
    cart.with_store_mut(|s| {
        s.clear_notification();
        CartView::from(&*s)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::routing::testing::RecordingRouter;
    use chrono::Utc;
    use market_core::{Money, Product, SessionUser, UserRole};

    fn market(id: &str) -> Market {
        Market {
            id: id.to_string(),
            name: format!("Mercado {}", id),
            description: String::new(),
            address: "Rua B, 20".to_string(),
            neighborhood: "Centro".to_string(),
            city: "Santos".to_string(),
            state: "SP".to_string(),
            admin_id: "admin".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn product(id: &str, category: &str, price_cents: i64, discount: u8, stock: i64) -> PricedProduct {
        Product {
            id: id.to_string(),
            market_id: "m1".to_string(),
            name: id.to_string(),
            description: String::new(),
            price: Money::from_cents(price_cents),
            stock,
            discount,
            image_url: String::new(),
            category: category.to_string(),
            subcategory: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
        .priced()
        .unwrap()
    }

    fn shared() -> SharedCartStore {
        SharedCartStore::new(CartStore::ephemeral())
    }

    #[test]
    fn test_add_defaults_to_one_and_totals() {
        let cart = shared();
        select_market(&cart, &market("m1")).unwrap();

        add_to_cart(&cart, &product("leite", "Laticínios", 500, 10, 9), None).unwrap();
        let view = add_to_cart(&cart, &product("pão", "Padaria", 100, 0, 9), Some(3)).unwrap();

        assert_eq!(view.totals.line_count, 2);
        assert_eq!(view.totals.total_quantity, 4);
        assert_eq!(view.totals.total_amount.cents(), 450 + 300);
        assert_eq!(view.last_added.as_ref().unwrap().quantity_added, 3);
        assert_eq!(view.sections[0].title, "Laticínios");
    }

    #[test]
    fn test_get_cart_reads_current_store() {
        let cart = shared();
        assert!(get_cart(&cart).items.is_empty());

        cart.with_store_mut(|s| {
            s.select_market("m1");
            s.add_item(&product("arroz", "Mercearia", 2500, 0, 5), 2)
        })
        .unwrap();

        let view = get_cart(&cart);
        assert_eq!(view.selected_market_id.as_deref(), Some("m1"));
        assert_eq!(view.totals.total_quantity, 2);
        assert_eq!(view.totals.total_amount.cents(), 5000);
        assert!(!view.panel_open);
    }

    #[test]
    fn test_stock_error_code() {
        let cart = shared();
        let p = product("café", "Mercearia", 1500, 0, 2);

        let err = add_to_cart(&cart, &p, Some(3)).unwrap_err();
        assert_eq!(err.code, ErrorCode::StockExceeded);
        assert!(get_cart(&cart).items.is_empty());

        add_to_cart(&cart, &p, Some(2)).unwrap();
        let err = update_cart_item(&cart, "café", 3).unwrap_err();
        assert_eq!(err.code, ErrorCode::StockExceeded);
    }

    #[test]
    fn test_update_to_zero_removes() {
        let cart = shared();
        add_to_cart(&cart, &product("a", "", 100, 0, 5), Some(2)).unwrap();

        let view = update_cart_item(&cart, "a", 0).unwrap();
        assert!(view.items.is_empty());

        // unknown ids are ignored
        assert!(remove_from_cart(&cart, "a").items.is_empty());
        assert!(update_cart_item(&cart, "zzz", 4).unwrap().items.is_empty());
    }

    #[test]
    fn test_select_market_rejects_blank_id() {
        let cart = shared();
        let err = select_market(&cart, &market(" ")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_switching_market_empties_cart() {
        let cart = shared();
        select_market(&cart, &market("m1")).unwrap();
        add_to_cart(&cart, &product("b", "", 100, 0, 2), Some(2)).unwrap();

        let view = select_market(&cart, &market("m2")).unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view.selected_market_id.as_deref(), Some("m2"));
    }

    #[tokio::test]
    async fn test_checkout_paths() {
        let cart = shared();
        let auth = AuthState::ephemeral();
        select_market(&cart, &market("m1")).unwrap();
        add_to_cart(&cart, &product("a", "", 100, 0, 5), None).unwrap();

        let router = RecordingRouter::default();
        open_cart(&cart, Some(router.boxed()));
        let response = checkout(&cart, &auth).unwrap();
        assert_eq!(response.route, Route::CollectEmail);
        assert_eq!(response.path, "checkout/email");
        assert!(!response.cart.panel_open);

        auth.sign_in(SessionUser {
            id: "u1".to_string(),
            name: "Rita".to_string(),
            email: "x@y.com".to_string(),
            role: UserRole::Customer,
        })
        .await
        .unwrap();

        open_cart(&cart, Some(router.boxed()));
        let response = checkout(&cart, &auth).unwrap();
        assert_eq!(
            response.route,
            Route::CheckoutData {
                email: "x@y.com".to_string()
            }
        );
        assert_eq!(router.routes().len(), 2);
    }

    #[test]
    fn test_checkout_without_router() {
        let cart = shared();
        select_market(&cart, &market("m1")).unwrap();
        add_to_cart(&cart, &product("a", "", 100, 0, 5), None).unwrap();
        open_cart(&cart, None);

        let err = checkout(&cart, &AuthState::ephemeral()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NavigationUnavailable);
        assert!(!get_cart(&cart).panel_open);
    }

    #[test]
    fn test_checkout_guards_keep_panel_open() {
        let cart = shared();
        open_cart(&cart, Some(RecordingRouter::default().boxed()));

        let err = checkout(&cart, &AuthState::ephemeral()).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartEmpty);
        assert!(get_cart(&cart).panel_open);
    }

    #[test]
    fn test_toast_and_panel_commands() {
        let cart = shared();
        add_to_cart(&cart, &product("a", "", 100, 0, 5), None).unwrap();
        assert!(dismiss_toast(&cart).last_added.is_none());

        let router = RecordingRouter::default();
        assert!(open_cart(&cart, Some(router.boxed())).panel_open);
        assert!(!go_to_markets(&cart).panel_open);
        assert_eq!(router.routes(), vec![Route::Markets]);

        open_cart(&cart, None);
        assert!(!close_cart(&cart).panel_open);
        assert!(clear_cart(&cart).items.is_empty());
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let cart = shared();
        select_market(&cart, &market("m1")).unwrap();
        add_to_cart(&cart, &product("a", "", 100, 0, 5), None).unwrap();

        let json = serde_json::to_value(get_cart(&cart)).unwrap();
        assert_eq!(json["selectedMarketId"], "m1");
        assert_eq!(json["totals"]["totalQuantity"], 1);
        assert_eq!(json["lastAdded"]["quantityAdded"], 1);
        assert_eq!(json["panelOpen"], false);
    }
}
