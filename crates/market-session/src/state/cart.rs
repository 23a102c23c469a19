//! # Cart Store
//!
//! The single authoritative cart of a session: the pure `Cart` plus the
//! panel, the "added to cart" notification and durable persistence.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Screen Action          Store Call                Side Effects          │
//! │  ─────────────          ──────────                ────────────          │
//! │                                                                         │
//! │  "Add" on product ────► add_item(p, q) ─────────► last_added, persist  │
//! │                                                                         │
//! │  Stepper +/- ─────────► set_quantity(id, q) ────► persist              │
//! │                                                                         │
//! │  Trash icon ──────────► remove_item(id) ────────► persist              │
//! │                                                                         │
//! │  Pick a market ───────► select_market(m) ───────► maybe clear, persist │
//! │                                                                         │
//! │  Cart icon ───────────► open_panel(router) ─────► capture router       │
//! │                                                                         │
//! │  "Checkout" ──────────► request_checkout(user) ─► navigate, close      │
//! │                                                                         │
//! │  NOTE: persist = enqueue the snapshot on the background writer, only   │
//! │        after hydrate() has run. Mutations never wait on storage.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshots
//! Readers get an `Arc<Cart>`. A mutation copies the cart first if a reader
//! still holds the previous `Arc`, so a snapshot never changes under its
//! holder.

use std::sync::Arc;

use market_core::{
    AddedNotification, Cart, CartLine, CartSection, CartSnapshot, CoreError, CoreResult, Money,
    PricedProduct, QuantityChange, SessionUser,
};
use market_storage::{CartSnapshotRepository, StorageResult};
use tracing::{debug, info, warn};

use crate::persist::SnapshotWriter;
use crate::routing::{Route, Router};
use crate::state::panel::CartPanel;

/// Result of `hydrate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// A stored snapshot replaced the in-memory cart.
    Restored,
    /// Nothing usable was stored; the current cart was persisted instead.
    Empty,
    /// Storage could not be read; the in-memory cart was kept as is.
    Unavailable,
    /// `hydrate` had already run.
    AlreadyHydrated,
}

/// The cart/session store.
#[derive(Debug)]
pub struct CartStore {
    cart: Arc<Cart>,
    panel: CartPanel,
    last_added: Option<AddedNotification>,
    hydrated: bool,
    repo: Option<CartSnapshotRepository>,
    writer: SnapshotWriter,
}

impl CartStore {
    /// Creates an empty store backed by durable storage.
    ///
    /// Spawns the snapshot writer, so this must run inside a tokio runtime.
    /// Call `hydrate` before relying on persistence.
    pub fn new(repo: CartSnapshotRepository) -> Self {
        let writer = SnapshotWriter::spawn(repo.clone());
        CartStore {
            cart: Arc::new(Cart::new()),
            panel: CartPanel::default(),
            last_added: None,
            hydrated: false,
            repo: Some(repo),
            writer,
        }
    }

    /// Creates an empty store that never persists.
    pub fn ephemeral() -> Self {
        CartStore {
            cart: Arc::new(Cart::new()),
            panel: CartPanel::default(),
            last_added: None,
            hydrated: true,
            repo: None,
            writer: SnapshotWriter::disconnected(),
        }
    }

    // =========================================================================
    // Hydration & Persistence
    // =========================================================================

    /// Loads the stored snapshot. Runs once; later calls are no-ops.
    ///
    /// ## Behavior
    /// - Stored snapshot: replaces whatever was mutated in memory so far
    /// - Nothing stored (or malformed): keeps memory, persists it
    /// - Read failure: keeps memory, logs, enables persistence
    pub async fn hydrate(&mut self) -> Hydration {
        if self.hydrated {
            return Hydration::AlreadyHydrated;
        }

        let loaded = match &self.repo {
            Some(repo) => repo.load().await,
            None => Ok(None),
        };

        self.apply_hydration(loaded)
    }

    /// Applies a load result obtained outside the store.
    pub fn apply_hydration(&mut self, loaded: StorageResult<Option<CartSnapshot>>) -> Hydration {
        if self.hydrated {
            return Hydration::AlreadyHydrated;
        }
        self.hydrated = true;

        match loaded {
            Ok(Some(snapshot)) => {
                self.cart = Arc::new(Cart::from_snapshot(snapshot));
                info!(
                    lines = self.cart.line_count(),
                    market_id = ?self.cart.selected_market_id(),
                    "Cart restored from storage"
                );
                Hydration::Restored
            }
            Ok(None) => {
                debug!("No stored cart, persisting current state");
                self.persist();
                Hydration::Empty
            }
            Err(e) => {
                warn!(error = %e, "Failed to load cart snapshot, keeping in-memory cart");
                Hydration::Unavailable
            }
        }
    }

    #[inline]
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Repository used by `hydrate`, for callers that load outside a lock.
    pub fn snapshot_repository(&self) -> Option<CartSnapshotRepository> {
        self.repo.clone()
    }

    /// Handle to the snapshot writer, for callers that flush outside a lock.
    pub fn writer(&self) -> SnapshotWriter {
        self.writer.clone()
    }

    /// Waits for queued snapshot writes.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    fn persist(&self) {
        if self.hydrated {
            self.writer.enqueue(&self.cart.to_snapshot());
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// An immutable snapshot of the cart.
    pub fn snapshot(&self) -> Arc<Cart> {
        Arc::clone(&self.cart)
    }

    #[inline]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn items(&self) -> &[CartLine] {
        self.cart.items()
    }

    pub fn selected_market_id(&self) -> Option<&str> {
        self.cart.selected_market_id()
    }

    pub fn total_amount(&self) -> Money {
        self.cart.total_amount()
    }

    pub fn total_item_count(&self) -> i64 {
        self.cart.total_item_count()
    }

    pub fn sections(&self) -> Vec<CartSection> {
        self.cart.sections()
    }

    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.cart.quantity_of(product_id)
    }

    /// The pending "added to cart" notification.
    pub fn last_added(&self) -> Option<&AddedNotification> {
        self.last_added.as_ref()
    }

    #[inline]
    pub fn is_panel_open(&self) -> bool {
        self.panel.is_open()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds units of a product and records the notification.
    pub fn add_item(&mut self, product: &PricedProduct, quantity: i64) -> CoreResult<()> {
        debug!(product_id = %product.id(), quantity, "add_item");

        let added = Arc::make_mut(&mut self.cart)
            .add_item(product, quantity)
            .inspect_err(|e| debug!(error = %e, "add_item rejected"))?;

        self.last_added = Some(added);
        self.persist();
        Ok(())
    }

    /// Removes a product's line. Absent is a no-op.
    pub fn remove_item(&mut self, product_id: &str) {
        if self.cart.line(product_id).is_none() {
            return;
        }

        debug!(product_id = %product_id, "remove_item");
        Arc::make_mut(&mut self.cart).remove_item(product_id);
        self.persist();
    }

    /// Replaces a line's quantity; `≤ 0` removes the line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if self.cart.line(product_id).is_none() {
            return Ok(());
        }

        debug!(product_id = %product_id, quantity, "set_quantity");
        let change = Arc::make_mut(&mut self.cart).set_quantity(product_id, quantity)?;
        if change != QuantityChange::NotInCart {
            self.persist();
        }
        Ok(())
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        if self.cart.is_empty() {
            return;
        }

        debug!("clear");
        Arc::make_mut(&mut self.cart).clear();
        self.persist();
    }

    /// Selects a market; switching markets empties the cart.
    pub fn select_market(&mut self, market_id: &str) {
        if self.cart.selected_market_id() == Some(market_id) {
            return;
        }

        let cleared = Arc::make_mut(&mut self.cart).select_market(market_id);
        if cleared {
            info!(market_id = %market_id, "Market changed, cart cleared");
        } else {
            debug!(market_id = %market_id, "select_market");
        }
        self.persist();
    }

    /// Acknowledges the "added to cart" notification.
    pub fn clear_notification(&mut self) {
        self.last_added = None;
    }

    // =========================================================================
    // Panel & Checkout
    // =========================================================================

    /// Opens the cart panel, capturing the navigation context (if any).
    pub fn open_panel(&mut self, router: Option<Box<dyn Router>>) {
        debug!(has_router = router.is_some(), "open_panel");
        self.panel.open(router);
    }

    pub fn close_panel(&mut self) {
        self.panel.close();
    }

    /// Sends the user back to the market list and closes the panel.
    pub fn close_panel_and_go_to_markets(&mut self) {
        if !self.panel.navigate_and_close(Route::Markets) {
            debug!("go_to_markets without router, panel closed only");
        }
    }

    /// Routes to checkout based on who is signed in.
    ///
    /// ## Routing
    /// ```text
    /// no router captured  → close panel, Err(NavigationUnavailable)
    /// no user             → CollectEmail, close panel
    /// user                → CheckoutData { email }, close panel
    /// ```
    pub fn open_checkout_flow(&mut self, user: Option<&SessionUser>) -> CoreResult<Route> {
        let Some(mut router) = self.panel.take_router() else {
            warn!("Checkout requested without a navigation context");
            self.panel.close();
            return Err(CoreError::NavigationUnavailable);
        };

        let route = match user {
            Some(user) => Route::CheckoutData {
                email: user.email.clone(),
            },
            None => Route::CollectEmail,
        };

        info!(route = %route, "Opening checkout");
        router.navigate(route.clone());
        self.panel.close();
        Ok(route)
    }

    /// The cart panel's checkout button: rejects an empty cart or a cart
    /// with no market before routing. Rejections leave the panel open.
    pub fn request_checkout(&mut self, user: Option<&SessionUser>) -> CoreResult<Route> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        if self.cart.selected_market_id().is_none() {
            return Err(CoreError::NoMarketSelected);
        }
        self.open_checkout_flow(user)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
