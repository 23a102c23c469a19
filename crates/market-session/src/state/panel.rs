//! # Cart Panel
//!
//! Visibility of the cart panel and the navigation context it borrowed.
//!
//! ```text
//!            open(router)
//!   Closed ───────────────► Open { router }
//!     ▲                          │
//!     └──────────────────────────┘
//!       close / checkout routed / go to markets
//!       (router dropped)
//! ```

use crate::routing::{Route, Router};

/// Panel state. The router exists only while the panel is open.
#[derive(Default)]
pub enum CartPanel {
    #[default]
    Closed,
    Open { router: Option<Box<dyn Router>> },
}

impl CartPanel {
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, CartPanel::Open { .. })
    }

    /// Opens (or re-opens) the panel, replacing any captured router.
    pub fn open(&mut self, router: Option<Box<dyn Router>>) {
        *self = CartPanel::Open { router };
    }

    /// Closes the panel and drops the router.
    pub fn close(&mut self) {
        *self = CartPanel::Closed;
    }

    /// Takes the captured router, leaving the panel open without one.
    pub fn take_router(&mut self) -> Option<Box<dyn Router>> {
        match self {
            CartPanel::Open { router } => router.take(),
            CartPanel::Closed => None,
        }
    }

    /// Navigates with the captured router (if any), then closes.
    ///
    /// ## Returns
    /// Whether a router was available.
    pub fn navigate_and_close(&mut self, route: Route) -> bool {
        let navigated = match self.take_router() {
            Some(mut router) => {
                router.navigate(route);
                true
            }
            None => false,
        };
        self.close();
        navigated
    }
}

impl std::fmt::Debug for CartPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartPanel::Closed => write!(f, "Closed"),
            CartPanel::Open { router } => f
                .debug_struct("Open")
                .field("has_router", &router.is_some())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::testing::RecordingRouter;

    #[test]
    fn test_open_close() {
        let mut panel = CartPanel::default();
        assert!(!panel.is_open());

        panel.open(None);
        assert!(panel.is_open());

        panel.close();
        assert!(!panel.is_open());
    }

    #[test]
    fn test_navigate_and_close_uses_router_once() {
        let router = RecordingRouter::default();
        let mut panel = CartPanel::default();
        panel.open(Some(router.boxed()));

        assert!(panel.navigate_and_close(Route::Markets));
        assert!(!panel.is_open());

        // router is gone after one navigation
        panel.open(None);
        assert!(!panel.navigate_and_close(Route::Markets));
        assert_eq!(router.routes(), vec![Route::Markets]);
    }
}
