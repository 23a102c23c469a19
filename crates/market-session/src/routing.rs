//! # Checkout Routing
//!
//! The screens the cart can send the user to, and the navigation capability
//! the cart panel borrows from the screen that opened it.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Route                    Screen          Path            Params        │
//! │  ─────                    ──────          ────            ──────        │
//! │  Markets                  Markets         markets         -             │
//! │  CollectEmail             CollectEmail    checkout/email  -             │
//! │  CheckoutData { email }   CheckoutData    checkout/data   email         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// A destination screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", content = "params")]
pub enum Route {
    /// The market list.
    Markets,

    /// Asks a guest for an email before checkout.
    CollectEmail,

    /// Delivery and payment details for a known email.
    CheckoutData { email: String },
}

impl Route {
    /// Stable screen name the navigator registers.
    pub fn screen_name(&self) -> &'static str {
        match self {
            Route::Markets => "Markets",
            Route::CollectEmail => "CollectEmail",
            Route::CheckoutData { .. } => "CheckoutData",
        }
    }

    /// Deep-link path.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Markets => "markets",
            Route::CollectEmail => "checkout/email",
            Route::CheckoutData { .. } => "checkout/data",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.screen_name())
    }
}

/// Navigation capability handed to the cart panel when it opens.
///
/// The panel calls `navigate` at most once, then drops the router.
pub trait Router: Send {
    fn navigate(&mut self, route: Route);
}

/// Any `FnMut(Route)` closure is a router.
impl<F> Router for F
where
    F: FnMut(Route) + Send,
{
    fn navigate(&mut self, route: Route) {
        self(route)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_names_and_paths() {
        let data = Route::CheckoutData {
            email: "x@y.com".to_string(),
        };
        assert_eq!(data.screen_name(), "CheckoutData");
        assert_eq!(data.path(), "checkout/data");
        assert_eq!(Route::CollectEmail.path(), "checkout/email");
        assert_eq!(Route::Markets.path(), "markets");
    }

    #[test]
    fn test_route_serialization() {
        let json = serde_json::to_value(Route::CheckoutData {
            email: "x@y.com".to_string(),
        })
        .unwrap();
        assert_eq!(json["screen"], "CheckoutData");
        assert_eq!(json["params"]["email"], "x@y.com");

        let json = serde_json::to_value(Route::CollectEmail).unwrap();
        assert_eq!(json["screen"], "CollectEmail");
    }

    #[test]
    fn test_closure_router() {
        let mut seen = Vec::new();
        {
            let mut router = |route: Route| seen.push(route);
            Router::navigate(&mut router, Route::Markets);
        }
        assert_eq!(seen, vec![Route::Markets]);
    }
}
