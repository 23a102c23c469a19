//! # Commands
//!
//! The operations screens call. Each takes the state it needs and returns a
//! serializable view or an `ApiError`.
//!
//! - [`cart`] - Cart contents, market selection, panel, checkout
//! - [`auth`] - Sign in / sign out
//! - [`config`] - Display settings

pub mod auth;
pub mod cart;
pub mod config;
