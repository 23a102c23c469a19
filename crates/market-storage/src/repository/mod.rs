//! # Repository Module
//!
//! Typed access to the key-value store.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartSnapshotRepository   SessionUserRepository                        │
//! │  key: @market-app:cart    key: @market-app:auth-user                   │
//! │  value: CartSnapshot      value: SessionUser                           │
//! │            │                         │                                  │
//! │            └───────────┬─────────────┘                                  │
//! │                        ▼                                                │
//! │              KeyValueRepository (JSON text by key)                     │
//! │                        │                                                │
//! │                        ▼                                                │
//! │              key_value_store table                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`kv::KeyValueRepository`] - Raw string values by key
//! - [`cart::CartSnapshotRepository`] - The persisted cart
//! - [`session::SessionUserRepository`] - The signed-in user

pub mod cart;
pub mod kv;
pub mod session;
