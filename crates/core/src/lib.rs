//! QuickCart Core - Shared types and cart state.
//!
//! This crate provides the stateful pieces shared by the other QuickCart
//! crates, none of which talk to the outside world. Its consumers are:
//! - `quickcart-storefront` - Remote gateway, session and the top-level controller
//! - `quickcart-cli` - Interactive shell built on the storefront controller
//!
//! # Architecture
//!
//! The core crate contains only types and in-memory state - no I/O, no HTTP
//! clients, no rendering. Every operation here is a plain state transition,
//! so it can be unit tested without a network or a display surface.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and order statuses
//! - [`product`] - Product records as served by the catalog API
//! - [`catalog`] - The in-memory product list with lookup, search and filters
//! - [`cart`] - Cart lines, quantity bookkeeping and derived totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod product;
pub mod types;

pub use cart::{Cart, CartLine, CartTotals};
pub use catalog::Catalog;
pub use product::Product;
pub use types::*;
