//! Storefront Cart
//!
//! Client-side cart and promotion state for a storefront backed by a remote
//! REST API. The [`store::CartStore`] mirrors the server's cart, reconciles
//! guest and signed-in sessions, and computes advisory promotion discounts.

pub mod auth;
pub mod carts;
pub mod config;
pub mod http;
pub mod ids;
pub mod observability;
pub mod promotions;
pub mod render;
pub mod session;
pub mod storage;
pub mod store;

#[cfg(test)]
mod test_helpers;
