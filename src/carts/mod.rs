//! Carts

pub mod client;
pub mod models;
pub mod records;

pub use client::*;
