//! Cart state store

mod errors;
pub mod service;
pub mod state;

pub use errors::CartError;
pub use service::CartStore;
pub use state::CartState;
