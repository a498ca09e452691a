//! Carts
//!
//! Read-only view of cart lines owned by the checkout component. Group buys
//! price a line against a campaign discount but never write to the cart.

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::CartLinesServiceError;
pub use service::*;
