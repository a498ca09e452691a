//! Group Buys
//!
//! Campaigns that unlock a percentage discount on one product once enough
//! shoppers have joined before the end date.

pub mod data;
pub mod errors;
pub mod links;
pub mod models;
pub mod pricing;
pub mod records;
mod repository;
pub mod service;
pub mod status;
pub mod store;

pub use errors::{GroupBuyStoreError, GroupBuysServiceError};
pub use service::*;
