//! Products
//!
//! The catalog lives elsewhere; group buys only hold a reference to a product.

pub mod records;
