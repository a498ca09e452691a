//! Domain services

pub mod carts;
pub mod group_buys;
pub mod products;
