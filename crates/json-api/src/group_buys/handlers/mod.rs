//! Group Buy Handlers

pub(crate) mod apply_discount;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod join;
