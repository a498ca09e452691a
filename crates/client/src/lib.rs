//! Client-side coordination for group buys.
//!
//! [`Coordinator`] drives the HTTP API on behalf of one signed-in shopper and
//! keeps watching a campaign until it settles.

pub mod api;
pub mod coordinator;
pub mod errors;
pub mod models;

pub use api::{Credential, GroupBuyApi, HttpGroupBuyApi, MockGroupBuyApi};
pub use coordinator::{
    Coordinator, DEFAULT_POLL_INTERVAL, MAX_OBSERVATIONS, PollEvent, PollHandle,
};
pub use errors::ClientError;
