//! Shared fixtures for service and store tests.

mod context;
pub(crate) mod db;

pub(crate) use context::TestContext;
