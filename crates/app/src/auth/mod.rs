//! Authentication
//!
//! Bearer credentials are issued elsewhere; this module only resolves them to
//! the participant making the request.

mod errors;
mod models;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use service::*;
pub use token::*;
