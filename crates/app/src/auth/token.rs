//! Bearer token hashing.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a raw bearer token.
///
/// Only digests are stored or compared; raw tokens never reach storage.
#[must_use]
pub fn hash_bearer_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
