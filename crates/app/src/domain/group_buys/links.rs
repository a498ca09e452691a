//! Shareable group buy links.
//!
//! A link is the only handle handed to shoppers. It is random, URL-safe and
//! carries nothing about the internal id, so campaigns cannot be enumerated.

use std::{fmt, str::FromStr};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use mockall::automock;
use rand::{RngCore, rngs::OsRng};
use thiserror::Error;

/// Number of random bytes behind every link (128 bits of entropy).
pub const LINK_ENTROPY_BYTES: usize = 16;

/// Length of an encoded link: unpadded base64 of [`LINK_ENTROPY_BYTES`].
pub const LINK_LENGTH: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UniqueLinkError {
    #[error("link must be {LINK_LENGTH} characters long")]
    InvalidLength,

    #[error("link contains characters outside the URL-safe alphabet")]
    InvalidCharacter,
}

/// Opaque, URL-safe external handle for a group buy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniqueLink(String);

impl UniqueLink {
    /// Validate the shape of a link received from a caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not have been produced by a [`LinkGenerator`].
    pub fn parse(value: &str) -> Result<Self, UniqueLinkError> {
        if value.len() != LINK_LENGTH {
            return Err(UniqueLinkError::InvalidLength);
        }

        if !value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(UniqueLinkError::InvalidCharacter);
        }

        Ok(Self(value.to_string()))
    }

    fn from_bytes(bytes: &[u8; LINK_ENTROPY_BYTES]) -> Self {
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UniqueLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UniqueLink {
    type Err = UniqueLinkError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// Source of fresh links. Collision handling belongs to the caller.
#[automock]
pub trait LinkGenerator: Send + Sync {
    fn generate(&self) -> UniqueLink;
}

/// Draws link entropy from the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngLinkGenerator;

impl LinkGenerator for OsRngLinkGenerator {
    fn generate(&self) -> UniqueLink {
        let mut bytes = [0_u8; LINK_ENTROPY_BYTES];

        OsRng.fill_bytes(&mut bytes);

        UniqueLink::from_bytes(&bytes)
    }
}
