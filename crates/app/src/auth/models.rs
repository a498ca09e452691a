//! Auth data models.

use std::fmt;

/// Stable identity of a shopper taking part in group buys (user id or email).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantKey(String);

impl ParticipantKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ParticipantKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Request-scoped session resolved from a bearer credential.
///
/// Handlers receive it from the auth middleware and pass it explicitly to the
/// services that need the caller's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub participant: ParticipantKey,
}

impl Session {
    #[must_use]
    pub fn new(participant: ParticipantKey) -> Self {
        Self { participant }
    }
}
