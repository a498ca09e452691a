//! Group buy errors.

use std::fmt;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{carts::CartLinesServiceError, group_buys::pricing::PricingError};

/// Failures reported by a [`GroupBuyStore`](crate::domain::group_buys::store::GroupBuyStore).
#[derive(Debug, Error)]
pub enum GroupBuyStoreError {
    #[error("group buy not found")]
    NotFound,

    #[error("participant already joined")]
    AlreadyJoined,

    #[error("group buy has ended")]
    Expired,

    #[error("group buy has reached its participant target")]
    Full,

    #[error("unique link already in use")]
    Conflict,

    #[error("stored group buy is malformed")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for GroupBuyStoreError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// All field violations found in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|violation| violation.field == field)
    }

    /// `Ok(())` when nothing was rejected.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one violation was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{}: {}", violation.field, violation.message)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
pub enum GroupBuysServiceError {
    #[error("invalid group buy: {0}")]
    Validation(ValidationErrors),

    #[error("group buy not found")]
    NotFound,

    #[error("cart line not found")]
    CartLineNotFound,

    #[error("group buy has ended")]
    Expired,

    #[error("participant already joined")]
    AlreadyJoined,

    #[error("group buy has reached its participant target")]
    Full,

    #[error("group buy discount is not available: {0}")]
    NotEligible(&'static str),

    #[error("could not allocate a unique link")]
    LinkExhausted,

    #[error("stored group buy is malformed")]
    InvalidData,

    #[error("could not compute discounted price")]
    Pricing(#[from] PricingError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<GroupBuyStoreError> for GroupBuysServiceError {
    fn from(error: GroupBuyStoreError) -> Self {
        match error {
            GroupBuyStoreError::NotFound => Self::NotFound,
            GroupBuyStoreError::AlreadyJoined => Self::AlreadyJoined,
            GroupBuyStoreError::Expired => Self::Expired,
            GroupBuyStoreError::Full => Self::Full,
            GroupBuyStoreError::Conflict => Self::LinkExhausted,
            GroupBuyStoreError::InvalidData => Self::InvalidData,
            GroupBuyStoreError::Sql(source) => Self::Sql(source),
        }
    }
}

impl From<CartLinesServiceError> for GroupBuysServiceError {
    fn from(error: CartLinesServiceError) -> Self {
        match error {
            CartLinesServiceError::NotFound => Self::CartLineNotFound,
            CartLinesServiceError::Sql(source) => Self::Sql(source),
        }
    }
}
