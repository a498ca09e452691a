//! Derived group buy status.
//!
//! Status is never stored. It is recomputed on every read from the participant
//! counter, the threshold and the end date, so there is no sweeper to forget a
//! transition. Once the threshold is met the campaign stays successful, even
//! after its end date passes.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::domain::group_buys::records::GroupBuyRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupBuyStatus {
    /// Accepting participants, threshold not yet met.
    Active,

    /// Threshold met. Terminal for joins; the discount may be applied.
    Successful,

    /// End date passed below threshold. Terminal.
    Expired,
}

impl GroupBuyStatus {
    #[must_use]
    pub fn derive(record: &GroupBuyRecord, now: Timestamp) -> Self {
        if record.goal_met() {
            Self::Successful
        } else if now > record.end_date {
            Self::Expired
        } else {
            Self::Active
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Successful => "successful",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for GroupBuyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown group buy status: {0}")]
pub struct UnknownStatusError(String);

impl FromStr for GroupBuyStatus {
    type Err = UnknownStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "successful" => Ok(Self::Successful),
            "expired" => Ok(Self::Expired),
            other => Err(UnknownStatusError(other.to_string())),
        }
    }
}
