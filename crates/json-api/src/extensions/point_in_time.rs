//! Point-in-time query parsing helpers.

use jiff::Timestamp;
use salvo::oapi::extract::QueryParam;

use crate::{errors::ApiError, extensions::*};

pub(crate) trait PointInTimeExt {
    /// Parse an optional RFC 3339 query value, defaulting to the current time.
    fn into_point_in_time(self, name: &str) -> Result<Timestamp, ApiError>;
}

impl PointInTimeExt for QueryParam<String, false> {
    fn into_point_in_time(self, name: &str) -> Result<Timestamp, ApiError> {
        parse_point_in_time(self.into_inner(), name)
    }
}

fn parse_point_in_time(value: Option<String>, name: &str) -> Result<Timestamp, ApiError> {
    value
        .map(|value| value.parse::<Timestamp>())
        .transpose()
        .or_400(&format!("could not parse \"{name}\" query parameter"))
        .map(|point_in_time| point_in_time.unwrap_or_else(Timestamp::now))
}
