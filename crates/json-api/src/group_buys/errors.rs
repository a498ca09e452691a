//! Group Buy Errors

use salvo::http::StatusCode;
use tracing::error;

use groupbuy_app::domain::group_buys::GroupBuysServiceError;

use crate::errors::ApiError;

impl From<GroupBuysServiceError> for ApiError {
    fn from(error: GroupBuysServiceError) -> Self {
        match error {
            GroupBuysServiceError::Validation(violations) => {
                ApiError::bad_request(format!("Invalid group buy: {violations}"))
            }
            GroupBuysServiceError::NotFound => ApiError::not_found("Group buy not found"),
            GroupBuysServiceError::CartLineNotFound => ApiError::not_found("Cart line not found"),
            GroupBuysServiceError::AlreadyJoined => ApiError::new(
                StatusCode::CONFLICT,
                "You have already joined this group buy",
            ),
            GroupBuysServiceError::Full => ApiError::new(
                StatusCode::CONFLICT,
                "Group buy has already reached its participant target",
            ),
            GroupBuysServiceError::Expired => {
                ApiError::new(StatusCode::GONE, "Group buy has ended")
            }
            GroupBuysServiceError::NotEligible(reason) => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, reason)
            }
            GroupBuysServiceError::LinkExhausted => {
                error!("could not allocate a unique group buy link");

                ApiError::internal()
            }
            GroupBuysServiceError::InvalidData => {
                error!("stored group buy is malformed");

                ApiError::internal()
            }
            GroupBuysServiceError::Pricing(source) => {
                error!("failed to price group buy discount: {source}");

                ApiError::internal()
            }
            GroupBuysServiceError::Sql(source) => {
                error!("group buy storage error: {source}");

                ApiError::internal()
            }
        }
    }
}
