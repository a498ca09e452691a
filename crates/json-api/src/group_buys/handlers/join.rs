//! Join Group Buy Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    errors::ApiError,
    extensions::*,
    group_buys::models::{GroupBuyResponse, SUCCESS_STATUS},
    observability::{GroupBuyEvent, record_group_buy_event},
    state::State,
};

/// Joined Group Buy Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct JoinedGroupBuyResponse {
    pub status: String,
    pub message: String,

    /// True only for the join that unlocked the discount
    pub goal_reached: bool,

    pub group_buy: GroupBuyResponse,
}

/// Join Group Buy Handler
///
/// Adds the caller to the campaign behind a shareable link.
#[endpoint(
    tags("group-buys"),
    summary = "Join Group Buy",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NOT_FOUND, description = "Group buy not found"),
        (status_code = StatusCode::CONFLICT, description = "Already joined, or target already reached"),
        (status_code = StatusCode::GONE, description = "Group buy has ended"),
    ),
)]
pub(crate) async fn handler(
    link: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<JoinedGroupBuyResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let joined = state
        .group_buys
        .join_group_buy(&link.into_inner(), session.participant, Timestamp::now())
        .await?;

    record_group_buy_event(GroupBuyEvent::Joined);

    let message = if joined.goal_reached {
        record_group_buy_event(GroupBuyEvent::GoalReached);

        "Group buy goal reached, discount unlocked"
    } else {
        "Successfully joined group buy"
    };

    Ok(Json(JoinedGroupBuyResponse {
        status: SUCCESS_STATUS.to_string(),
        message: message.to_string(),
        goal_reached: joined.goal_reached,
        group_buy: joined.group_buy.into(),
    }))
}
