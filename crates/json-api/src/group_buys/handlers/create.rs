//! Create Group Buy Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use groupbuy_app::domain::group_buys::data::NewGroupBuy;

use crate::{
    errors::ApiError,
    extensions::*,
    group_buys::models::{GroupBuyResponse, SUCCESS_STATUS},
    observability::{GroupBuyEvent, record_group_buy_event},
    state::State,
};

/// Create Group Buy Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateGroupBuyRequest {
    pub product_id: Uuid,

    /// Whole percent off, 1 to 99
    pub discount_percentage: i64,

    /// Participants needed, at least 2, initiator included
    pub min_participants: i64,

    /// RFC 3339 timestamp, must be in the future
    pub end_date: String,
}

/// Group Buy Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GroupBuyCreatedResponse {
    pub status: String,
    pub message: String,
    pub group_buy_id: Uuid,

    /// Token to share with other shoppers
    pub unique_link: String,

    pub group_buy: GroupBuyResponse,
}

/// Create Group Buy Handler
///
/// Starts a campaign with the caller as its first participant.
#[endpoint(
    tags("group-buys"),
    summary = "Create Group Buy",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Group buy created"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateGroupBuyRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<GroupBuyCreatedResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;
    let request = json.into_inner();

    let end_date = request
        .end_date
        .parse::<Timestamp>()
        .or_400("Invalid group buy: end_date: must be an RFC 3339 timestamp")?;

    let new_group_buy = NewGroupBuy {
        product_uuid: request.product_id.into(),
        discount_percentage: request.discount_percentage,
        min_participants: request.min_participants,
        end_date,
    };

    let group_buy = state
        .group_buys
        .create_group_buy(session.participant, new_group_buy, Timestamp::now())
        .await?;

    record_group_buy_event(GroupBuyEvent::Created);

    info!(group_buy = %group_buy.uuid, "group buy created over http");

    res.add_header(LOCATION, format!("/groupbuy/{}", group_buy.unique_link), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(GroupBuyCreatedResponse {
        status: SUCCESS_STATUS.to_string(),
        message: "Group buy created successfully".to_string(),
        group_buy_id: group_buy.uuid.into(),
        unique_link: group_buy.unique_link.to_string(),
        group_buy: group_buy.into(),
    }))
}
