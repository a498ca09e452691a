//! List Expiring Group Buys Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    errors::ApiError, extensions::*, group_buys::models::GroupBuyResponse, state::State,
};

/// Group Buys Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GroupBuysResponse {
    /// Earliest end date first
    pub group_buys: Vec<GroupBuyResponse>,
}

/// List Expiring Group Buys Handler
///
/// Campaigns whose end date is before `expiring_before` (default now).
#[endpoint(
    tags("group-buys"),
    summary = "List Expiring Group Buys",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    expiring_before: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<GroupBuysResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let before = expiring_before.into_point_in_time("expiring_before")?;

    let group_buys = state
        .group_buys
        .list_expiring(before, Timestamp::now())
        .await?;

    Ok(Json(GroupBuysResponse {
        group_buys: group_buys.into_iter().map(Into::into).collect(),
    }))
}
