//! Get Group Buy Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    errors::ApiError, extensions::*, group_buys::models::GroupBuyResponse, state::State,
};

/// Get Group Buy Handler
///
/// Resolves a shareable link. The status is derived as of the request.
#[endpoint(
    tags("group-buys"),
    summary = "Get Group Buy",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NOT_FOUND, description = "Group buy not found"),
    ),
)]
pub(crate) async fn handler(
    link: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<GroupBuyResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let group_buy = state
        .group_buys
        .get_group_buy(&link.into_inner(), Timestamp::now())
        .await?;

    Ok(Json(group_buy.into()))
}
