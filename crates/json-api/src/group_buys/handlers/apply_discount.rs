//! Apply Group Buy Discount Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use groupbuy_app::domain::group_buys::{links::UniqueLink, models::CampaignHandle};

use crate::{
    errors::ApiError,
    extensions::*,
    group_buys::models::SUCCESS_STATUS,
    observability::{GroupBuyEvent, record_group_buy_event},
    state::State,
};

/// Apply Discount Request
///
/// Exactly one of the two fields must be present.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyDiscountRequest {
    pub group_buy_id: Option<Uuid>,
    pub unique_link: Option<String>,
}

impl TryFrom<ApplyDiscountRequest> for CampaignHandle {
    type Error = ApiError;

    fn try_from(request: ApplyDiscountRequest) -> Result<Self, Self::Error> {
        match (request.group_buy_id, request.unique_link) {
            (Some(uuid), None) => Ok(CampaignHandle::Id(uuid.into())),
            (None, Some(link)) => UniqueLink::parse(&link)
                .map(CampaignHandle::Link)
                .map_err(|_malformed| ApiError::not_found("Group buy not found")),
            _ => Err(ApiError::bad_request(
                "Provide exactly one of group_buy_id or unique_link",
            )),
        }
    }
}

/// Discount Applied Response
///
/// Prices are in minor currency units (pence/cents).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountAppliedResponse {
    pub status: String,
    pub message: String,
    pub original_price: u64,
    pub discounted_price: u64,
}

/// Apply Group Buy Discount Handler
///
/// Prices a cart line against a successful campaign. Nothing is written.
#[endpoint(
    tags("group-buys"),
    summary = "Apply Group Buy Discount",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NOT_FOUND, description = "Group buy or cart line not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Discount not available"),
    ),
)]
pub(crate) async fn handler(
    cart_line_id: PathParam<Uuid>,
    json: JsonBody<ApplyDiscountRequest>,
    depot: &mut Depot,
) -> Result<Json<DiscountAppliedResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let campaign = CampaignHandle::try_from(json.into_inner())?;

    let applied = state
        .group_buys
        .apply_discount(cart_line_id.into_inner().into(), campaign, Timestamp::now())
        .await?;

    record_group_buy_event(GroupBuyEvent::DiscountApplied);

    Ok(Json(DiscountAppliedResponse {
        status: SUCCESS_STATUS.to_string(),
        message: "Group buy discount applied".to_string(),
        original_price: applied.original_price,
        discounted_price: applied.discounted_price,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use groupbuy_app::domain::{
        carts::records::CartLineUuid,
        group_buys::{
            GroupBuysServiceError, MockGroupBuysService,
            links::{LinkGenerator, OsRngLinkGenerator},
            models::AppliedDiscount,
            records::GroupBuyUuid,
        },
    };

    use crate::{errors::ErrorEnvelope, test_helpers::group_buys_service};

    use super::*;

    fn make_service(group_buys: MockGroupBuysService) -> Service {
        group_buys_service(
            group_buys,
            Router::with_path("groupbuy/apply-discount/{cart_line_id}").post(handler),
        )
    }

    fn url(cart_line: CartLineUuid) -> String {
        format!("http://example.com/groupbuy/apply-discount/{cart_line}")
    }

    #[tokio::test]
    async fn test_apply_discount_by_id() -> TestResult {
        let cart_line = CartLineUuid::new();
        let group_buy = GroupBuyUuid::new();

        let mut group_buys = MockGroupBuysService::new();

        group_buys
            .expect_apply_discount()
            .once()
            .withf(move |line, campaign, _| {
                *line == cart_line && *campaign == CampaignHandle::Id(group_buy)
            })
            .return_once(move |_, _, _| {
                Ok(AppliedDiscount {
                    cart_line,
                    group_buy,
                    original_price: 10_000,
                    discounted_price: 8_000,
                })
            });

        let mut res = TestClient::post(url(cart_line))
            .json(&json!({ "group_buy_id": group_buy.into_uuid() }))
            .send(&make_service(group_buys))
            .await;

        let body: DiscountAppliedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "success");
        assert_eq!(body.original_price, 10_000);
        assert_eq!(body.discounted_price, 8_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_discount_by_link() -> TestResult {
        let cart_line = CartLineUuid::new();
        let link = OsRngLinkGenerator.generate();

        let mut group_buys = MockGroupBuysService::new();

        let expected = CampaignHandle::Link(link.clone());
        group_buys
            .expect_apply_discount()
            .once()
            .withf(move |_, campaign, _| *campaign == expected)
            .return_once(move |_, _, _| {
                Ok(AppliedDiscount {
                    cart_line,
                    group_buy: GroupBuyUuid::new(),
                    original_price: 999,
                    discounted_price: 749,
                })
            });

        let res = TestClient::post(url(cart_line))
            .json(&json!({ "unique_link": link.as_str() }))
            .send(&make_service(group_buys))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_discount_needs_exactly_one_handle() -> TestResult {
        let mut group_buys = MockGroupBuysService::new();

        group_buys.expect_apply_discount().never();

        let service = make_service(group_buys);

        let neither = TestClient::post(url(CartLineUuid::new()))
            .json(&json!({}))
            .send(&service)
            .await;

        let both = TestClient::post(url(CartLineUuid::new()))
            .json(&json!({
                "group_buy_id": GroupBuyUuid::new().into_uuid(),
                "unique_link": OsRngLinkGenerator.generate().as_str(),
            }))
            .send(&service)
            .await;

        assert_eq!(neither.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(both.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_discount_malformed_link_returns_404() -> TestResult {
        let mut group_buys = MockGroupBuysService::new();

        group_buys.expect_apply_discount().never();

        let res = TestClient::post(url(CartLineUuid::new()))
            .json(&json!({ "unique_link": "../../etc/passwd" }))
            .send(&make_service(group_buys))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_discount_not_eligible_returns_422() -> TestResult {
        let mut group_buys = MockGroupBuysService::new();

        group_buys
            .expect_apply_discount()
            .once()
            .return_once(|_, _, _| {
                Err(GroupBuysServiceError::NotEligible(
                    "group buy has not reached its participant target",
                ))
            });

        let mut res = TestClient::post(url(CartLineUuid::new()))
            .json(&json!({ "group_buy_id": GroupBuyUuid::new().into_uuid() }))
            .send(&make_service(group_buys))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(
            body.message,
            "group buy has not reached its participant target"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_discount_unknown_cart_line_returns_404() -> TestResult {
        let mut group_buys = MockGroupBuysService::new();

        group_buys
            .expect_apply_discount()
            .once()
            .return_once(|_, _, _| Err(GroupBuysServiceError::CartLineNotFound));

        let res = TestClient::post(url(CartLineUuid::new()))
            .json(&json!({ "group_buy_id": GroupBuyUuid::new().into_uuid() }))
            .send(&make_service(group_buys))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
