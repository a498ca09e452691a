//! App Router

use salvo::Router;

use crate::{auth, group_buys};

/// Group buy routes, all behind bearer authentication.
pub(crate) fn app_router() -> Router {
    Router::new().hoop(auth::middleware::handler).push(
        Router::with_path("groupbuy")
            .get(group_buys::index::handler)
            .post(group_buys::create::handler)
            .push(Router::with_path("join/{link}").post(group_buys::join::handler))
            .push(
                Router::with_path("apply-discount/{cart_line_id}")
                    .post(group_buys::apply_discount::handler),
            )
            .push(Router::with_path("{link}").get(group_buys::get::handler)),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::{SignedDuration, Timestamp};
    use salvo::{
        affix_state::inject,
        http::{StatusCode, header::AUTHORIZATION},
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::{Value, json};
    use testresult::TestResult;

    use groupbuy_app::{
        auth::MemoryAuthService,
        context::AppContext,
        domain::{
            carts::{
                MemoryCartLinesService,
                records::{CartLineRecord, CartLineUuid},
            },
            products::records::ProductUuid,
        },
    };

    use crate::{errors, state::State};

    use super::*;

    const ALICE: &str = "Bearer alice-token";
    const BOB: &str = "Bearer bob-token";

    struct Harness {
        service: Service,
        product: ProductUuid,
        carts: Arc<MemoryCartLinesService>,
    }

    fn harness() -> Harness {
        let auth = MemoryAuthService::new()
            .with_session("alice-token", "alice@example.com")
            .with_session("bob-token", "bob@example.com");
        let carts = Arc::new(MemoryCartLinesService::new());

        let app = AppContext::in_memory(Arc::new(auth), carts.clone());

        Harness {
            service: Service::new(
                Router::new()
                    .hoop(inject(State::from_app_context(app)))
                    .push(app_router()),
            )
            .catcher(errors::catcher()),
            product: ProductUuid::new(),
            carts,
        }
    }

    async fn create(harness: &Harness, min_participants: u32) -> TestResult<String> {
        let end_date = Timestamp::now() + SignedDuration::from_hours(24);

        let mut res = TestClient::post("http://example.com/groupbuy")
            .add_header(AUTHORIZATION, ALICE, true)
            .json(&json!({
                "product_id": harness.product.into_uuid(),
                "discount_percentage": 20,
                "min_participants": min_participants,
                "end_date": end_date.to_string(),
            }))
            .send(&harness.service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: Value = res.take_json().await?;

        Ok(body["unique_link"].as_str().unwrap_or_default().to_string())
    }

    #[tokio::test]
    async fn group_buy_lifecycle_over_http() -> TestResult {
        let harness = harness();
        let link = create(&harness, 2).await?;

        let cart_line = CartLineRecord {
            uuid: CartLineUuid::new(),
            product_uuid: harness.product,
            price: 10_000,
        };
        let cart_line_uuid = cart_line.uuid;
        harness.carts.put_cart_line(cart_line).await;

        let early = TestClient::post(format!(
            "http://example.com/groupbuy/apply-discount/{cart_line_uuid}"
        ))
        .add_header(AUTHORIZATION, ALICE, true)
        .json(&json!({ "unique_link": link }))
        .send(&harness.service)
        .await;

        assert_eq!(early.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        let mut joined = TestClient::post(format!("http://example.com/groupbuy/join/{link}"))
            .add_header(AUTHORIZATION, BOB, true)
            .send(&harness.service)
            .await;

        let joined_body: Value = joined.take_json().await?;

        assert_eq!(joined.status_code, Some(StatusCode::OK));
        assert_eq!(joined_body["goal_reached"], json!(true));
        assert_eq!(joined_body["group_buy"]["status"], json!("successful"));
        assert_eq!(joined_body["group_buy"]["current_participants"], json!(2));

        let mut applied = TestClient::post(format!(
            "http://example.com/groupbuy/apply-discount/{cart_line_uuid}"
        ))
        .add_header(AUTHORIZATION, ALICE, true)
        .json(&json!({ "unique_link": link }))
        .send(&harness.service)
        .await;

        let applied_body: Value = applied.take_json().await?;

        assert_eq!(applied.status_code, Some(StatusCode::OK));
        assert_eq!(applied_body["original_price"], json!(10_000));
        assert_eq!(applied_body["discounted_price"], json!(8_000));

        let mut viewed = TestClient::get(format!("http://example.com/groupbuy/{link}"))
            .add_header(AUTHORIZATION, BOB, true)
            .send(&harness.service)
            .await;

        let viewed_body: Value = viewed.take_json().await?;

        assert_eq!(viewed_body["current_participants"], json!(2));
        assert_eq!(viewed_body["is_active"], json!(false));

        Ok(())
    }

    #[tokio::test]
    async fn initiator_cannot_join_twice() -> TestResult {
        let harness = harness();
        let link = create(&harness, 3).await?;

        let mut res = TestClient::post(format!("http://example.com/groupbuy/join/{link}"))
            .add_header(AUTHORIZATION, ALICE, true)
            .send(&harness.service)
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert_eq!(body["status"], json!("error"));

        Ok(())
    }

    #[tokio::test]
    async fn unauthenticated_requests_are_rejected() -> TestResult {
        let harness = harness();

        let mut res = TestClient::get("http://example.com/groupbuy/AAAAAAAAAAAAAAAAAAAAAA")
            .send(&harness.service)
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(body["status"], json!("error"));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_link_is_not_found() -> TestResult {
        let harness = harness();

        let res = TestClient::get("http://example.com/groupbuy/AAAAAAAAAAAAAAAAAAAAAA")
            .add_header(AUTHORIZATION, BOB, true)
            .send(&harness.service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    async fn expect_envelope(mut res: Response, status: StatusCode) -> TestResult<String> {
        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(status));
        assert_eq!(body["status"], json!("error"), "body was {body}");

        Ok(body["message"].as_str().unwrap_or_default().to_string())
    }

    #[tokio::test]
    async fn mistyped_body_is_enveloped() -> TestResult {
        let harness = harness();

        let res = TestClient::post("http://example.com/groupbuy")
            .add_header(AUTHORIZATION, ALICE, true)
            .json(&json!({
                "product_id": harness.product.into_uuid(),
                "discount_percentage": "ten",
                "min_participants": 2,
                "end_date": "2030-01-01T00:00:00Z",
            }))
            .send(&harness.service)
            .await;

        let message = expect_envelope(res, StatusCode::BAD_REQUEST).await?;

        assert!(!message.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn malformed_cart_line_id_is_enveloped() -> TestResult {
        let harness = harness();
        let link = create(&harness, 2).await?;

        let res = TestClient::post("http://example.com/groupbuy/apply-discount/not-a-uuid")
            .add_header(AUTHORIZATION, ALICE, true)
            .json(&json!({ "unique_link": link }))
            .send(&harness.service)
            .await;

        expect_envelope(res, StatusCode::BAD_REQUEST).await?;

        Ok(())
    }

    #[tokio::test]
    async fn unmatched_route_is_enveloped() -> TestResult {
        let harness = harness();

        let res = TestClient::delete("http://example.com/groupbuy")
            .add_header(AUTHORIZATION, ALICE, true)
            .send(&harness.service)
            .await;

        let status = res.status_code;

        assert!(
            matches!(
                status,
                Some(StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED)
            ),
            "got {status:?}"
        );

        expect_envelope(res, status.unwrap_or(StatusCode::NOT_FOUND)).await?;

        Ok(())
    }
}
