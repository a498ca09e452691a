//! Test helpers.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use salvo::{affix_state::inject, prelude::*};

use groupbuy_app::{
    auth::{MockAuthService, ParticipantKey, Session},
    domain::{
        group_buys::{
            MockGroupBuysService,
            links::{LinkGenerator, OsRngLinkGenerator},
            models::GroupBuy,
            records::GroupBuyUuid,
            status::GroupBuyStatus,
        },
        products::records::ProductUuid,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_PARTICIPANT: &str = "alice@example.com";

#[salvo::handler]
pub(crate) async fn inject_session(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_session(Session::new(ParticipantKey::new(TEST_PARTICIPANT)));
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_group_buys_mock() -> MockGroupBuysService {
    let mut group_buys = MockGroupBuysService::new();

    group_buys.expect_create_group_buy().never();
    group_buys.expect_get_group_buy().never();
    group_buys.expect_join_group_buy().never();
    group_buys.expect_apply_discount().never();
    group_buys.expect_list_expiring().never();

    group_buys
}

pub(crate) fn state_with_group_buys(group_buys: MockGroupBuysService) -> Arc<State> {
    Arc::new(State::new(
        Arc::new(group_buys),
        Arc::new(strict_auth_mock()),
    ))
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Arc::new(State::new(
        Arc::new(strict_group_buys_mock()),
        Arc::new(auth),
    ))
}

pub(crate) fn group_buys_service(group_buys: MockGroupBuysService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_group_buys(group_buys)))
            .hoop(inject_session)
            .push(route),
    )
}

/// A campaign one participant short of its target, ending in a day.
pub(crate) fn make_group_buy(status: GroupBuyStatus) -> GroupBuy {
    let created_at = Timestamp::UNIX_EPOCH;

    GroupBuy {
        uuid: GroupBuyUuid::new(),
        product_uuid: ProductUuid::new(),
        discount_percentage: 20,
        min_participants: 3,
        current_participants: 2,
        end_date: created_at + SignedDuration::from_hours(24),
        unique_link: OsRngLinkGenerator.generate(),
        status,
        created_at,
        updated_at: created_at,
    }
}
