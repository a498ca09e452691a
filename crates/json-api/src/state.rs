//! Shared handler state.

use std::sync::Arc;

use groupbuy_app::{auth::AuthService, context::AppContext, domain::group_buys::GroupBuysService};

/// Services reachable from every handler through the depot.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) group_buys: Arc<dyn GroupBuysService>,
    pub(crate) auth: Arc<dyn AuthService>,
}

impl State {
    #[must_use]
    pub(crate) fn new(group_buys: Arc<dyn GroupBuysService>, auth: Arc<dyn AuthService>) -> Self {
        Self { group_buys, auth }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self::new(app.group_buys, app.auth))
    }
}
