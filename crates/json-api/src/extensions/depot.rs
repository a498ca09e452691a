//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;

use groupbuy_app::auth::Session;

use crate::errors::ApiError;

/// Helpers for pulling request-scoped values out of the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_session(&mut self, session: Session);

    /// Session placed by the auth middleware, or 401 when the route is unguarded.
    fn session_or_401(&self) -> Result<Session, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>().map_err(|_ignored| ApiError::internal())
    }

    fn insert_session(&mut self, session: Session) {
        self.inject(session);
    }

    fn session_or_401(&self) -> Result<Session, ApiError> {
        self.obtain::<Session>()
            .cloned()
            .map_err(|_ignored| ApiError::unauthorized("Authentication required"))
    }
}
