//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        carts::{CartLinesService, PgCartLinesService},
        group_buys::{
            GroupBuysService, StoreGroupBuysService,
            links::OsRngLinkGenerator,
            store::{MemoryGroupBuyStore, PgGroupBuyStore},
        },
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub group_buys: Arc<dyn GroupBuysService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, max_connections: u32) -> Result<Self, AppInitError> {
        let pool = database::connect(url, max_connections)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());

        Ok(Self {
            group_buys: Arc::new(StoreGroupBuysService::new(
                Arc::new(PgGroupBuyStore::new(db.clone())),
                Arc::new(OsRngLinkGenerator),
                Arc::new(PgCartLinesService::new(db)),
            )),
            auth: Arc::new(PgAuthService::new(pool)),
        })
    }

    /// Build application context over in-memory campaign storage.
    ///
    /// Sessions and cart lines come from the supplied services.
    #[must_use]
    pub fn in_memory(auth: Arc<dyn AuthService>, carts: Arc<dyn CartLinesService>) -> Self {
        Self {
            group_buys: Arc::new(StoreGroupBuysService::new(
                Arc::new(MemoryGroupBuyStore::new()),
                Arc::new(OsRngLinkGenerator),
                carts,
            )),
            auth,
        }
    }
}
