//! Postgres-backed fixtures for store integration tests.

use std::sync::Arc;

use sqlx::query;

use crate::{
    auth::hash_bearer_token,
    domain::{
        carts::{PgCartLinesService, records::CartLineUuid},
        group_buys::{StoreGroupBuysService, links::OsRngLinkGenerator, store::PgGroupBuyStore},
        products::records::ProductUuid,
    },
    test::db::TestDb,
};

pub(crate) struct TestContext {
    pub db: TestDb,
    pub store: PgGroupBuyStore,
    pub group_buys: Arc<StoreGroupBuysService>,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let db = TestDb::new().await;
        let store = PgGroupBuyStore::new(db.db());

        let group_buys = Arc::new(StoreGroupBuysService::new(
            Arc::new(store.clone()),
            Arc::new(OsRngLinkGenerator),
            Arc::new(PgCartLinesService::new(db.db())),
        ));

        Self {
            db,
            store,
            group_buys,
        }
    }

    /// Insert a live cart line as the cart component would.
    pub(crate) async fn insert_cart_line(&self, product: ProductUuid, price: i64) -> CartLineUuid {
        let uuid = CartLineUuid::new();

        query("INSERT INTO cart_items (uuid, cart_uuid, product_uuid, base_price) VALUES ($1, $2, $3, $4)")
            .bind(uuid.into_uuid())
            .bind(uuid::Uuid::now_v7())
            .bind(product.into_uuid())
            .bind(price)
            .execute(self.db.pool())
            .await
            .expect("Failed to insert cart line");

        uuid
    }

    /// Insert a session as the authentication service would.
    pub(crate) async fn insert_session(&self, token: &str, participant: &str) {
        query("INSERT INTO sessions (token_hash, participant_key) VALUES ($1, $2)")
            .bind(hash_bearer_token(token))
            .bind(participant)
            .execute(self.db.pool())
            .await
            .expect("Failed to insert session");
    }
}
