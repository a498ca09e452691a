//! Cart Lines Repository

use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::domain::carts::records::{CartLineRecord, CartLineUuid};

const GET_CART_LINE_SQL: &str = include_str!("sql/get_cart_line.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_line(
        &self,
        pool: &PgPool,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(GET_CART_LINE_SQL)
            .bind(line.into_uuid())
            .fetch_one(pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let base_price: i64 = row.try_get("base_price")?;

        let price = u64::try_from(base_price).map_err(|e| sqlx::Error::ColumnDecode {
            index: "base_price".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: row.try_get::<uuid::Uuid, _>("product_uuid")?.into(),
            price,
        })
    }
}
