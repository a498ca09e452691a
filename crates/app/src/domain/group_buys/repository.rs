//! Group Buys Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, PgPool, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
};

use crate::{
    auth::ParticipantKey,
    domain::{
        group_buys::{
            data::NewGroupBuyRecord,
            links::UniqueLink,
            records::{GroupBuyRecord, GroupBuyUuid},
        },
        products::records::ProductUuid,
    },
};

const CREATE_GROUP_BUY_SQL: &str = include_str!("sql/create_group_buy.sql");
const CREATE_PARTICIPANT_SQL: &str = include_str!("sql/create_participant.sql");
const GET_GROUP_BUY_SQL: &str = include_str!("sql/get_group_buy.sql");
const GET_GROUP_BUY_BY_LINK_SQL: &str = include_str!("sql/get_group_buy_by_link.sql");
const GET_PARTICIPANTS_SQL: &str = include_str!("sql/get_participants.sql");
const INCREMENT_PARTICIPANTS_SQL: &str = include_str!("sql/increment_participants.sql");
const LIST_EXPIRING_BEFORE_SQL: &str = include_str!("sql/list_expiring_before.sql");
const LOCK_GROUP_BUY_SQL: &str = include_str!("sql/lock_group_buy.sql");

const COLUMN_DISCOUNT_PERCENTAGE: &str = "discount_percentage";
const COLUMN_MIN_PARTICIPANTS: &str = "min_participants";
const COLUMN_CURRENT_PARTICIPANTS: &str = "current_participants";
const COLUMN_UNIQUE_LINK: &str = "unique_link";

/// A `group_buys` row before its participants are attached.
#[derive(Debug, Clone)]
pub(crate) struct GroupBuyRow {
    pub uuid: GroupBuyUuid,
    pub product_uuid: ProductUuid,
    pub discount_percentage: u8,
    pub min_participants: u32,
    pub current_participants: u32,
    pub end_date: Timestamp,
    pub unique_link: UniqueLink,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GroupBuyRow {
    pub(crate) fn with_participants(self, participants: Vec<ParticipantKey>) -> GroupBuyRecord {
        GroupBuyRecord {
            uuid: self.uuid,
            product_uuid: self.product_uuid,
            discount_percentage: self.discount_percentage,
            min_participants: self.min_participants,
            current_participants: self.current_participants,
            end_date: self.end_date,
            unique_link: self.unique_link,
            participants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgGroupBuysRepository;

impl PgGroupBuysRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_group_buy(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        group_buy: &NewGroupBuyRecord,
    ) -> Result<GroupBuyRow, sqlx::Error> {
        query_as::<Postgres, GroupBuyRow>(CREATE_GROUP_BUY_SQL)
            .bind(group_buy.uuid.into_uuid())
            .bind(group_buy.product_uuid.into_uuid())
            .bind(i16::from(group_buy.discount_percentage))
            .bind(try_i32_from_u32(
                group_buy.min_participants,
                COLUMN_MIN_PARTICIPANTS,
            )?)
            .bind(SqlxTimestamp::from(group_buy.end_date))
            .bind(group_buy.unique_link.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert a participant row.
    ///
    /// Returns `false` when the participant was already present.
    pub(crate) async fn create_participant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: GroupBuyUuid,
        participant: &ParticipantKey,
    ) -> Result<bool, sqlx::Error> {
        let result = query(CREATE_PARTICIPANT_SQL)
            .bind(uuid.into_uuid())
            .bind(participant.as_str())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    pub(crate) async fn get_group_buy(
        &self,
        pool: &PgPool,
        uuid: GroupBuyUuid,
    ) -> Result<GroupBuyRow, sqlx::Error> {
        query_as::<Postgres, GroupBuyRow>(GET_GROUP_BUY_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(pool)
            .await
    }

    pub(crate) async fn get_group_buy_by_link(
        &self,
        pool: &PgPool,
        link: &UniqueLink,
    ) -> Result<GroupBuyRow, sqlx::Error> {
        query_as::<Postgres, GroupBuyRow>(GET_GROUP_BUY_BY_LINK_SQL)
            .bind(link.as_str())
            .fetch_one(pool)
            .await
    }

    /// Take a row lock on the campaign for the rest of the transaction.
    pub(crate) async fn lock_group_buy(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: GroupBuyUuid,
    ) -> Result<GroupBuyRow, sqlx::Error> {
        query_as::<Postgres, GroupBuyRow>(LOCK_GROUP_BUY_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn increment_participants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: GroupBuyUuid,
        now: Timestamp,
    ) -> Result<GroupBuyRow, sqlx::Error> {
        query_as::<Postgres, GroupBuyRow>(INCREMENT_PARTICIPANTS_SQL)
            .bind(uuid.into_uuid())
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_participants<'e, E>(
        &self,
        executor: E,
        uuid: GroupBuyUuid,
    ) -> Result<Vec<ParticipantKey>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let keys = query_scalar::<Postgres, String>(GET_PARTICIPANTS_SQL)
            .bind(uuid.into_uuid())
            .fetch_all(executor)
            .await?;

        Ok(keys.into_iter().map(ParticipantKey::from).collect())
    }

    pub(crate) async fn list_expiring_before(
        &self,
        pool: &PgPool,
        before: Timestamp,
    ) -> Result<Vec<GroupBuyRow>, sqlx::Error> {
        query_as::<Postgres, GroupBuyRow>(LIST_EXPIRING_BEFORE_SQL)
            .bind(SqlxTimestamp::from(before))
            .fetch_all(pool)
            .await
    }
}

fn try_i32_from_u32(value: u32, column: &'static str) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| decode_error(column, e))
}

fn decode_error(
    column: &'static str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

impl<'r> FromRow<'r, PgRow> for GroupBuyRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_percentage: i16 = row.try_get(COLUMN_DISCOUNT_PERCENTAGE)?;
        let min_participants: i32 = row.try_get(COLUMN_MIN_PARTICIPANTS)?;
        let current_participants: i32 = row.try_get(COLUMN_CURRENT_PARTICIPANTS)?;
        let unique_link: String = row.try_get(COLUMN_UNIQUE_LINK)?;

        Ok(Self {
            uuid: GroupBuyUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            discount_percentage: u8::try_from(discount_percentage)
                .map_err(|e| decode_error(COLUMN_DISCOUNT_PERCENTAGE, e))?,
            min_participants: u32::try_from(min_participants)
                .map_err(|e| decode_error(COLUMN_MIN_PARTICIPANTS, e))?,
            current_participants: u32::try_from(current_participants)
                .map_err(|e| decode_error(COLUMN_CURRENT_PARTICIPANTS, e))?,
            end_date: row.try_get::<SqlxTimestamp, _>("end_date")?.to_jiff(),
            unique_link: UniqueLink::parse(&unique_link)
                .map_err(|e| decode_error(COLUMN_UNIQUE_LINK, e))?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
