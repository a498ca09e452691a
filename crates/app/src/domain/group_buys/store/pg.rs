//! Postgres-backed group buy store.

use async_trait::async_trait;
use jiff::Timestamp;

use crate::{
    auth::ParticipantKey,
    database::Db,
    domain::group_buys::{
        data::NewGroupBuyRecord,
        errors::GroupBuyStoreError,
        links::UniqueLink,
        records::{GroupBuyRecord, GroupBuyUuid},
        repository::PgGroupBuysRepository,
        store::GroupBuyStore,
    },
};

/// Group buy store persisted in Postgres.
///
/// Joins lock the campaign row with `SELECT ... FOR UPDATE`, so concurrent
/// joins to one campaign are serialised while other campaigns proceed.
#[derive(Debug, Clone)]
pub struct PgGroupBuyStore {
    db: Db,
    repository: PgGroupBuysRepository,
}

impl PgGroupBuyStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgGroupBuysRepository::new(),
        }
    }
}

#[async_trait]
impl GroupBuyStore for PgGroupBuyStore {
    async fn create(
        &self,
        group_buy: NewGroupBuyRecord,
    ) -> Result<GroupBuyRecord, GroupBuyStoreError> {
        let mut tx = self.db.begin().await?;

        let row = self.repository.create_group_buy(&mut tx, &group_buy).await?;

        self.repository
            .create_participant(&mut tx, group_buy.uuid, &group_buy.initiator)
            .await?;

        tx.commit().await?;

        Ok(row.with_participants(vec![group_buy.initiator]))
    }

    async fn get_by_id(&self, uuid: GroupBuyUuid) -> Result<GroupBuyRecord, GroupBuyStoreError> {
        let pool = self.db.pool();

        let row = self.repository.get_group_buy(pool, uuid).await?;
        let participants = self.repository.get_participants(pool, uuid).await?;

        Ok(row.with_participants(participants))
    }

    async fn get_by_link(
        &self,
        link: &UniqueLink,
    ) -> Result<GroupBuyRecord, GroupBuyStoreError> {
        let pool = self.db.pool();

        let row = self.repository.get_group_buy_by_link(pool, link).await?;
        let participants = self.repository.get_participants(pool, row.uuid).await?;

        Ok(row.with_participants(participants))
    }

    async fn add_participant(
        &self,
        uuid: GroupBuyUuid,
        participant: ParticipantKey,
        now: Timestamp,
    ) -> Result<GroupBuyRecord, GroupBuyStoreError> {
        let mut tx = self.db.begin().await?;

        let locked = self.repository.lock_group_buy(&mut tx, uuid).await?;
        let mut participants = self.repository.get_participants(&mut *tx, uuid).await?;

        if participants.contains(&participant) {
            return Err(GroupBuyStoreError::AlreadyJoined);
        }

        if now > locked.end_date {
            return Err(GroupBuyStoreError::Expired);
        }

        if locked.current_participants >= locked.min_participants {
            return Err(GroupBuyStoreError::Full);
        }

        if !self
            .repository
            .create_participant(&mut tx, uuid, &participant)
            .await?
        {
            return Err(GroupBuyStoreError::AlreadyJoined);
        }

        let updated = self
            .repository
            .increment_participants(&mut tx, uuid, now)
            .await?;

        tx.commit().await?;

        participants.push(participant);

        Ok(updated.with_participants(participants))
    }

    async fn list_expiring_before(
        &self,
        before: Timestamp,
    ) -> Result<Vec<GroupBuyRecord>, GroupBuyStoreError> {
        let pool = self.db.pool();

        let rows = self.repository.list_expiring_before(pool, before).await?;

        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let participants = self.repository.get_participants(pool, row.uuid).await?;

            records.push(row.with_participants(participants));
        }

        Ok(records)
    }
}
