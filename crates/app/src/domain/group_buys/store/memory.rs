//! In-memory group buy store.

use std::collections::HashMap;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::{
    auth::ParticipantKey,
    domain::group_buys::{
        data::NewGroupBuyRecord,
        errors::GroupBuyStoreError,
        links::UniqueLink,
        records::{GroupBuyRecord, GroupBuyUuid},
        store::GroupBuyStore,
    },
};

#[derive(Debug, Default)]
struct MemoryState {
    group_buys: HashMap<GroupBuyUuid, GroupBuyRecord>,
    links: HashMap<UniqueLink, GroupBuyUuid>,
}

/// Group buy store held in process memory.
///
/// Every mutation takes the single write lock, which serialises concurrent
/// joins the same way a row lock does in Postgres.
#[derive(Debug, Default)]
pub struct MemoryGroupBuyStore {
    state: RwLock<MemoryState>,
}

impl MemoryGroupBuyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupBuyStore for MemoryGroupBuyStore {
    async fn create(
        &self,
        group_buy: NewGroupBuyRecord,
    ) -> Result<GroupBuyRecord, GroupBuyStoreError> {
        let mut state = self.state.write().await;

        if state.links.contains_key(&group_buy.unique_link)
            || state.group_buys.contains_key(&group_buy.uuid)
        {
            return Err(GroupBuyStoreError::Conflict);
        }

        let now = Timestamp::now();

        let record = GroupBuyRecord {
            uuid: group_buy.uuid,
            product_uuid: group_buy.product_uuid,
            discount_percentage: group_buy.discount_percentage,
            min_participants: group_buy.min_participants,
            current_participants: 1,
            end_date: group_buy.end_date,
            unique_link: group_buy.unique_link,
            participants: vec![group_buy.initiator],
            created_at: now,
            updated_at: now,
        };

        state
            .links
            .insert(record.unique_link.clone(), record.uuid);
        state.group_buys.insert(record.uuid, record.clone());

        Ok(record)
    }

    async fn get_by_id(&self, uuid: GroupBuyUuid) -> Result<GroupBuyRecord, GroupBuyStoreError> {
        self.state
            .read()
            .await
            .group_buys
            .get(&uuid)
            .cloned()
            .ok_or(GroupBuyStoreError::NotFound)
    }

    async fn get_by_link(
        &self,
        link: &UniqueLink,
    ) -> Result<GroupBuyRecord, GroupBuyStoreError> {
        let state = self.state.read().await;

        state
            .links
            .get(link)
            .and_then(|uuid| state.group_buys.get(uuid))
            .cloned()
            .ok_or(GroupBuyStoreError::NotFound)
    }

    async fn add_participant(
        &self,
        uuid: GroupBuyUuid,
        participant: ParticipantKey,
        now: Timestamp,
    ) -> Result<GroupBuyRecord, GroupBuyStoreError> {
        let mut state = self.state.write().await;

        let record = state
            .group_buys
            .get_mut(&uuid)
            .ok_or(GroupBuyStoreError::NotFound)?;

        if record.has_participant(&participant) {
            return Err(GroupBuyStoreError::AlreadyJoined);
        }

        if now > record.end_date {
            return Err(GroupBuyStoreError::Expired);
        }

        if record.goal_met() {
            return Err(GroupBuyStoreError::Full);
        }

        record.participants.push(participant);
        record.current_participants += 1;
        record.updated_at = now;

        Ok(record.clone())
    }

    async fn list_expiring_before(
        &self,
        before: Timestamp,
    ) -> Result<Vec<GroupBuyRecord>, GroupBuyStoreError> {
        let mut expiring: Vec<GroupBuyRecord> = self
            .state
            .read()
            .await
            .group_buys
            .values()
            .filter(|record| record.end_date < before)
            .cloned()
            .collect();

        expiring.sort_by(|a, b| a.end_date.cmp(&b.end_date).then(a.uuid.cmp(&b.uuid)));

        Ok(expiring)
    }
}
