//! Group Buy Stores
//!
//! Durable campaign storage keyed by both internal id and shareable link. The
//! participant set is owned here and only grows through
//! [`GroupBuyStore::add_participant`], which is atomic per campaign.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    auth::ParticipantKey,
    domain::group_buys::{
        data::NewGroupBuyRecord,
        errors::GroupBuyStoreError,
        links::UniqueLink,
        records::{GroupBuyRecord, GroupBuyUuid},
    },
};

mod memory;
mod pg;

pub use memory::MemoryGroupBuyStore;
pub use pg::PgGroupBuyStore;

#[automock]
#[async_trait]
pub trait GroupBuyStore: Send + Sync {
    /// Insert a campaign with its initiator as the first participant.
    ///
    /// Fails with [`GroupBuyStoreError::Conflict`] when the link is taken.
    async fn create(&self, group_buy: NewGroupBuyRecord)
    -> Result<GroupBuyRecord, GroupBuyStoreError>;

    /// Retrieve a campaign by internal id.
    async fn get_by_id(&self, uuid: GroupBuyUuid) -> Result<GroupBuyRecord, GroupBuyStoreError>;

    /// Retrieve a campaign by shareable link.
    async fn get_by_link(&self, link: &UniqueLink)
    -> Result<GroupBuyRecord, GroupBuyStoreError>;

    /// Atomically check and append a participant.
    ///
    /// Checks run in order: unknown campaign, duplicate participant, end date
    /// passed at `now`, threshold already met. A participant retrying a join
    /// therefore always sees [`GroupBuyStoreError::AlreadyJoined`].
    async fn add_participant(
        &self,
        uuid: GroupBuyUuid,
        participant: ParticipantKey,
        now: Timestamp,
    ) -> Result<GroupBuyRecord, GroupBuyStoreError>;

    /// Campaigns whose end date is strictly before `before`, earliest first.
    async fn list_expiring_before(
        &self,
        before: Timestamp,
    ) -> Result<Vec<GroupBuyRecord>, GroupBuyStoreError>;
}
