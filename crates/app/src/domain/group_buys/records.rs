//! Group Buy Records

use jiff::Timestamp;

use crate::{
    auth::ParticipantKey,
    domain::{group_buys::links::UniqueLink, products::records::ProductUuid},
    uuids::TypedUuid,
};

/// Group Buy UUID
pub type GroupBuyUuid = TypedUuid<GroupBuyRecord>;

/// Group Buy Record
///
/// `current_participants` always equals `participants.len()`; the store is the
/// only writer of either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBuyRecord {
    pub uuid: GroupBuyUuid,
    pub product_uuid: ProductUuid,
    pub discount_percentage: u8,
    pub min_participants: u32,
    pub current_participants: u32,
    pub end_date: Timestamp,
    pub unique_link: UniqueLink,
    /// Participants in join order; the initiator comes first.
    pub participants: Vec<ParticipantKey>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GroupBuyRecord {
    #[must_use]
    pub fn has_participant(&self, participant: &ParticipantKey) -> bool {
        self.participants.contains(participant)
    }

    /// Whether the participant threshold has been met.
    #[must_use]
    pub fn goal_met(&self) -> bool {
        self.current_participants >= self.min_participants
    }
}
