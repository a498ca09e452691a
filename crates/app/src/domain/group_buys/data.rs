//! Group Buy Data

use jiff::Timestamp;

use crate::{
    auth::ParticipantKey,
    domain::{
        group_buys::{links::UniqueLink, records::GroupBuyUuid},
        products::records::ProductUuid,
    },
};

/// New Group Buy Data, as submitted by the initiator.
///
/// Numeric fields are wide on purpose: out-of-range values must reach
/// validation so they can be reported per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroupBuy {
    pub product_uuid: ProductUuid,
    pub discount_percentage: i64,
    pub min_participants: i64,
    pub end_date: Timestamp,
}

/// Validated group buy ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroupBuyRecord {
    pub uuid: GroupBuyUuid,
    pub product_uuid: ProductUuid,
    pub discount_percentage: u8,
    pub min_participants: u32,
    pub end_date: Timestamp,
    pub unique_link: UniqueLink,
    pub initiator: ParticipantKey,
}
