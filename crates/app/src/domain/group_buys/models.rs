//! Group Buy Models

use jiff::Timestamp;

use crate::domain::{
    carts::records::CartLineUuid,
    group_buys::{
        links::UniqueLink,
        records::{GroupBuyRecord, GroupBuyUuid},
        status::GroupBuyStatus,
    },
    products::records::ProductUuid,
};

/// Group Buy Model: a campaign as seen at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBuy {
    pub uuid: GroupBuyUuid,
    pub product_uuid: ProductUuid,
    pub discount_percentage: u8,
    pub min_participants: u32,
    pub current_participants: u32,
    pub end_date: Timestamp,
    pub unique_link: UniqueLink,
    pub status: GroupBuyStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GroupBuy {
    /// Project a record with its status derived at `now`.
    #[must_use]
    pub fn at(record: GroupBuyRecord, now: Timestamp) -> Self {
        let status = GroupBuyStatus::derive(&record, now);

        Self {
            uuid: record.uuid,
            product_uuid: record.product_uuid,
            discount_percentage: record.discount_percentage,
            min_participants: record.min_participants,
            current_participants: record.current_participants,
            end_date: record.end_date,
            unique_link: record.unique_link,
            status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedGroupBuy {
    pub group_buy: GroupBuy,

    /// True only for the join that moved the campaign to successful.
    pub goal_reached: bool,
}

/// How a caller refers to a campaign when applying its discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignHandle {
    Id(GroupBuyUuid),
    Link(UniqueLink),
}

/// Prices of a cart line before and after a group buy discount, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedDiscount {
    pub cart_line: CartLineUuid,
    pub group_buy: GroupBuyUuid,
    pub original_price: u64,
    pub discounted_price: u64,
}
