//! Group Buy Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use groupbuy_app::domain::group_buys::{models::GroupBuy, status::GroupBuyStatus};

pub(crate) const SUCCESS_STATUS: &str = "success";

/// Group Buy Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct GroupBuyResponse {
    /// Internal campaign id
    pub id: Uuid,

    /// Product the discount applies to
    pub product_id: Uuid,

    /// Whole percent off, 1 to 99
    pub discount_percentage: u8,

    /// Participants needed to unlock the discount
    pub min_participants: u32,

    /// Participants so far, initiator included
    pub current_participants: u32,

    /// RFC 3339 end of the joining window
    pub end_date: String,

    /// Shareable link token
    pub unique_link: String,

    /// `active`, `successful` or `expired`, derived at request time
    pub status: String,

    /// True while the campaign accepts participants
    pub is_active: bool,

    pub created_at: String,

    pub updated_at: String,
}

impl From<GroupBuy> for GroupBuyResponse {
    fn from(group_buy: GroupBuy) -> Self {
        GroupBuyResponse {
            id: group_buy.uuid.into(),
            product_id: group_buy.product_uuid.into(),
            discount_percentage: group_buy.discount_percentage,
            min_participants: group_buy.min_participants,
            current_participants: group_buy.current_participants,
            end_date: group_buy.end_date.to_string(),
            unique_link: group_buy.unique_link.to_string(),
            status: group_buy.status.to_string(),
            is_active: group_buy.status == GroupBuyStatus::Active,
            created_at: group_buy.created_at.to_string(),
            updated_at: group_buy.updated_at.to_string(),
        }
    }
}
