//! Wire models shared with the JSON API.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Campaign lifecycle as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBuyStatus {
    Active,
    Successful,
    Expired,
}

impl GroupBuyStatus {
    /// Terminal campaigns never change again, so watching them is pointless.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for GroupBuyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Successful => "successful",
            Self::Expired => "expired",
        })
    }
}

/// A campaign as observed at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBuyView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub discount_percentage: u8,
    pub min_participants: u32,
    pub current_participants: u32,
    pub end_date: Timestamp,
    pub unique_link: String,
    pub status: GroupBuyStatus,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroupBuy {
    pub product_id: Uuid,
    pub discount_percentage: i64,
    pub min_participants: i64,
    pub end_date: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedGroupBuy {
    pub status: String,
    pub message: String,
    pub group_buy_id: Uuid,
    pub unique_link: String,
    pub group_buy: GroupBuyView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedGroupBuy {
    pub status: String,
    pub message: String,
    pub goal_reached: bool,
    pub group_buy: GroupBuyView,
}

/// How the discount request names its campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTarget {
    GroupBuyId(Uuid),
    UniqueLink(String),
}

/// Prices in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountApplied {
    pub original_price: u64,
    pub discounted_price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn discount_target_names_one_field() -> TestResult {
        let by_link = serde_json::to_value(DiscountTarget::UniqueLink("abc".to_string()))?;
        let by_id = serde_json::to_value(DiscountTarget::GroupBuyId(Uuid::nil()))?;

        assert_eq!(by_link, json!({ "unique_link": "abc" }));
        assert_eq!(by_id, json!({ "group_buy_id": Uuid::nil() }));

        Ok(())
    }

    #[test]
    fn views_decode_api_payloads() -> TestResult {
        let view: GroupBuyView = serde_json::from_value(json!({
            "id": Uuid::nil(),
            "product_id": Uuid::nil(),
            "discount_percentage": 20,
            "min_participants": 3,
            "current_participants": 1,
            "end_date": "2030-01-01T00:00:00Z",
            "unique_link": "AAAAAAAAAAAAAAAAAAAAAA",
            "status": "active",
            "is_active": true,
            "created_at": "2029-12-01T00:00:00Z",
            "updated_at": "2029-12-01T00:00:00Z",
        }))?;

        assert_eq!(view.status, GroupBuyStatus::Active);
        assert!(!view.status.is_terminal());
        assert_eq!(view.end_date, "2030-01-01T00:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }
}
