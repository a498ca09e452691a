//! Group buys service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info, warn};

use crate::{
    auth::ParticipantKey,
    domain::{
        carts::{CartLinesService, records::CartLineUuid},
        group_buys::{
            data::{NewGroupBuy, NewGroupBuyRecord},
            errors::{GroupBuyStoreError, GroupBuysServiceError, ValidationErrors},
            links::{LinkGenerator, UniqueLink},
            models::{AppliedDiscount, CampaignHandle, GroupBuy, JoinedGroupBuy},
            pricing::discounted_price,
            records::{GroupBuyRecord, GroupBuyUuid},
            status::GroupBuyStatus,
            store::GroupBuyStore,
        },
    },
};

/// How many fresh links are tried before creation gives up.
pub const MAX_LINK_ATTEMPTS: usize = 5;

const MIN_DISCOUNT_PERCENTAGE: i64 = 1;
const MAX_DISCOUNT_PERCENTAGE: i64 = 99;
const MIN_PARTICIPANTS: i64 = 2;

/// Group buy operations backed by a [`GroupBuyStore`].
#[derive(Clone)]
pub struct StoreGroupBuysService {
    store: Arc<dyn GroupBuyStore>,
    links: Arc<dyn LinkGenerator>,
    carts: Arc<dyn CartLinesService>,
}

impl StoreGroupBuysService {
    #[must_use]
    pub fn new(
        store: Arc<dyn GroupBuyStore>,
        links: Arc<dyn LinkGenerator>,
        carts: Arc<dyn CartLinesService>,
    ) -> Self {
        Self {
            store,
            links,
            carts,
        }
    }

    async fn find(&self, handle: &CampaignHandle) -> Result<GroupBuyRecord, GroupBuyStoreError> {
        match handle {
            CampaignHandle::Id(uuid) => self.store.get_by_id(*uuid).await,
            CampaignHandle::Link(link) => self.store.get_by_link(link).await,
        }
    }
}

impl std::fmt::Debug for StoreGroupBuysService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreGroupBuysService").finish_non_exhaustive()
    }
}

/// Check every field of a new campaign, collecting all violations.
fn validate(group_buy: &NewGroupBuy, now: Timestamp) -> Result<(u8, u32), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let discount_percentage = u8::try_from(group_buy.discount_percentage)
        .ok()
        .filter(|_| {
            (MIN_DISCOUNT_PERCENTAGE..=MAX_DISCOUNT_PERCENTAGE)
                .contains(&group_buy.discount_percentage)
        });

    if discount_percentage.is_none() {
        errors.add(
            "discount_percentage",
            format!("must be between {MIN_DISCOUNT_PERCENTAGE} and {MAX_DISCOUNT_PERCENTAGE}"),
        );
    }

    let min_participants = if group_buy.min_participants < MIN_PARTICIPANTS {
        errors.add(
            "min_participants",
            format!("must be at least {MIN_PARTICIPANTS}"),
        );

        None
    } else {
        let value = u32::try_from(group_buy.min_participants)
            .ok()
            .filter(|value| i32::try_from(*value).is_ok());

        if value.is_none() {
            errors.add("min_participants", "is too large");
        }

        value
    };

    if group_buy.end_date <= now {
        errors.add("end_date", "must be in the future");
    }

    match (discount_percentage, min_participants) {
        (Some(discount_percentage), Some(min_participants)) if errors.is_empty() => {
            Ok((discount_percentage, min_participants))
        }
        _ => Err(errors),
    }
}

#[async_trait]
impl GroupBuysService for StoreGroupBuysService {
    async fn create_group_buy(
        &self,
        initiator: ParticipantKey,
        group_buy: NewGroupBuy,
        now: Timestamp,
    ) -> Result<GroupBuy, GroupBuysServiceError> {
        let (discount_percentage, min_participants) =
            validate(&group_buy, now).map_err(GroupBuysServiceError::Validation)?;

        let uuid = GroupBuyUuid::new();

        for attempt in 1..=MAX_LINK_ATTEMPTS {
            let record = NewGroupBuyRecord {
                uuid,
                product_uuid: group_buy.product_uuid,
                discount_percentage,
                min_participants,
                end_date: group_buy.end_date,
                unique_link: self.links.generate(),
                initiator: initiator.clone(),
            };

            match self.store.create(record).await {
                Ok(created) => {
                    info!(
                        group_buy_uuid = %created.uuid,
                        product_uuid = %created.product_uuid,
                        "created group buy"
                    );

                    return Ok(GroupBuy::at(created, now));
                }
                Err(GroupBuyStoreError::Conflict) => {
                    warn!(attempt, "group buy link collided, generating another");
                }
                Err(error) => return Err(error.into()),
            }
        }

        Err(GroupBuysServiceError::LinkExhausted)
    }

    async fn get_group_buy(
        &self,
        link: &str,
        now: Timestamp,
    ) -> Result<GroupBuy, GroupBuysServiceError> {
        let link = UniqueLink::parse(link).map_err(|_malformed| GroupBuysServiceError::NotFound)?;

        let record = self.store.get_by_link(&link).await?;

        Ok(GroupBuy::at(record, now))
    }

    async fn join_group_buy(
        &self,
        link: &str,
        participant: ParticipantKey,
        now: Timestamp,
    ) -> Result<JoinedGroupBuy, GroupBuysServiceError> {
        let link = UniqueLink::parse(link).map_err(|_malformed| GroupBuysServiceError::NotFound)?;

        let campaign = self.store.get_by_link(&link).await?;

        let updated = self
            .store
            .add_participant(campaign.uuid, participant, now)
            .await?;

        // The store refuses joins once the threshold is met, so only the join
        // that lands exactly on it moves the campaign to successful.
        let goal_reached = updated.current_participants == updated.min_participants;

        debug!(
            group_buy_uuid = %updated.uuid,
            current_participants = updated.current_participants,
            "participant joined group buy"
        );

        if goal_reached {
            info!(
                group_buy_uuid = %updated.uuid,
                min_participants = updated.min_participants,
                "group_buy.goal_reached"
            );
        }

        Ok(JoinedGroupBuy {
            group_buy: GroupBuy::at(updated, now),
            goal_reached,
        })
    }

    async fn apply_discount(
        &self,
        cart_line: CartLineUuid,
        campaign: CampaignHandle,
        now: Timestamp,
    ) -> Result<AppliedDiscount, GroupBuysServiceError> {
        let record = self.find(&campaign).await?;

        match GroupBuyStatus::derive(&record, now) {
            GroupBuyStatus::Successful => {}
            GroupBuyStatus::Active => {
                return Err(GroupBuysServiceError::NotEligible(
                    "group buy has not reached its participant target",
                ));
            }
            GroupBuyStatus::Expired => {
                return Err(GroupBuysServiceError::NotEligible(
                    "group buy ended before reaching its participant target",
                ));
            }
        }

        let line = self.carts.get_cart_line(cart_line).await?;

        if line.product_uuid != record.product_uuid {
            return Err(GroupBuysServiceError::NotEligible(
                "cart line is for a different product",
            ));
        }

        let discounted = discounted_price(line.price, record.discount_percentage)?;

        Ok(AppliedDiscount {
            cart_line,
            group_buy: record.uuid,
            original_price: line.price,
            discounted_price: discounted,
        })
    }

    async fn list_expiring(
        &self,
        before: Timestamp,
        now: Timestamp,
    ) -> Result<Vec<GroupBuy>, GroupBuysServiceError> {
        let records = self.store.list_expiring_before(before).await?;

        Ok(records
            .into_iter()
            .map(|record| GroupBuy::at(record, now))
            .collect())
    }
}

#[automock]
#[async_trait]
pub trait GroupBuysService: Send + Sync {
    /// Start a campaign with `initiator` as its first participant.
    async fn create_group_buy(
        &self,
        initiator: ParticipantKey,
        group_buy: NewGroupBuy,
        now: Timestamp,
    ) -> Result<GroupBuy, GroupBuysServiceError>;

    /// Resolve a shareable link. Malformed links are reported as not found.
    async fn get_group_buy(&self, link: &str, now: Timestamp)
    -> Result<GroupBuy, GroupBuysServiceError>;

    /// Add `participant` to the campaign behind `link`.
    async fn join_group_buy(
        &self,
        link: &str,
        participant: ParticipantKey,
        now: Timestamp,
    ) -> Result<JoinedGroupBuy, GroupBuysServiceError>;

    /// Price a cart line against a successful campaign. Never writes.
    async fn apply_discount(
        &self,
        cart_line: CartLineUuid,
        campaign: CampaignHandle,
        now: Timestamp,
    ) -> Result<AppliedDiscount, GroupBuysServiceError>;

    /// Campaigns ending before `before`, with status derived at `now`.
    async fn list_expiring(
        &self,
        before: Timestamp,
        now: Timestamp,
    ) -> Result<Vec<GroupBuy>, GroupBuysServiceError>;
}
