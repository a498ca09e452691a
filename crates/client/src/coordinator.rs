//! Shopper-side coordination of one group buy session.
//!
//! Calls are made with the coordinator's credential and are never retried
//! automatically. Campaign views the coordinator sees are remembered until
//! they are consumed at checkout. Only settled views are trusted without
//! asking the API again.

use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use tokio::{
    sync::{RwLock, watch},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    api::{Credential, GroupBuyApi},
    errors::ClientError,
    models::{
        CreatedGroupBuy, DiscountApplied, DiscountTarget, GroupBuyStatus, GroupBuyView,
        JoinedGroupBuy, NewGroupBuy,
    },
};

/// Delay between polls of a watched campaign.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Remembered views beyond which settled campaigns are forgotten.
pub const MAX_OBSERVATIONS: usize = 256;

type Observations = Arc<RwLock<HashMap<String, GroupBuyView>>>;

pub struct Coordinator {
    api: Arc<dyn GroupBuyApi>,
    credential: Credential,
    poll_interval: Duration,
    observations: Observations,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("credential", &self.credential)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    #[must_use]
    pub fn new(api: Arc<dyn GroupBuyApi>, credential: Credential) -> Self {
        Self {
            api,
            credential,
            poll_interval: DEFAULT_POLL_INTERVAL,
            observations: Arc::default(),
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Start a campaign as its first participant.
    ///
    /// # Errors
    ///
    /// Returns the API or transport error unchanged.
    pub async fn create(&self, group_buy: NewGroupBuy) -> Result<CreatedGroupBuy, ClientError> {
        let created = self.api.create(&self.credential, &group_buy).await?;

        info!(link = %created.unique_link, "group buy created");

        observe(&self.observations, created.group_buy.clone()).await;

        Ok(created)
    }

    /// Fetch the current view of a campaign.
    ///
    /// # Errors
    ///
    /// Returns the API or transport error unchanged.
    pub async fn get(&self, link: &str) -> Result<GroupBuyView, ClientError> {
        let view = self.api.get(&self.credential, link).await?;

        observe(&self.observations, view.clone()).await;

        Ok(view)
    }

    /// Join the campaign behind `link`.
    ///
    /// # Errors
    ///
    /// Returns the API or transport error unchanged.
    pub async fn join(&self, link: &str) -> Result<JoinedGroupBuy, ClientError> {
        let joined = self.api.join(&self.credential, link).await?;

        if joined.goal_reached {
            info!(link, "group buy goal reached");
        }

        observe(&self.observations, joined.group_buy.clone()).await;

        Ok(joined)
    }

    /// Price a cart line against a campaign.
    ///
    /// # Errors
    ///
    /// Returns the API or transport error unchanged.
    pub async fn apply_discount(
        &self,
        cart_line: Uuid,
        target: DiscountTarget,
    ) -> Result<DiscountApplied, ClientError> {
        self.api
            .apply_discount(&self.credential, cart_line, &target)
            .await
    }

    /// Most recent view of `link` seen through this coordinator.
    pub async fn latest(&self, link: &str) -> Option<GroupBuyView> {
        self.observations.read().await.get(link).cloned()
    }

    /// Drop the remembered view of `link`.
    pub async fn forget(&self, link: &str) -> Option<GroupBuyView> {
        self.observations.write().await.remove(link)
    }

    /// Poll `link` until the campaign settles.
    ///
    /// Every view and every failed poll is published on the returned handle.
    /// Polling stops once the campaign is terminal, after an error that a
    /// retry cannot fix, or when the handle is cancelled or dropped.
    #[must_use]
    pub fn watch(&self, link: &str) -> PollHandle {
        let (sender, receiver) = watch::channel(None);

        let task = tokio::spawn(poll(
            Arc::clone(&self.api),
            self.credential.clone(),
            link.to_string(),
            self.poll_interval,
            Arc::clone(&self.observations),
            sender,
        ));

        PollHandle {
            receiver,
            task: Some(task),
        }
    }

    /// Apply the discount at checkout if the campaign has succeeded.
    ///
    /// A settled observation decides on its own. Anything else is fetched
    /// again first, since other shoppers may have joined in the meantime.
    /// The remembered view is forgotten once it has been consumed here.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotEligible`] unless the campaign is successful,
    /// otherwise the API or transport error unchanged.
    pub async fn checkout_discount(
        &self,
        cart_line: Uuid,
        link: &str,
    ) -> Result<DiscountApplied, ClientError> {
        let view = match self.latest(link).await {
            Some(view) if view.status.is_terminal() => view,
            _ => self.get(link).await?,
        };

        if view.status != GroupBuyStatus::Successful {
            if view.status.is_terminal() {
                self.forget(link).await;
            }

            return Err(ClientError::NotEligible(format!(
                "group buy is {}",
                view.status
            )));
        }

        let applied = self
            .apply_discount(cart_line, DiscountTarget::UniqueLink(link.to_string()))
            .await?;

        self.forget(link).await;

        Ok(applied)
    }
}

async fn observe(observations: &Observations, view: GroupBuyView) {
    let mut observations = observations.write().await;

    if observations.len() >= MAX_OBSERVATIONS && !observations.contains_key(&view.unique_link) {
        observations.retain(|_, seen| !seen.status.is_terminal());
    }

    observations.insert(view.unique_link.clone(), view);
}

/// One outcome of a watched campaign's poll.
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// The campaign as the API reported it.
    Updated(GroupBuyView),

    /// The poll failed. Polling continues only if the error is retryable.
    Failed(Arc<ClientError>),
}

impl PollEvent {
    /// The reported campaign, unless this poll failed.
    #[must_use]
    pub fn view(&self) -> Option<&GroupBuyView> {
        match self {
            Self::Updated(view) => Some(view),
            Self::Failed(_) => None,
        }
    }
}

async fn poll(
    api: Arc<dyn GroupBuyApi>,
    credential: Credential,
    link: String,
    period: Duration,
    observations: Observations,
    sender: watch::Sender<Option<PollEvent>>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let view = match api.get(&credential, &link).await {
            Ok(view) => view,
            Err(error) => {
                let retryable = error.is_retryable();

                warn!(link = %link, %error, retryable, "group buy poll failed");

                let unwatched = sender.send(Some(PollEvent::Failed(Arc::new(error)))).is_err();

                if unwatched || !retryable {
                    debug!(link = %link, "polling stopped after failure");
                    return;
                }

                continue;
            }
        };

        let status = view.status;

        observe(&observations, view.clone()).await;

        if sender.send(Some(PollEvent::Updated(view))).is_err() {
            debug!(link = %link, "no watchers left, polling stopped");
            return;
        }

        if status.is_terminal() {
            debug!(link = %link, %status, "group buy settled, polling stopped");
            return;
        }
    }
}

/// Live view of a watched campaign. Dropping it stops the poller.
#[derive(Debug)]
pub struct PollHandle {
    receiver: watch::Receiver<Option<PollEvent>>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Latest published event, if any poll has completed yet.
    #[must_use]
    pub fn latest(&self) -> Option<PollEvent> {
        self.receiver.borrow().clone()
    }

    /// Another receiver of the same events.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<PollEvent>> {
        self.receiver.clone()
    }

    /// Wait for the next published event.
    ///
    /// Returns `None` once polling has stopped and nothing newer will arrive.
    pub async fn changed(&mut self) -> Option<PollEvent> {
        self.receiver.changed().await.ok()?;

        self.receiver.borrow_and_update().clone()
    }

    /// True once the poller has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop polling now.
    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
