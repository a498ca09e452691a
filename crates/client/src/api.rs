//! HTTP access to the group buy API.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    errors::ClientError,
    models::{
        CreatedGroupBuy, DiscountApplied, DiscountTarget, ErrorEnvelope, GroupBuyView,
        JoinedGroupBuy, NewGroupBuy,
    },
};

/// Bearer credential for one shopper's requests.
///
/// Passed into every call, so one process can act for many shoppers.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[automock]
#[async_trait]
pub trait GroupBuyApi: Send + Sync {
    async fn create(
        &self,
        credential: &Credential,
        group_buy: &NewGroupBuy,
    ) -> Result<CreatedGroupBuy, ClientError>;

    async fn get(&self, credential: &Credential, link: &str)
    -> Result<GroupBuyView, ClientError>;

    async fn join(&self, credential: &Credential, link: &str)
    -> Result<JoinedGroupBuy, ClientError>;

    async fn apply_discount(
        &self,
        credential: &Credential,
        cart_line: Uuid,
        target: &DiscountTarget,
    ) -> Result<DiscountApplied, ClientError>;
}

/// [`GroupBuyApi`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGroupBuyApi {
    base_url: String,
    http: Client,
}

impl HttpGroupBuyApi {
    /// `base_url` is the prefix the `/groupbuy` routes hang off.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    #[must_use]
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/groupbuy{path}", self.base_url)
    }
}

/// Links are echoed into URL paths, so only the issued alphabet is allowed.
fn checked_link(link: &str) -> Result<&str, ClientError> {
    if link.is_empty()
        || !link
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(ClientError::InvalidLink(link.to_string()));
    }

    Ok(link)
}

async fn send<T: DeserializeOwned>(
    request: RequestBuilder,
    credential: &Credential,
) -> Result<T, ClientError> {
    let response = request
        .header(reqwest::header::AUTHORIZATION, credential.header_value())
        .send()
        .await?;

    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();

    Err(decode_error(status, &body))
}

fn decode_error(status: StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ClientError::Api {
            status: status.as_u16(),
            message: envelope.message,
        },
        Err(_not_an_envelope) => ClientError::UnexpectedResponse {
            status: status.as_u16(),
            body: body.to_string(),
        },
    }
}

#[async_trait]
impl GroupBuyApi for HttpGroupBuyApi {
    async fn create(
        &self,
        credential: &Credential,
        group_buy: &NewGroupBuy,
    ) -> Result<CreatedGroupBuy, ClientError> {
        send(self.http.post(self.url("")).json(group_buy), credential).await
    }

    async fn get(
        &self,
        credential: &Credential,
        link: &str,
    ) -> Result<GroupBuyView, ClientError> {
        let path = format!("/{}", checked_link(link)?);

        send(self.http.get(self.url(&path)), credential).await
    }

    async fn join(
        &self,
        credential: &Credential,
        link: &str,
    ) -> Result<JoinedGroupBuy, ClientError> {
        let path = format!("/join/{}", checked_link(link)?);

        send(self.http.post(self.url(&path)), credential).await
    }

    async fn apply_discount(
        &self,
        credential: &Credential,
        cart_line: Uuid,
        target: &DiscountTarget,
    ) -> Result<DiscountApplied, ClientError> {
        if let DiscountTarget::UniqueLink(link) = target {
            checked_link(link)?;
        }

        let path = format!("/apply-discount/{cart_line}");

        send(self.http.post(self.url(&path)).json(target), credential).await
    }
}
