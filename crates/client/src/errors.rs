//! Client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or undecodable body.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with its error envelope.
    #[error("group buy api returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Non-success response without an error envelope.
    #[error("unexpected response with status {status}: {body}")]
    UnexpectedResponse { status: u16, body: String },

    /// The link could not have been issued by the API.
    #[error("malformed group buy link: {0}")]
    InvalidLink(String),

    /// The discount cannot be applied to the latest observed state.
    #[error("group buy discount is not available: {0}")]
    NotEligible(String),
}

impl ClientError {
    /// HTTP status reported by the API, if the request got that far.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::UnexpectedResponse { status, .. } => Some(*status),
            Self::Http(source) => source.status().map(|status| status.as_u16()),
            Self::InvalidLink(_) | Self::NotEligible(_) => None,
        }
    }

    /// Whether asking again later could succeed.
    ///
    /// Transport failures and server-side errors are worth retrying; any
    /// other answer from the API will not change by itself.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(source) => source.status().is_none_or(|status| status.is_server_error()),
            Self::Api { status, .. } | Self::UnexpectedResponse { status, .. } => *status >= 500,
            Self::InvalidLink(_) | Self::NotEligible(_) => false,
        }
    }
}
