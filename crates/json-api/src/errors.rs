//! JSON error envelope.
//!
//! Every failure leaves the API as `{"status": "error", "message": "..."}`
//! with the matching HTTP status code.

use salvo::{
    catcher::Catcher,
    http::{ResBody, StatusCode},
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::{FlowCtrl, Json, Response, handler},
    writing::Scribe,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ERROR_STATUS: &str = "error";

/// Error Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorEnvelope {
    /// Always `error`
    pub status: String,

    /// Human readable reason
    pub message: String,
}

/// An HTTP failure rendered as an [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status_code}: {message}")]
pub(crate) struct ApiError {
    pub status_code: StatusCode,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// The message is fixed so storage details never reach callers.
    pub(crate) fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }

    fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            status: ERROR_STATUS.to_string(),
            message: self.message.clone(),
        }
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status_code);
        res.render(Json(self.envelope()));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        for (status_code, description) in [
            (StatusCode::BAD_REQUEST, "Bad Request"),
            (StatusCode::UNAUTHORIZED, "Unauthorized"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        ] {
            operation.responses.insert(
                status_code.as_str(),
                oapi::Response::new(description).add_content(
                    "application/json",
                    oapi::Content::new(ErrorEnvelope::to_schema(components)),
                ),
            );
        }
    }
}

/// Re-render errors salvo produced itself, such as failed extractors and
/// unmatched routes, in the envelope.
#[handler]
async fn envelope_status_errors(res: &mut Response, ctrl: &mut FlowCtrl) {
    let status_code = res
        .status_code
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let brief = match res.take_body() {
        ResBody::Error(error) if !error.brief.is_empty() => Some(error.brief),
        _ => None,
    };

    let message = brief
        .or_else(|| status_code.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| status_code.to_string());

    res.render(ApiError::new(status_code, message));
    ctrl.skip_rest();
}

/// Catcher that answers every uncaught error with an [`ErrorEnvelope`].
pub(crate) fn catcher() -> Catcher {
    Catcher::default().hoop(envelope_status_errors)
}
