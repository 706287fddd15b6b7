use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::telegram::TelegramError;
use crate::webhook::{RenderError, SelectError};

/// Terminal outcome of a webhook request that did not deliver a message.
///
/// Callers only ever see the status code; the detail goes to the log.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(Method),

    #[error("Unsupported content type: {0:?}")]
    UnsupportedContentType(String),

    #[error("Malformed form body: {0}")]
    MalformedForm(String),

    #[error("Unreadable request body: {0}")]
    UnreadableBody(String),

    #[error("Malformed JSON payload: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Verification failed")]
    VerificationFailed,

    #[error("Template selection failed: {0}")]
    Select(#[from] SelectError),

    #[error("No matching template")]
    NoTemplate,

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Cannot send telegram message: {0}")]
    Send(#[from] TelegramError),
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::UnsupportedContentType(_) | DispatchError::VerificationFailed => {
                StatusCode::NOT_ACCEPTABLE
            }
            DispatchError::MalformedForm(_)
            | DispatchError::UnreadableBody(_)
            | DispatchError::MalformedJson(_) => StatusCode::BAD_REQUEST,
            DispatchError::Select(_)
            | DispatchError::NoTemplate
            | DispatchError::Render(_)
            | DispatchError::Send(_) => StatusCode::NO_CONTENT,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            DispatchError::NoTemplate => {
                tracing::info!(status = %status.as_u16(), "No matching template, nothing sent");
            }
            DispatchError::Send(e) => {
                tracing::error!(status = %status.as_u16(), error = %e, "Webhook delivery failed");
            }
            _ => {
                tracing::warn!(status = %status.as_u16(), error = %self, "Webhook rejected");
            }
        }

        status.into_response()
    }
}
