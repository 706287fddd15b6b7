//! Per-request orchestration of the webhook pipeline.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::WebhookDefinition;
use crate::error::DispatchError;
use crate::server::AppState;
use crate::telegram::OutgoingMessage;

use super::body::decode_body;
use super::escape::escape;
use super::extract::Message;
use super::render::render;
use super::select::select_template;
use super::verify::is_valid;

/// Route handler for one webhook definition.
pub async fn handle_webhook(
    state: AppState,
    definition: Arc<WebhookDefinition>,
    request: Request,
) -> Response {
    let span = tracing::info_span!(
        "webhook",
        webhook = %definition.name,
        request_id = %Uuid::new_v4()
    );

    async move {
        match dispatch(&state, &definition, request).await {
            Ok(()) => {
                tracing::info!("Webhook message sent");
                StatusCode::OK.into_response()
            }
            Err(e) => e.into_response(),
        }
    }
    .instrument(span)
    .await
}

/// Run one request through the pipeline and send the resulting message.
pub async fn dispatch(
    state: &AppState,
    definition: &WebhookDefinition,
    request: Request,
) -> Result<(), DispatchError> {
    if *request.method() != Method::POST {
        return Err(DispatchError::MethodNotAllowed(request.method().clone()));
    }

    let headers = request.headers().clone();
    let data = decode_body(definition.form_key(), request).await?;
    tracing::debug!(payload = %data, "Received webhook payload");

    let message: Message = serde_json::from_str(&data)?;

    if !is_valid(&definition.verification, &headers, &message) {
        return Err(DispatchError::VerificationFailed);
    }

    let template = select_template(&definition.templates, &headers, &message)?
        .ok_or(DispatchError::NoTemplate)?;

    let text = render(template, &message, &headers)?;

    if let Some(mode) = definition.parse_mode.as_api_str() {
        tracing::debug!(parse_mode = %mode, "Sending message with parse mode");
    }

    let outgoing = OutgoingMessage {
        chat_id: definition.telegram_chat_id.unwrap_or(state.default_chat_id),
        text: escape(definition.parse_mode, &text),
        parse_mode: definition.parse_mode,
    };
    state.sender.send_message(outgoing).await?;

    Ok(())
}
