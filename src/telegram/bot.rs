//! Bot update handling.
//!
//! The only command served is `/id`, which tells users the chat ID to put
//! into `config.yml`.

use axum::{body::Bytes, extract::State, http::StatusCode};

use crate::server::AppState;

use super::types::{OutgoingMessage, ParseMode, Update};

pub const ID_COMMAND: &str = "/id";

/// Receive an update pushed by Telegram.
///
/// Always acknowledges decodable updates so Telegram does not redeliver.
pub async fn handle_update(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, "Undecodable bot update");
            return StatusCode::BAD_REQUEST;
        }
    };

    let Some(message) = update.message else {
        return StatusCode::OK;
    };

    if message.text.as_deref().map(str::trim) == Some(ID_COMMAND) {
        let chat_id = message.chat.id;
        let reply = OutgoingMessage {
            chat_id,
            text: format!("Your ChatID is: {chat_id}"),
            parse_mode: ParseMode::Plain,
        };
        match state.sender.send_message(reply).await {
            Ok(()) => tracing::info!(chat_id, update_id = update.update_id, "Answered /id"),
            Err(e) => tracing::warn!(chat_id, error = %e, "Failed to answer /id"),
        }
    }

    StatusCode::OK
}
