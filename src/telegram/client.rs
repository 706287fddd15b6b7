//! Outbound Telegram Bot API client

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::TelegramConfig;

use super::types::{ApiResponse, OutgoingMessage, SendMessageRequest, SetWebhookRequest};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum TelegramError {
    /// Transport failure; the request URL (which embeds the token) is stripped
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Telegram API error (status {status}): {description}")]
    Api { status: u16, description: String },
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        TelegramError::Http(e.without_url())
    }
}

/// Delivers rendered messages to a chat.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, message: OutgoingMessage) -> Result<(), TelegramError>;
}

#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    async fn call<P: Serialize + ?Sized>(&self, method: &str, params: &P) -> Result<(), TelegramError> {
        let response = self
            .http
            .post(self.method_url(method))
            .json(params)
            .send()
            .await?;

        let status = response.status();
        let body: ApiResponse = response.json().await?;

        if !status.is_success() || !body.ok {
            return Err(TelegramError::Api {
                status: status.as_u16(),
                description: body.description.unwrap_or_default(),
            });
        }

        Ok(())
    }

    /// Register `url` as the bot's update webhook.
    pub async fn set_webhook(&self, url: &str) -> Result<(), TelegramError> {
        self.call("setWebhook", &SetWebhookRequest { url }).await?;
        tracing::info!(url = %url, "Bot webhook registered");
        Ok(())
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    #[tracing::instrument(
        name = "telegram.send_message",
        skip(self, message),
        fields(chat_id = message.chat_id, parse_mode = %message.parse_mode)
    )]
    async fn send_message(&self, message: OutgoingMessage) -> Result<(), TelegramError> {
        let request = SendMessageRequest {
            chat_id: message.chat_id,
            text: &message.text,
            parse_mode: message.parse_mode.as_api_str(),
        };
        self.call("sendMessage", &request).await
    }
}
