//! Telegram Bot API wire types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Text formatting dialect understood by `sendMessage`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ParseMode {
    /// No markup; the `parse_mode` field is omitted.
    #[default]
    Plain,
    Markdown,
    MarkdownV2,
    Html,
}

impl ParseMode {
    /// Value for the Bot API `parse_mode` field, `None` for plain text.
    pub fn as_api_str(self) -> Option<&'static str> {
        match self {
            ParseMode::Plain => None,
            ParseMode::Markdown => Some("Markdown"),
            ParseMode::MarkdownV2 => Some("MarkdownV2"),
            ParseMode::Html => Some("HTML"),
        }
    }
}

impl TryFrom<String> for ParseMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "" | "none" => Ok(ParseMode::Plain),
            "Markdown" => Ok(ParseMode::Markdown),
            "MarkdownV2" => Ok(ParseMode::MarkdownV2),
            "HTML" => Ok(ParseMode::Html),
            other => Err(format!(
                "unsupported parse mode {other:?} (expected Markdown, MarkdownV2 or HTML)"
            )),
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str().unwrap_or("none"))
    }
}

/// A message ready to be handed to a [`MessageSender`](super::MessageSender).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: ParseMode,
}

/// Body of a `sendMessage` call
#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

/// Body of a `setWebhook` call
#[derive(Debug, Serialize)]
pub(crate) struct SetWebhookRequest<'a> {
    pub url: &'a str,
}

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Incoming update pushed to the bot webhook
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_from_config_names() {
        assert_eq!(ParseMode::try_from("HTML".to_string()), Ok(ParseMode::Html));
        assert_eq!(
            ParseMode::try_from("MarkdownV2".to_string()),
            Ok(ParseMode::MarkdownV2)
        );
        assert_eq!(ParseMode::try_from(String::new()), Ok(ParseMode::Plain));
        assert!(ParseMode::try_from("html5".to_string()).is_err());
    }

    #[test]
    fn test_plain_mode_omits_parse_mode_field() {
        let body = SendMessageRequest {
            chat_id: 42,
            text: "hi",
            parse_mode: ParseMode::Plain.as_api_str(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "chat_id": 42, "text": "hi" }));
    }

    #[test]
    fn test_update_deserialize() {
        let update: Update = serde_json::from_value(serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 7,
                "chat": { "id": -100123, "type": "group" },
                "text": "/id"
            }
        }))
        .unwrap();

        let message = update.message.unwrap();
        assert_eq!(message.chat.id, -100123);
        assert_eq!(message.text.as_deref(), Some("/id"));
    }
}
