//! Telegram integration: the outbound Bot API client and the bot's own
//! update handler.

mod bot;
mod client;
mod types;

pub use bot::{handle_update, ID_COMMAND};
pub use client::{MessageSender, TelegramClient, TelegramError};
pub use types::{Chat, Message, OutgoingMessage, ParseMode, Update};
