use std::sync::Arc;

use crate::config::{Settings, SettingsError};
use crate::telegram::MessageSender;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub sender: Arc<dyn MessageSender>,
    /// Destination for webhooks without their own `telegramChatID`
    pub default_chat_id: i64,
}

impl AppState {
    pub fn new(settings: Settings, sender: Arc<dyn MessageSender>) -> Result<Self, SettingsError> {
        let default_chat_id = settings.default_chat_id()?;

        Ok(Self {
            settings: Arc::new(settings),
            sender,
            default_chat_id,
        })
    }
}
