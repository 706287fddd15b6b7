use std::collections::HashSet;
use std::env;

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use super::webhooks::{WebhookDefinition, WEBHOOK_ROUTE_PREFIX};

/// Config file read when `CONFIG_FILE` is not set
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Path of the liveness endpoint, reserved against bot and webhook routes
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Required telegram botToken is missing")]
    MissingBotToken,

    #[error("Required telegram chatID is missing")]
    MissingChatId,

    #[error("Webhook {webhook:?} has an invalid pattern {pattern:?}")]
    InvalidPattern { webhook: String, pattern: String },

    #[error("Webhook pattern {0:?} is used more than once")]
    DuplicatePattern(String),

    #[error("Invalid telegram webhookURL {url:?}: {reason}")]
    InvalidWebhookUrl { url: String, reason: String },

    #[error("Bot update path {0:?} collides with another route")]
    RouteConflict(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub webhooks: Vec<WebhookDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds in-flight requests may take to finish after a shutdown signal
    #[serde(
        default = "default_shutdown_timeout",
        rename = "shutdownTimeout",
        alias = "shutdowntimeout",
        alias = "shutdown_timeout"
    )]
    pub shutdown_timeout: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    #[serde(default, rename = "botToken", alias = "bottoken")]
    pub bot_token: String,

    /// Default destination for every webhook without its own chat
    #[serde(default, rename = "chatID", alias = "chatid")]
    pub chat_id: Option<i64>,

    /// Public URL Telegram pushes bot updates to
    #[serde(default, rename = "webhookURL", alias = "webhookurl")]
    pub webhook_url: Option<String>,

    #[serde(default = "default_api_url", rename = "apiURL", alias = "apiurl")]
    pub api_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout() -> u64 {
    10 // seconds
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

impl Settings {
    /// Load settings from `config.yml` (or `CONFIG_FILE`), the environment
    /// and `.env`.
    pub fn new() -> Result<Self, SettingsError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let path = env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());

        let mut builder = Self::defaults()?
            .add_source(File::with_name(&path).format(FileFormat::Yaml))
            // APP__SERVER__PORT, APP__TELEGRAM__CHATID, etc.
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(token) = env::var("BOT_TOKEN") {
            if !token.is_empty() {
                builder = builder.set_override("telegram.botToken", token)?;
            }
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Build settings from an in-memory YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Settings = Self::defaults()?
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("server.shutdownTimeout", default_shutdown_timeout())?
            .set_default("telegram.apiURL", default_api_url())
    }

    /// Check the invariants the request path relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(SettingsError::MissingBotToken);
        }
        if self.telegram.chat_id.is_none() {
            return Err(SettingsError::MissingChatId);
        }

        let mut patterns = HashSet::new();
        for webhook in &self.webhooks {
            let pattern = webhook.pattern.as_str();
            if pattern.is_empty() || pattern.starts_with('/') || has_route_syntax(pattern) {
                return Err(SettingsError::InvalidPattern {
                    webhook: webhook.name.clone(),
                    pattern: pattern.to_string(),
                });
            }
            if !patterns.insert(pattern) {
                return Err(SettingsError::DuplicatePattern(pattern.to_string()));
            }
        }

        if let Some(path) = self.bot_update_path()? {
            let webhook_prefix = format!("{}/", WEBHOOK_ROUTE_PREFIX);
            if path == HEALTH_PATH
                || path.starts_with(&webhook_prefix)
                || has_route_syntax(&path)
            {
                return Err(SettingsError::RouteConflict(path));
            }
        }

        Ok(())
    }

    /// Default destination chat.
    pub fn default_chat_id(&self) -> Result<i64, SettingsError> {
        self.telegram.chat_id.ok_or(SettingsError::MissingChatId)
    }

    /// Local path bot updates arrive on, taken from `telegram.webhookURL`.
    pub fn bot_update_path(&self) -> Result<Option<String>, SettingsError> {
        let Some(url) = self.telegram.webhook_url.as_deref().filter(|u| !u.is_empty()) else {
            return Ok(None);
        };
        let parsed = reqwest::Url::parse(url).map_err(|e| SettingsError::InvalidWebhookUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(parsed.path().to_string()))
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Captures, wildcards and `:` segments are router syntax, not literal paths.
fn has_route_syntax(path: &str) -> bool {
    path.contains(|c: char| matches!(c, '{' | '}' | '*'))
        || path.split('/').any(|segment| segment.starts_with(':'))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}
