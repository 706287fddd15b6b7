mod settings;
mod webhooks;

pub use settings::{
    ServerConfig, Settings, SettingsError, TelegramConfig, DEFAULT_CONFIG_FILE, HEALTH_PATH,
};
pub use webhooks::{
    Rule, RuleKind, Template, TriggerRule, VerificationRule, WebhookDefinition, DEFAULT_FORM_KEY,
    WEBHOOK_ROUTE_PREFIX,
};
