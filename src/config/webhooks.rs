//! Per-webhook configuration: routes, verification, templates and triggers.
//!
//! Field names follow the YAML layout of `config.yml` (`contentType`,
//! `formKey`, `parseMode`, ...). Each one also accepts its lowercased
//! spelling because the `config` crate folds keys to lowercase.

use std::fmt;

use serde::Deserialize;

use crate::telegram::ParseMode;

/// Form field read when a webhook does not configure `formKey`
pub const DEFAULT_FORM_KEY: &str = "payload";

/// Path prefix every webhook route is mounted under
pub const WEBHOOK_ROUTE_PREFIX: &str = "/webhooks";

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookDefinition {
    /// Informational name used in logs
    pub name: String,

    /// Route suffix, mounted as `/webhooks/{pattern}`
    pub pattern: String,

    /// Content type the sender is expected to use (informational)
    #[serde(default, rename = "contentType", alias = "contenttype")]
    pub content_type: Option<String>,

    /// Form field carrying the JSON payload for form-encoded bodies
    #[serde(default, rename = "formKey", alias = "formkey")]
    pub form_key: Option<String>,

    #[serde(default, rename = "parseMode", alias = "parsemode")]
    pub parse_mode: ParseMode,

    /// Overrides the global default chat
    #[serde(default, rename = "telegramChatID", alias = "telegramchatid")]
    pub telegram_chat_id: Option<i64>,

    pub verification: VerificationRule,

    #[serde(default)]
    pub templates: Vec<Template>,
}

impl WebhookDefinition {
    pub fn route_path(&self) -> String {
        format!("{}/{}", WEBHOOK_ROUTE_PREFIX, self.pattern)
    }

    pub fn form_key(&self) -> &str {
        match self.form_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => DEFAULT_FORM_KEY,
        }
    }
}

/// A positional format string and the keys feeding its placeholders
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    pub template: String,

    #[serde(default)]
    pub keys: Vec<String>,

    #[serde(default)]
    pub trigger: Option<TriggerRule>,
}

/// Where a rule looks up its value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RuleKind {
    None,
    Header,
    Message,
    /// Kept verbatim so the request path can report it
    Unknown(String),
}

impl RuleKind {
    pub fn as_str(&self) -> &str {
        match self {
            RuleKind::None => "none",
            RuleKind::Header => "header",
            RuleKind::Message => "message",
            RuleKind::Unknown(kind) => kind,
        }
    }
}

impl From<String> for RuleKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "none" => RuleKind::None,
            "header" => RuleKind::Header,
            "message" | "message-field" => RuleKind::Message,
            _ => RuleKind::Unknown(value),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `kind`/`key`/`value` comparison against the request
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Rule {
    pub fn new(kind: RuleKind, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn none() -> Self {
        Self::new(RuleKind::None, "", "")
    }
}

/// Gates whether a request is processed at all
pub type VerificationRule = Rule;

/// Selects which template applies to a request
pub type TriggerRule = Rule;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_kind_names() {
        assert_eq!(RuleKind::from("header".to_string()), RuleKind::Header);
        assert_eq!(RuleKind::from("message".to_string()), RuleKind::Message);
        assert_eq!(RuleKind::from("message-field".to_string()), RuleKind::Message);
        assert_eq!(
            RuleKind::from("query".to_string()),
            RuleKind::Unknown("query".to_string())
        );
        assert_eq!(RuleKind::Unknown("query".to_string()).to_string(), "query");
    }

    #[test]
    fn test_form_key_default() {
        let mut definition: WebhookDefinition = serde_json::from_value(serde_json::json!({
            "name": "gitlab",
            "pattern": "gitlab",
            "verification": { "type": "none" }
        }))
        .unwrap();
        assert_eq!(definition.form_key(), DEFAULT_FORM_KEY);
        assert_eq!(definition.route_path(), "/webhooks/gitlab");
        assert_eq!(definition.parse_mode, ParseMode::Plain);

        definition.form_key = Some(String::new());
        assert_eq!(definition.form_key(), DEFAULT_FORM_KEY);

        definition.form_key = Some("data".to_string());
        assert_eq!(definition.form_key(), "data");
    }
}
