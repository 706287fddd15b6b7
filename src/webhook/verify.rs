use axum::http::HeaderMap;

use crate::config::{RuleKind, VerificationRule};

use super::extract::{as_text, header_value, resolve, Message};

/// Check a request against the webhook's verification rule.
pub fn is_valid(rule: &VerificationRule, headers: &HeaderMap, message: &Message) -> bool {
    match &rule.kind {
        RuleKind::None => true,
        RuleKind::Header => header_value(headers, &rule.key) == rule.value,
        RuleKind::Message => as_text(resolve(&rule.key, message, headers).as_ref()) == rule.value,
        RuleKind::Unknown(kind) => {
            tracing::warn!(kind = %kind, "Unknown verification type");
            false
        }
    }
}
