//! Template selection by trigger.

use axum::http::HeaderMap;
use thiserror::Error;

use crate::config::{RuleKind, Template};

use super::extract::{as_text, header_value, resolve, Message};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("Unsupported trigger type: {0:?}")]
    UnsupportedTrigger(String),
}

/// Return the first template whose trigger matches, or the first one
/// without a trigger, whichever comes first in declared order.
pub fn select_template<'a>(
    templates: &'a [Template],
    headers: &HeaderMap,
    message: &Message,
) -> Result<Option<&'a Template>, SelectError> {
    for template in templates {
        let Some(trigger) = &template.trigger else {
            return Ok(Some(template));
        };

        let actual = match &trigger.kind {
            RuleKind::Header => header_value(headers, &trigger.key).to_string(),
            RuleKind::Message => as_text(resolve(&trigger.key, message, headers).as_ref()),
            other => return Err(SelectError::UnsupportedTrigger(other.to_string())),
        };

        if actual == trigger.value {
            return Ok(Some(template));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rule;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn template(text: &str, trigger: Option<Rule>) -> Template {
        Template {
            template: text.to_string(),
            keys: vec![],
            trigger,
        }
    }

    fn message(value: serde_json::Value) -> Message {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_falls_through_to_untriggered_template() {
        let templates = vec![
            template("a", Some(Rule::new(RuleKind::Message, "type", "a"))),
            template("fallback", None),
        ];
        let msg = message(json!({ "type": "b" }));

        let selected = select_template(&templates, &HeaderMap::new(), &msg).unwrap();
        assert_eq!(selected.unwrap().template, "fallback");
    }

    #[test]
    fn test_first_match_wins() {
        let templates = vec![
            template("first", Some(Rule::new(RuleKind::Message, "type", "a"))),
            template("second", Some(Rule::new(RuleKind::Message, "type", "a"))),
        ];
        let msg = message(json!({ "type": "a" }));

        let selected = select_template(&templates, &HeaderMap::new(), &msg).unwrap();
        assert_eq!(selected.unwrap().template, "first");
    }

    #[test]
    fn test_untriggered_template_shadows_later_triggers() {
        let templates = vec![
            template("catch-all", None),
            template("push", Some(Rule::new(RuleKind::Message, "type", "push"))),
        ];
        let msg = message(json!({ "type": "push" }));

        let selected = select_template(&templates, &HeaderMap::new(), &msg).unwrap();
        assert_eq!(selected.unwrap().template, "catch-all");
    }

    #[test]
    fn test_header_trigger() {
        let templates = vec![
            template(
                "pipeline",
                Some(Rule::new(RuleKind::Header, "X-Gitlab-Event", "Pipeline Hook")),
            ),
            template(
                "push",
                Some(Rule::new(RuleKind::Header, "X-Gitlab-Event", "Push Hook")),
            ),
        ];
        let mut headers = HeaderMap::new();
        headers.insert("x-gitlab-event", HeaderValue::from_static("Push Hook"));

        let selected = select_template(&templates, &headers, &Message::new()).unwrap();
        assert_eq!(selected.unwrap().template, "push");
    }

    #[test]
    fn test_no_match() {
        let templates = vec![template(
            "a",
            Some(Rule::new(RuleKind::Message, "type", "a")),
        )];
        let selected = select_template(&templates, &HeaderMap::new(), &Message::new()).unwrap();
        assert!(selected.is_none());
        assert!(select_template(&[], &HeaderMap::new(), &Message::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unsupported_trigger_aborts() {
        let templates = vec![
            template("odd", Some(Rule::new(RuleKind::Unknown("cookie".into()), "k", "v"))),
            template("fallback", None),
        ];
        let err = select_template(&templates, &HeaderMap::new(), &Message::new()).unwrap_err();
        assert_eq!(err, SelectError::UnsupportedTrigger("cookie".to_string()));

        let templates = vec![template("none", Some(Rule::none()))];
        let err = select_template(&templates, &HeaderMap::new(), &Message::new()).unwrap_err();
        assert_eq!(err, SelectError::UnsupportedTrigger("none".to_string()));
    }
}
