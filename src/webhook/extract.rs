//! Value lookup against a decoded payload and the request headers.

use axum::http::HeaderMap;
use serde_json::{Map, Value};

/// Marker selecting a request header instead of a payload field
pub const HEADER_MARKER: &str = "header:";

/// Decoded JSON object of one request
pub type Message = Map<String, Value>;

/// Resolve `key` against the message or, for `header:` keys, the headers.
///
/// Dotted keys walk nested objects. When the walk reaches a value that is
/// not an object the remaining segments are ignored and that value is
/// returned, so `a.b.c` on `{"a":{"b":"x"}}` yields `"x"`. A segment that is
/// missing from an object yields `None`.
pub fn resolve(key: &str, message: &Message, headers: &HeaderMap) -> Option<Value> {
    if let Some((_, name)) = key.split_once(HEADER_MARKER) {
        if name.is_empty() {
            tracing::warn!(key = %key, "Header key has no header name");
            return None;
        }
        return Some(Value::String(header_value(headers, name).to_string()));
    }

    let mut segments = key.split('.');
    let first = segments.next().unwrap_or_default();
    let mut current = match message.get(first) {
        Some(value) => value,
        None => {
            tracing::warn!(key = %key, segment = %first, "Nested key does not exist");
            return None;
        }
    };

    for segment in segments {
        let Value::Object(map) = current else {
            break;
        };
        match map.get(segment) {
            Some(value) => current = value,
            None => {
                tracing::warn!(key = %key, segment = %segment, "Nested key does not exist");
                return None;
            }
        }
    }

    Some(current.clone())
}

/// Header value by case-insensitive name, empty when absent or not text.
pub fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// String coercion used for comparisons: only JSON strings count.
pub fn as_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Textual form of a value when it is substituted into a template.
pub fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        // Arrays and objects use their JSON representation
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn message(value: Value) -> Message {
        match value {
            Value::Object(map) => map,
            _ => panic!("test message must be an object"),
        }
    }

    #[test]
    fn test_resolve_nested_value() {
        let msg = message(json!({ "project": { "owner": { "name": "ada" } } }));
        let headers = HeaderMap::new();

        assert_eq!(
            resolve("project.owner.name", &msg, &headers),
            Some(json!("ada"))
        );
        assert_eq!(
            resolve("project.owner", &msg, &headers),
            Some(json!({ "name": "ada" }))
        );
    }

    #[test]
    fn test_resolve_stops_at_non_object() {
        let msg = message(json!({ "a": { "b": "x" } }));
        assert_eq!(resolve("a.b.c", &msg, &HeaderMap::new()), Some(json!("x")));
    }

    #[test]
    fn test_resolve_missing_segment() {
        let msg = message(json!({ "a": { "b": "x" } }));
        let headers = HeaderMap::new();

        assert_eq!(resolve("missing", &msg, &headers), None);
        assert_eq!(resolve("a.missing", &msg, &headers), None);
        assert_eq!(resolve("a.missing.deeper", &msg, &headers), None);
    }

    #[test]
    fn test_resolve_header_ignores_message() {
        let msg = message(json!({ "X-Foo": "from-body" }));
        let mut headers = HeaderMap::new();
        headers.insert("x-foo", HeaderValue::from_static("from-header"));

        assert_eq!(
            resolve("header:X-Foo", &msg, &headers),
            Some(json!("from-header"))
        );
        assert_eq!(resolve("header:X-Absent", &msg, &headers), Some(json!("")));
        assert_eq!(resolve("header:", &msg, &headers), None);
    }

    #[test]
    fn test_as_text_only_accepts_strings() {
        assert_eq!(as_text(Some(&json!("secret"))), "secret");
        assert_eq!(as_text(Some(&json!(42))), "");
        assert_eq!(as_text(Some(&json!(true))), "");
        assert_eq!(as_text(None), "");
    }

    #[test]
    fn test_display_values() {
        assert_eq!(display(Some(&json!("hi"))), "hi");
        assert_eq!(display(Some(&json!(3))), "3");
        assert_eq!(display(Some(&json!(1.5))), "1.5");
        assert_eq!(display(Some(&json!(false))), "false");
        assert_eq!(display(Some(&Value::Null)), "");
        assert_eq!(display(Some(&json!({ "k": 1 }))), r#"{"k":1}"#);
        assert_eq!(display(None), "");
    }
}
