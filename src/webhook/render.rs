//! Positional template rendering.
//!
//! Templates use printf-style verbs: `%s`, `%v` and `%d` insert the value
//! as text, `%q` inserts it as a quoted string and `%%` is a literal
//! percent sign. Every verb consumes the next key's value in order.

use axum::http::HeaderMap;
use thiserror::Error;

use crate::config::Template;

use super::extract::{display, resolve, Message};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Template has {placeholders} placeholders but {values} keys")]
    ArgumentCount { placeholders: usize, values: usize },

    #[error("Unsupported format verb %{0}")]
    UnsupportedVerb(char),

    #[error("Template ends with a lone '%'")]
    TrailingPercent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Plain,
    Quoted,
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Value(Verb),
}

/// Render a template with values looked up for each of its keys.
///
/// Keys that do not resolve render as an empty string.
pub fn render(
    template: &Template,
    message: &Message,
    headers: &HeaderMap,
) -> Result<String, RenderError> {
    let values: Vec<String> = template
        .keys
        .iter()
        .map(|key| display(resolve(key, message, headers).as_ref()))
        .collect();

    format_positional(&template.template, &values)
}

/// Substitute `values` into the verbs of `format`, in order.
pub fn format_positional(format: &str, values: &[String]) -> Result<String, RenderError> {
    let segments = parse(format)?;

    let placeholders = segments
        .iter()
        .filter(|s| matches!(s, Segment::Value(_)))
        .count();
    if placeholders != values.len() {
        return Err(RenderError::ArgumentCount {
            placeholders,
            values: values.len(),
        });
    }

    let mut out = String::with_capacity(format.len() + values.iter().map(String::len).sum::<usize>());
    let mut values = values.iter();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Value(verb) => {
                let value = values.next().map(String::as_str).unwrap_or_default();
                match verb {
                    Verb::Plain => out.push_str(value),
                    Verb::Quoted => out.push_str(&serde_json::Value::from(value).to_string()),
                }
            }
        }
    }

    Ok(out)
}

fn parse(format: &str) -> Result<Vec<Segment<'_>>, RenderError> {
    let mut segments = Vec::new();
    let mut rest = format;

    while let Some(idx) = rest.find('%') {
        if idx > 0 {
            segments.push(Segment::Literal(&rest[..idx]));
        }
        let verb = rest[idx + 1..]
            .chars()
            .next()
            .ok_or(RenderError::TrailingPercent)?;
        match verb {
            '%' => segments.push(Segment::Literal("%")),
            's' | 'v' | 'd' => segments.push(Segment::Value(Verb::Plain)),
            'q' => segments.push(Segment::Value(Verb::Quoted)),
            other => return Err(RenderError::UnsupportedVerb(other)),
        }
        rest = &rest[idx + 1 + verb.len_utf8()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }

    Ok(segments)
}
