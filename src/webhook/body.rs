//! Request body decoding by content type.

use axum::{
    body::Bytes,
    extract::{Form, FromRequest, Query, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};

use crate::error::DispatchError;

pub const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";
pub const JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Form,
    Json,
}

/// Classify the request by the media type of its `Content-Type` header.
/// Parameters such as `charset` are ignored.
pub fn body_kind(headers: &HeaderMap) -> Result<BodyKind, DispatchError> {
    let raw = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let essence = raw.split(';').next().unwrap_or_default().trim();

    if essence.eq_ignore_ascii_case(FORM_URL_ENCODED) {
        Ok(BodyKind::Form)
    } else if essence.eq_ignore_ascii_case(JSON) {
        Ok(BodyKind::Json)
    } else {
        Err(DispatchError::UnsupportedContentType(raw.to_string()))
    }
}

/// Extract the JSON payload text from the request.
///
/// Form bodies carry it in `form_key`; a missing field is logged and
/// yields an empty payload. JSON bodies are taken verbatim.
pub async fn decode_body(form_key: &str, request: Request) -> Result<String, DispatchError> {
    match body_kind(request.headers())? {
        BodyKind::Form => decode_form(form_key, request).await,
        BodyKind::Json => {
            let bytes = Bytes::from_request(request, &())
                .await
                .map_err(|e| DispatchError::UnreadableBody(e.body_text()))?;
            std::str::from_utf8(&bytes)
                .map(str::to_owned)
                .map_err(|e| DispatchError::UnreadableBody(e.to_string()))
        }
    }
}

async fn decode_form(form_key: &str, request: Request) -> Result<String, DispatchError> {
    // Query values are consulted after the body, like a merged form.
    let Query(query) = Query::<Vec<(String, String)>>::try_from_uri(request.uri())
        .map_err(|e| DispatchError::MalformedForm(e.body_text()))?;
    let Form(fields) = Form::<Vec<(String, String)>>::from_request(request, &())
        .await
        .map_err(|e| DispatchError::MalformedForm(e.body_text()))?;

    let value = fields
        .into_iter()
        .chain(query)
        .find(|(name, _)| name == form_key)
        .map(|(_, value)| value);

    match value {
        Some(value) => Ok(value),
        None => {
            tracing::warn!(form_key = %form_key, "Form key does not exist");
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    fn request(uri: &str, content_type: &str, body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn test_body_kind() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert_eq!(body_kind(&headers).unwrap(), BodyKind::Json);

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert_eq!(body_kind(&headers).unwrap(), BodyKind::Json);

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert_eq!(body_kind(&headers).unwrap(), BodyKind::Form);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(matches!(
            body_kind(&headers),
            Err(DispatchError::UnsupportedContentType(t)) if t == "text/plain"
        ));

        assert!(body_kind(&HeaderMap::new()).is_err());
    }

    #[tokio::test]
    async fn test_decode_json_verbatim() {
        let req = request("/webhooks/x", JSON, r#"{"chat":"hi"}"#);
        assert_eq!(decode_body("payload", req).await.unwrap(), r#"{"chat":"hi"}"#);
    }

    #[tokio::test]
    async fn test_decode_form_field() {
        let req = request(
            "/webhooks/x",
            FORM_URL_ENCODED,
            "payload=%7B%22chat%22%3A%22hi%22%7D&other=1",
        );
        assert_eq!(decode_body("payload", req).await.unwrap(), r#"{"chat":"hi"}"#);
    }

    #[tokio::test]
    async fn test_decode_form_prefers_body_over_query() {
        let req = request("/webhooks/x?data=query", FORM_URL_ENCODED, "data=body");
        assert_eq!(decode_body("data", req).await.unwrap(), "body");

        let req = request("/webhooks/x?data=query", FORM_URL_ENCODED, "other=1");
        assert_eq!(decode_body("data", req).await.unwrap(), "query");
    }

    #[tokio::test]
    async fn test_decode_form_missing_field_is_empty() {
        let req = request("/webhooks/x", FORM_URL_ENCODED, "other=1");
        assert_eq!(decode_body("payload", req).await.unwrap(), "");
    }
}
