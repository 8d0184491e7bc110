//! One authenticated API call, end to end.
//!
//! [`Dispatcher::dispatch`] builds the request, asks the authorization
//! selector for headers, sends it once through an [`HttpClient`] and folds
//! the outcome into `Result<Value, ApiError>`. [`settle`] holds the response
//! mapping on its own so it can be checked without a network.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Request, Url};
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, Span, debug, error, info};

use crate::auth::resolve_auth_headers;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::fetch::HttpClient;
use crate::template::{display_value, expand};

/// Method, absolute URL and optional JSON body of a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if `url` is not an absolute URL.
    pub fn new(method: Method, url: &str, body: Option<Value>) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid URL '{url}': {e}")))?;
        Ok(Self { method, url, body })
    }

    fn into_request(self, auth_headers: HeaderMap) -> Result<Request> {
        let body = self
            .body
            .map(|body| serde_json::to_vec(&body))
            .transpose()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to encode body: {e}")))?;

        let mut request = Request::new(self.method, self.url);
        let headers = request.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.extend(auth_headers);

        *request.body_mut() = body.map(Into::into);
        Ok(request)
    }
}

/// Executes calls for one client configuration over transport `C`.
#[derive(Clone)]
pub struct Dispatcher<C> {
    config: Arc<ClientConfig>,
    transport: C,
    span: Span,
}

impl<C: HttpClient> Dispatcher<C> {
    /// Every call runs in a child span of `span`.
    pub fn new(config: Arc<ClientConfig>, transport: C, span: Span) -> Self {
        Self {
            config,
            transport,
            span,
        }
    }

    pub fn with_span(self, span: Span) -> Self {
        Self { span, ..self }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `method` to `resource_path` below the base URL.
    ///
    /// `token` is a per-call bearer token; pass `""` for the configured
    /// scheme. Resolves exactly once: the parsed body for a 2xx response, an
    /// [`ApiError`] otherwise.
    pub async fn dispatch(
        &self,
        method: Method,
        resource_path: &str,
        body: Option<Value>,
        token: &str,
    ) -> Result<Value> {
        let url = self.config.resource_url(resource_path);
        let span = tracing::debug_span!(parent: &self.span, "api_call", %method, %url);

        async {
            let descriptor = RequestDescriptor::new(method, &url, body)?;
            self.execute(descriptor, token).await
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, descriptor: RequestDescriptor, token: &str) -> Result<Value> {
        debug!(has_token = !token.is_empty(), "Calling API endpoint");

        let auth_headers = resolve_auth_headers(&self.config.auth, &descriptor, token)?;
        let has_body = descriptor.body.is_some();
        let request = descriptor.into_request(auth_headers)?;
        info!(
            method = %request.method(),
            url = %request.url(),
            headers = ?request.headers().keys().collect::<Vec<_>>(),
            has_body,
            "Sending request"
        );

        let response = self.transport.execute(request).await.map_err(|e| {
            error!(error = %e, "Error occurred");
            ApiError::Transport(e)
        })?;

        let status = response.status().as_u16();
        debug!(status, "Response received");

        let text = response.text().await.map_err(|e| {
            error!(status, error = %e, "Failed to read response body");
            ApiError::Transport(e)
        })?;

        settle(status, &text).inspect_err(|e| error!(status, error = %e, "API call failed"))
    }
}

/// Maps a completed response to the call outcome.
///
/// A status in `[200, 300)` yields the parsed body (`Null` when empty).
/// Anything else becomes [`ApiError::Application`] with the message from
/// [`error_message`].
pub fn settle(status: u16, text: &str) -> Result<Value> {
    let body = parse_body(text);

    if (200..300).contains(&status) {
        return Ok(body.unwrap_or(Value::Null));
    }

    Err(ApiError::Application {
        status,
        message: error_message(status, body.as_ref()),
    })
}

/// Error text for a failed response, by precedence:
///
/// 1. body has `result` → `result` expanded with `parameters`
/// 2. body has `code` → `"HTTP ERROR <code>"`
/// 3. otherwise → `"HTTP ERROR <status>"`
pub fn error_message(status: u16, body: Option<&Value>) -> String {
    let Some(Value::Object(payload)) = body else {
        return format!("HTTP ERROR {status}");
    };

    if let Some(result) = payload.get("result") {
        let no_parameters = Value::Array(Vec::new());
        let parameters = payload.get("parameters").unwrap_or(&no_parameters);
        return expand(&display_value(result), parameters);
    }

    match payload.get("code") {
        Some(code) if !code.is_null() => format!("HTTP ERROR {}", display_value(code)),
        _ => format!("HTTP ERROR {status}"),
    }
}

/// `None` for an empty body, the JSON value if it parses, the raw text
/// otherwise.
fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(status: u16, body: &str) -> String {
        match settle(status, body) {
            Err(ApiError::Application { message, .. }) => message,
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn test_success_returns_body_as_is() {
        let body = json!({"id": 7, "items": [1, 2, 3]});
        assert_eq!(settle(200, &body.to_string()).unwrap(), body);
        assert_eq!(settle(299, "[1,2]").unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_success_with_empty_body() {
        assert_eq!(settle(204, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_success_with_scalar_and_text_bodies() {
        assert_eq!(settle(200, "\"abc123\"").unwrap(), json!("abc123"));
        assert_eq!(settle(200, "true").unwrap(), json!(true));
        assert_eq!(settle(200, "plain text").unwrap(), json!("plain text"));
    }

    #[test]
    fn test_status_boundaries() {
        assert!(settle(199, "{}").is_err());
        assert!(settle(200, "{}").is_ok());
        assert!(settle(300, "{}").is_err());
    }

    #[test]
    fn test_positional_template() {
        assert_eq!(
            message(404, r#"{"result": "Not found: %1", "parameters": ["widget-7"]}"#),
            "Not found: widget-7"
        );
    }

    #[test]
    fn test_named_template() {
        assert_eq!(
            message(500, r#"{"result": "Missing %name", "parameters": {"name": "id"}}"#),
            "Missing id"
        );
    }

    #[test]
    fn test_result_without_parameters() {
        assert_eq!(message(400, r#"{"result": "Bad %1"}"#), "Bad %1");
        assert_eq!(
            message(400, r#"{"result": "Bad %1", "parameters": null}"#),
            "Bad %1"
        );
    }

    #[test]
    fn test_result_wins_over_code() {
        assert_eq!(
            message(400, r#"{"code": 42, "result": "Nope"}"#),
            "Nope"
        );
    }

    #[test]
    fn test_code_without_result() {
        assert_eq!(message(400, r#"{"code": 42}"#), "HTTP ERROR 42");
        assert_eq!(message(400, r#"{"code": "E_STOCK"}"#), "HTTP ERROR E_STOCK");
    }

    #[test]
    fn test_no_body_uses_status() {
        assert_eq!(message(503, ""), "HTTP ERROR 503");
    }

    #[test]
    fn test_body_without_code_uses_status() {
        assert_eq!(message(502, r#"{"message": "upstream"}"#), "HTTP ERROR 502");
        assert_eq!(message(502, "<html>Bad Gateway</html>"), "HTTP ERROR 502");
    }

    #[test]
    fn test_application_error_keeps_status() {
        let err = settle(418, "").unwrap_err();
        assert_eq!(err.status(), Some(418));
        assert_eq!(err.to_string(), "HTTP ERROR 418");
    }

    #[test]
    fn test_descriptor_rejects_relative_url() {
        let err = RequestDescriptor::new(Method::GET, "/V1/products", None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn test_into_request_sets_json_headers() {
        let descriptor = RequestDescriptor::new(
            Method::POST,
            "http://localhost/V1/carts",
            Some(json!({"sku": "abc"})),
        )
        .unwrap();
        let request = descriptor.into_request(HeaderMap::new()).unwrap();

        assert_eq!(request.headers()[ACCEPT], "application/json");
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(serde_json::from_slice::<Value>(bytes).unwrap(), json!({"sku": "abc"}));
    }

    #[test]
    fn test_into_request_without_body() {
        let descriptor = RequestDescriptor::new(Method::GET, "http://localhost/V1/carts", None)
            .unwrap();
        let request = descriptor.into_request(HeaderMap::new()).unwrap();

        assert!(request.body().is_none());
        assert!(request.headers().get(CONTENT_TYPE).is_none());
    }
}
