use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, HeaderValue};

use crate::auth::AUTH_TYPE_HEADER;

/// An [`HttpClient`] wrapper that supplies HTTP Basic credentials.
///
/// Only requests tagged `AuthType: Basic` by the authorization selector are
/// touched, and only if they carry no `Authorization` header yet.
pub struct BasicCredentials<C> {
    pub inner: C,
    pub username: String,
    pub password: String,
}

impl<C> BasicCredentials<C> {
    pub fn new(inner: C, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            inner,
            username: username.into(),
            password: password.into(),
        }
    }

    fn header_value(&self) -> Option<HeaderValue> {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        let mut value = HeaderValue::from_str(&format!("Basic {encoded}")).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for BasicCredentials<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let wants_basic = req
            .headers()
            .get(AUTH_TYPE_HEADER)
            .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"basic"));

        if wants_basic && !req.headers().contains_key(AUTHORIZATION) {
            if let Some(value) = self.header_value() {
                req.headers_mut().insert(AUTHORIZATION, value);
            }
        }
        self.inner.execute(req).await
    }
}
