//! Per-call authorization header selection.
//!
//! [`AuthConfig`] is fixed when the client is built. [`resolve_auth_headers`]
//! combines it with an optional per-call bearer token:
//!
//! - `Basic` → `AuthType: Basic`, whatever the token
//! - `OAuth1` with a token → `Authorization: Bearer <token>`
//! - `OAuth1` without a token → `Authorization: OAuth ...` (HMAC-SHA1)

mod oauth1;

pub use oauth1::OAuth1Credentials;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

use crate::dispatch::RequestDescriptor;
use crate::error::{ApiError, Result};

/// Marks a call as Basic-authenticated. Credentials themselves are added by
/// the transport, see [`crate::fetch::auth::BasicCredentials`].
pub const AUTH_TYPE_HEADER: &str = "authtype";

/// How calls without a per-call token are authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    Basic,
    OAuth1(OAuth1Credentials),
}

impl AuthConfig {
    pub fn is_basic(&self) -> bool {
        matches!(self, AuthConfig::Basic)
    }
}

/// Computes the authorization headers for one outgoing request.
///
/// An empty `token` means "use the configured scheme". A non-empty token
/// overrides OAuth 1.0a signing but never Basic auth.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] if the token or signature cannot be
/// carried in an HTTP header.
pub fn resolve_auth_headers(
    config: &AuthConfig,
    request: &RequestDescriptor,
    token: &str,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    match config {
        AuthConfig::Basic => {
            headers.insert(
                HeaderName::from_static(AUTH_TYPE_HEADER),
                HeaderValue::from_static("Basic"),
            );
        }
        AuthConfig::OAuth1(_) if !token.is_empty() => {
            headers.insert(AUTHORIZATION, header_value(format!("Bearer {token}"))?);
        }
        AuthConfig::OAuth1(credentials) => {
            let value = credentials.authorization_header(&request.method, &request.url)?;
            headers.insert(AUTHORIZATION, header_value(value)?);
        }
    }

    Ok(headers)
}

fn header_value(value: String) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&value)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid authorization header: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}
