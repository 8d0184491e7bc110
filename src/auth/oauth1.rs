//! OAuth 1.0a request signing (HMAC-SHA1).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::{Method, Url};
use sha1::Sha1;

use crate::error::{ApiError, Result};

/// RFC 3986 unreserved characters stay as-is, everything else is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const NONCE_LEN: usize = 32;

/// Consumer and access-token key pairs used to sign every OAuth 1.0a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth1Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl OAuth1Credentials {
    /// Builds the `Authorization` header value for `method` and `url` using a
    /// fresh nonce and the current time.
    pub fn authorization_header(&self, method: &Method, url: &Url) -> Result<String> {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        self.sign_with(method, url, &nonce, chrono::Utc::now().timestamp())
    }

    /// Deterministic variant of [`authorization_header`](Self::authorization_header).
    pub fn sign_with(
        &self,
        method: &Method,
        url: &Url,
        nonce: &str,
        timestamp: i64,
    ) -> Result<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.consumer_key.clone()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", "HMAC-SHA1".to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_token", self.access_token.clone()),
            ("oauth_version", "1.0".to_string()),
        ];

        let base = signature_base_string(method, url, &oauth_params);
        let signing_key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(&self.access_token_secret)
        );

        let mut mac = Hmac::<Sha1>::new_from_slice(signing_key.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("OAuth signing key rejected: {e}")))?;
        mac.update(base.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        oauth_params.push(("oauth_signature", signature));
        oauth_params.sort_by(|a, b| a.0.cmp(b.0));

        let fields = oauth_params
            .iter()
            .map(|(name, value)| format!("{name}=\"{}\"", encode(value)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {fields}"))
    }
}

/// `METHOD&enc(base URI)&enc(normalized parameters)`.
///
/// Query parameters of `url` are signed alongside the protocol parameters.
/// JSON bodies never contribute to the signature.
pub(crate) fn signature_base_string(
    method: &Method,
    url: &Url,
    oauth_params: &[(&str, String)],
) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| (encode(&name), encode(&value)))
        .chain(
            oauth_params
                .iter()
                .map(|(name, value)| (encode(name), encode(value))),
        )
        .collect();
    params.sort();

    let normalized = params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut base_uri = url.clone();
    base_uri.set_query(None);
    base_uri.set_fragment(None);

    format!(
        "{}&{}&{}",
        method.as_str(),
        encode(base_uri.as_str()),
        encode(&normalized)
    )
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}
