//! Client options and their validated, immutable form.
//!
//! Options can be written inline, loaded from a JSON file:
//! ```json
//! {
//!   "url": "https://shop.example.com/rest/V1",
//!   "useBasicAuth": false,
//!   "consumerKey": "...",
//!   "consumerSecret": "...",
//!   "accessToken": "...",
//!   "accessTokenSecret": "..."
//! }
//! ```
//! or read from `REST_CLIENT_*` environment variables.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::{AuthConfig, OAuth1Credentials};
use crate::error::ConfigError;
use crate::fetch::DEFAULT_TIMEOUT;

pub const ENV_URL: &str = "REST_CLIENT_URL";
pub const ENV_USE_BASIC_AUTH: &str = "REST_CLIENT_USE_BASIC_AUTH";
pub const ENV_CONSUMER_KEY: &str = "REST_CLIENT_CONSUMER_KEY";
pub const ENV_CONSUMER_SECRET: &str = "REST_CLIENT_CONSUMER_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "REST_CLIENT_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SECRET: &str = "REST_CLIENT_ACCESS_TOKEN_SECRET";
pub const ENV_BASIC_USERNAME: &str = "REST_CLIENT_BASIC_USERNAME";
pub const ENV_BASIC_PASSWORD: &str = "REST_CLIENT_BASIC_PASSWORD";
pub const ENV_TIMEOUT_SECS: &str = "REST_CLIENT_TIMEOUT_SECS";

/// Recognized construction options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    /// Base endpoint; resource paths are appended after a `/`.
    pub url: String,
    #[serde(default)]
    pub use_basic_auth: bool,
    #[serde(default)]
    pub consumer_key: Option<String>,
    #[serde(default)]
    pub consumer_secret: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub access_token_secret: Option<String>,
    /// Credentials the transport attaches to Basic-auth calls.
    #[serde(default)]
    pub basic_username: Option<String>,
    #[serde(default)]
    pub basic_password: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ClientOptions {
    /// Loads options from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Reads options from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads options through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let use_basic_auth = match lookup(ENV_USE_BASIC_AUTH) {
            None => false,
            Some(v) => parse_bool(&v).ok_or(ConfigError::InvalidEnv {
                name: ENV_USE_BASIC_AUTH,
                value: v,
            })?,
        };

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            None => None,
            Some(v) => Some(v.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_TIMEOUT_SECS,
                value: v,
            })?),
        };

        Ok(Self {
            url: lookup(ENV_URL).unwrap_or_default(),
            use_basic_auth,
            consumer_key: lookup(ENV_CONSUMER_KEY),
            consumer_secret: lookup(ENV_CONSUMER_SECRET),
            access_token: lookup(ENV_ACCESS_TOKEN),
            access_token_secret: lookup(ENV_ACCESS_TOKEN_SECRET),
            basic_username: lookup(ENV_BASIC_USERNAME),
            basic_password: lookup(ENV_BASIC_PASSWORD),
            timeout_secs,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Validates the options into an immutable [`ClientConfig`].
    pub fn into_config(self) -> Result<ClientConfig, ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        match Url::parse(&self.url) {
            Ok(url) if !url.cannot_be_a_base() => {}
            Ok(_) => {
                return Err(ConfigError::InvalidUrl {
                    url: self.url,
                    reason: "not a hierarchical URL".to_string(),
                });
            }
            Err(e) => {
                return Err(ConfigError::InvalidUrl {
                    url: self.url,
                    reason: e.to_string(),
                });
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }

        let auth = if self.use_basic_auth {
            AuthConfig::Basic
        } else {
            AuthConfig::OAuth1(OAuth1Credentials {
                consumer_key: required(self.consumer_key, "consumerKey")?,
                consumer_secret: required(self.consumer_secret, "consumerSecret")?,
                access_token: required(self.access_token, "accessToken")?,
                access_token_secret: required(self.access_token_secret, "accessTokenSecret")?,
            })
        };

        Ok(ClientConfig {
            base_url: self.url,
            auth,
        })
    }
}

/// Settings shared read-only by every call of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth: AuthConfig,
}

impl ClientConfig {
    /// `base_url + "/" + resource_path`, without any normalization.
    pub fn resource_url(&self, resource_path: &str) -> String {
        format!("{}/{}", self.base_url, resource_path)
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingCredential(name))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
