//! Authenticated REST API client.
//!
//! Requests go to `base_url + "/" + path`, are signed with OAuth 1.0a, marked
//! for Basic auth, or carry a per-call bearer token, and resolve to the
//! parsed JSON body or a single normalized [`ApiError`].

pub mod auth;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod template;

pub use client::{CUSTOMER_TOKEN_PATH, RestClient, SharedTransport};
pub use config::{ClientConfig, ClientOptions};
pub use error::{ApiError, ConfigError};
