mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::{BasicClient, CONNECT_TIMEOUT, DEFAULT_TIMEOUT};

use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        (**self).execute(req).await
    }
}
