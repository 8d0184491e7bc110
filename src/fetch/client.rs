use async_trait::async_trait;
use reqwest::{Request, Response};

/// The transport seam of the client: send one request, get one response.
///
/// Implementations must not retry. A returned `Err` means no HTTP response
/// was received; non-2xx statuses come back as `Ok`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
