//! Public client facade: one method per HTTP verb plus the customer token
//! exchange.

use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{Span, debug};

use crate::config::{ClientConfig, ClientOptions};
use crate::dispatch::Dispatcher;
use crate::error::{ConfigError, Result};
use crate::fetch::auth::BasicCredentials;
use crate::fetch::{BasicClient, HttpClient};

/// Resource path of the customer token endpoint, relative to the base URL.
pub const CUSTOMER_TOKEN_PATH: &str = "integration/customer/token";

/// Type-erased transport built from [`ClientOptions`].
pub type SharedTransport = Arc<dyn HttpClient>;

/// Authenticated REST client.
///
/// Paths passed to the verb methods are relative to the configured base URL.
/// `token` selects per-call bearer auth; `""` uses the configured scheme.
/// Cloning is cheap and clones share configuration and transport.
#[derive(Clone)]
pub struct RestClient<C = SharedTransport> {
    dispatcher: Dispatcher<C>,
}

impl RestClient<SharedTransport> {
    /// Validates `options` and builds a client over a `reqwest` transport.
    ///
    /// With basic auth and `basic_username` set, the transport attaches those
    /// credentials to every call.
    pub fn new(options: ClientOptions) -> std::result::Result<Self, ConfigError> {
        let timeout = options.timeout();
        let basic_credentials = match (&options.basic_username, options.use_basic_auth) {
            (Some(username), true) => Some((
                username.clone(),
                options.basic_password.clone().unwrap_or_default(),
            )),
            _ => None,
        };

        let config = options.into_config()?;

        let base = BasicClient::with_timeout(timeout).map_err(ConfigError::Transport)?;
        let transport: SharedTransport = match basic_credentials {
            Some((username, password)) => {
                Arc::new(BasicCredentials::new(base, username, password))
            }
            None => Arc::new(base),
        };

        debug!(base_url = %config.base_url, basic = config.auth.is_basic(), "REST client configured");
        Ok(Self::with_transport(config, transport))
    }
}

impl<C: HttpClient> RestClient<C> {
    pub fn with_transport(config: ClientConfig, transport: C) -> Self {
        let span = tracing::info_span!("rest_client", base_url = %config.base_url);
        Self {
            dispatcher: Dispatcher::new(Arc::new(config), transport, span),
        }
    }

    /// Replaces the span every call is recorded under.
    pub fn with_span(self, span: Span) -> Self {
        Self {
            dispatcher: self.dispatcher.with_span(span),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<Value> {
        self.dispatcher.dispatch(Method::GET, path, None, token).await
    }

    pub async fn post(&self, path: &str, body: Value, token: &str) -> Result<Value> {
        self.dispatcher
            .dispatch(Method::POST, path, Some(body), token)
            .await
    }

    pub async fn put(&self, path: &str, body: Value, token: &str) -> Result<Value> {
        self.dispatcher
            .dispatch(Method::PUT, path, Some(body), token)
            .await
    }

    pub async fn patch(&self, path: &str, body: Value, token: &str) -> Result<Value> {
        self.dispatcher
            .dispatch(Method::PATCH, path, Some(body), token)
            .await
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<Value> {
        self.dispatcher.dispatch(Method::DELETE, path, None, token).await
    }

    /// Exchanges customer credentials (e.g. `{"username": .., "password": ..}`)
    /// for a token usable as the `token` argument of later calls.
    pub async fn consumer_token(&self, login_data: Value) -> Result<Value> {
        self.dispatcher
            .dispatch(Method::POST, CUSTOMER_TOKEN_PATH, Some(login_data), "")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tracing::span::{Attributes, Id};
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::Layer;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    type SpanLog = Arc<Mutex<Vec<(String, Option<String>)>>>;

    /// Records every new span as `(name, parent name)`.
    struct SpanParents(SpanLog);

    impl<S> Layer<S> for SpanParents
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(&self, _attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(id) {
                let parent = span.parent().map(|p| p.name().to_string());
                self.0.lock().unwrap().push((span.name().to_string(), parent));
            }
        }
    }

    fn basic_options(url: String) -> ClientOptions {
        ClientOptions {
            url,
            use_basic_auth: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_calls_run_under_supplied_span() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/V1/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let spans: SpanLog = Arc::default();
        let subscriber = tracing_subscriber::registry().with(SpanParents(spans.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = RestClient::new(basic_options(format!("{}/rest", server.uri())))
            .unwrap()
            .with_span(tracing::info_span!("storefront"));
        client.get("V1/orders", "").await.unwrap();

        let spans = spans.lock().unwrap();
        assert!(
            spans
                .iter()
                .any(|(name, parent)| name == "api_call" && parent.as_deref() == Some("storefront")),
            "recorded spans: {spans:?}"
        );
    }

    #[test]
    fn test_new_rejects_unusable_options() {
        let err = RestClient::new(basic_options("shop.example.com/rest".to_string()))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let options = ClientOptions {
            timeout_secs: Some(0),
            ..basic_options("https://shop.example.com/rest".to_string())
        };
        assert!(matches!(RestClient::new(options), Err(ConfigError::ZeroTimeout)));
    }
}
