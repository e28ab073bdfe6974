//! HTTP client trait and implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::FetchError;

use super::charset::decode_html;
use super::host_of;
use super::rate_limiter::RateLimiter;

/// Trait for HTTP clients, enabling mockability in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch HTML content from a URL.
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch binary content from a URL.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Configuration for [`WebClient`].
#[derive(Clone)]
pub struct WebClientBuilder {
    rate_limit_ms: u64,
    timeout: Duration,
    user_agent: String,
}

impl Default for WebClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WebClientBuilder {
    pub fn new() -> Self {
        Self {
            rate_limit_ms: 200,
            timeout: Duration::from_secs(30),
            user_agent: concat!("recipe2md/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the rate limit delay in milliseconds. 0 disables rate limiting.
    pub fn rate_limit_ms(mut self, ms: u64) -> Self {
        self.rate_limit_ms = ms;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn build(self) -> Result<WebClient, FetchError> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(WebClient {
            inner,
            rate_limiter: RateLimiter::new(Duration::from_millis(self.rate_limit_ms)),
        })
    }
}

/// reqwest-backed client with a request timeout and per-host rate limiting.
pub struct WebClient {
    inner: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl WebClient {
    pub fn new() -> Result<Self, FetchError> {
        WebClientBuilder::new().build()
    }

    pub fn builder() -> WebClientBuilder {
        WebClientBuilder::new()
    }

    async fn fetch(&self, url: &str) -> Result<(Vec<u8>, Option<String>), FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        if let Some(host) = host_of(url) {
            self.rate_limiter.wait(&host).await;
        }

        tracing::debug!(url, "network: fetching");
        let response = self.inner.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = %status, "network: request failed");
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        tracing::debug!(url, bytes = bytes.len(), "network: fetched");
        Ok((bytes, content_type))
    }
}

#[async_trait]
impl HttpClient for WebClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let (bytes, content_type) = self.fetch(url).await?;
        decode_html(&bytes, content_type.as_deref())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(self.fetch(url).await?.0)
    }
}

/// Mock response for testing.
#[derive(Clone)]
pub enum MockResponse {
    Html(String),
    Bytes(Vec<u8>),
    Status(u16),
}

/// Mock HTTP client for testing.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, MockResponse>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &str, response: MockResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn with_html(self, url: &str, html: &str) -> Self {
        self.with_response(url, MockResponse::Html(html.to_string()))
    }

    pub fn with_bytes(self, url: &str, bytes: Vec<u8>) -> Self {
        self.with_response(url, MockResponse::Bytes(bytes))
    }

    /// Respond to a URL with a non-success HTTP status.
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.with_response(url, MockResponse::Status(status))
    }

    fn missing(url: &str) -> FetchError {
        FetchError::InvalidUrl(format!("No mock response for URL: {}", url))
    }

    fn status(url: &str, status: u16) -> FetchError {
        FetchError::HttpStatus {
            url: url.to_string(),
            status,
        }
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        match self.responses.get(url) {
            Some(MockResponse::Html(html)) => Ok(html.clone()),
            Some(MockResponse::Bytes(bytes)) => decode_html(bytes, None),
            Some(MockResponse::Status(status)) => Err(Self::status(url, *status)),
            None => Err(Self::missing(url)),
        }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match self.responses.get(url) {
            Some(MockResponse::Html(html)) => Ok(html.as_bytes().to_vec()),
            Some(MockResponse::Bytes(bytes)) => Ok(bytes.clone()),
            Some(MockResponse::Status(status)) => Err(Self::status(url, *status)),
            None => Err(Self::missing(url)),
        }
    }
}
