//! Provider backed by a JSON feed served over HTTP.
//!
//! ### Protocol
//!
//! - **Request**: `GET <url>?count=<n>&user_ip=<ip>`
//! - **Response**: a JSON array of content items
//!   (`id`, `title`, `source`, `summary`, `link`, `expiry`).
//! - **Failures**: timeouts, transport errors, non-2xx statuses, bodies over
//!   `max_bytes` and undecodable bodies are all reported as `ProviderError`s;
//!   there are no retries, the cache tries again on its next cycle.

pub mod error;

pub use error::ClientError;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use mixfeed_core::{ContentItem, FetchParams, ProviderClient, ProviderError};
use reqwest::{Url, header};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "mixfeed/0.1";

/// Default response body cap.
const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// HTTP provider configuration.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Feed endpoint.
    pub url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: mixfeed/0.x).
    pub user_agent: String,
    /// Largest response body accepted, in bytes (default: 5 MiB).
    pub max_bytes: usize,
}

impl HttpProviderConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// Fetches content items from a remote JSON endpoint.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    http: reqwest::Client,
    url: Url,
    max_bytes: usize,
}

impl HttpProvider {
    /// Create a new HTTP provider with the given configuration.
    pub fn new(config: HttpProviderConfig) -> Result<Self, ClientError> {
        let url = Url::parse(&config.url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.url, e)))?;

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self { http, url, max_bytes: config.max_bytes })
    }

    fn request(&self, params: &FetchParams) -> reqwest::RequestBuilder {
        self.http
            .get(self.url.clone())
            .header(header::ACCEPT, "application/json")
            .query(&[("count", params.count.to_string()), ("user_ip", params.user_ip.clone())])
    }
}

/// Decode a feed body into content items.
pub fn parse_items(bytes: &[u8]) -> Result<Vec<ContentItem>, ProviderError> {
    serde_json::from_slice(bytes).map_err(|e| ProviderError::Parse(e.to_string()))
}

fn too_large(len: u64, max_bytes: usize) -> ProviderError {
    ProviderError::TooLarge(format!("{len} bytes exceeds {max_bytes}"))
}

#[async_trait]
impl ProviderClient for HttpProvider {
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<ContentItem>, ProviderError> {
        let start = Instant::now();

        tracing::debug!("fetching provider feed: url={} count={}", self.url, params.count);

        let mut response = self.request(params).send().await.map_err(|e| error::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error::from_status(status));
        }

        if let Some(len) = response.content_length()
            && len > self.max_bytes as u64
        {
            return Err(too_large(len, self.max_bytes));
        }

        // Read chunk by chunk so a body without a truthful length is still capped.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| error::from_reqwest(&e))? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(too_large((body.len() + chunk.len()) as u64, self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        let items = parse_items(&body)?;

        tracing::debug!("fetched {} in {:?}, {} items", self.url, start.elapsed(), items.len());

        Ok(items)
    }
}
