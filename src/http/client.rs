//! HTTP page execution
//!
//! Sends one page request and turns the response into a `FeedPage`:
//! - 2xx: items from the configured body field, token from a response header
//! - 304: change feed caught up (an error for query feeds)
//! - 429: rate limited
//! - anything else: status error carrying the body

use super::request::HttpFeedRequest;
use crate::error::{Error, Result};
use crate::feed::{FeedPage, PageExecutor};
use crate::types::{JsonValue, StringMap};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request/response header carrying the continuation token
pub const DEFAULT_CONTINUATION_HEADER: &str = "x-continuation";

/// Default request header carrying the page size
pub const DEFAULT_PAGE_SIZE_HEADER: &str = "x-max-item-count";

/// Default body field holding the page's items
pub const DEFAULT_ITEMS_FIELD: &str = "items";

/// Configuration for an HTTP feed
#[derive(Debug, Clone)]
pub struct HttpFeedConfig {
    /// Feed URL
    pub url: String,
    /// Request header the continuation token is sent in
    pub continuation_request_header: String,
    /// Response header the next continuation token is read from
    pub continuation_response_header: String,
    /// Request header the page size is sent in
    pub page_size_header: String,
    /// Path to the items array in the response body (empty = body is the array)
    pub items_field: String,
    /// Whether `304 Not Modified` means the feed is caught up
    pub not_modified_is_caught_up: bool,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
}

impl HttpFeedConfig {
    /// Create a config for `url` with default header and field names
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            continuation_request_header: DEFAULT_CONTINUATION_HEADER.to_string(),
            continuation_response_header: DEFAULT_CONTINUATION_HEADER.to_string(),
            page_size_header: DEFAULT_PAGE_SIZE_HEADER.to_string(),
            items_field: DEFAULT_ITEMS_FIELD.to_string(),
            not_modified_is_caught_up: false,
            timeout: Duration::from_secs(30),
            default_headers: StringMap::new(),
            user_agent: format!("feedfetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Create a new config builder
    pub fn builder(url: impl Into<String>) -> HttpFeedConfigBuilder {
        HttpFeedConfigBuilder {
            config: Self::new(url),
        }
    }
}

/// Builder for HTTP feed config
#[derive(Debug)]
pub struct HttpFeedConfigBuilder {
    config: HttpFeedConfig,
}

impl HttpFeedConfigBuilder {
    /// Use one header name for the token in both directions
    pub fn continuation_header(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.config.continuation_request_header = name.clone();
        self.config.continuation_response_header = name;
        self
    }

    /// Set the request header the token is sent in
    pub fn continuation_request_header(mut self, name: impl Into<String>) -> Self {
        self.config.continuation_request_header = name.into();
        self
    }

    /// Set the response header the token is read from
    pub fn continuation_response_header(mut self, name: impl Into<String>) -> Self {
        self.config.continuation_response_header = name.into();
        self
    }

    /// Set the page size header
    pub fn page_size_header(mut self, name: impl Into<String>) -> Self {
        self.config.page_size_header = name.into();
        self
    }

    /// Set the items field path
    pub fn items_field(mut self, path: impl Into<String>) -> Self {
        self.config.items_field = path.into();
        self
    }

    /// Treat `304 Not Modified` as a caught-up change feed
    pub fn not_modified_is_caught_up(mut self, enabled: bool) -> Self {
        self.config.not_modified_is_caught_up = enabled;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpFeedConfig {
        self.config
    }
}

/// Executes `HttpFeedRequest`s with reqwest
pub struct HttpPageExecutor {
    client: Client,
    config: Arc<HttpFeedConfig>,
}

impl HttpPageExecutor {
    /// Create a new executor
    pub fn new(config: Arc<HttpFeedConfig>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    fn continuation_from(&self, response: &Response) -> Option<String> {
        response
            .headers()
            .get(self.config.continuation_response_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            Error::Http(e)
        }
    }
}

#[async_trait]
impl PageExecutor<HttpFeedRequest> for HttpPageExecutor {
    type Item = JsonValue;

    async fn execute(&self, request: HttpFeedRequest) -> Result<FeedPage<JsonValue>> {
        let mut req = self.client.get(&request.url);
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let continuation = self.continuation_from(&response);

        if status == StatusCode::NOT_MODIFIED && self.config.not_modified_is_caught_up {
            debug!(url = %request.url, "Feed caught up (304)");
            return Ok(FeedPage::no_more_changes(
                Vec::new(),
                continuation.or(request.continuation_token),
            ));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = extract_retry_after(&response);
            warn!(url = %request.url, "Rate limited (429), retry after {retry_after}s");
            return Err(Error::RateLimited {
                retry_after_seconds: retry_after,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        let items = extract_items(&body, &self.config.items_field)?;

        debug!(
            url = %request.url,
            items = items.len(),
            has_continuation = continuation.is_some(),
            "Fetched page"
        );
        Ok(FeedPage::new(items, continuation))
    }
}

impl std::fmt::Debug for HttpPageExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1)
}

/// Pull the items array out of a JSON body
///
/// `path` is a dotted field path (an optional `$.` prefix is ignored). An
/// empty path means the body itself is the array.
pub(crate) fn extract_items(body: &str, path: &str) -> Result<Vec<JsonValue>> {
    let mut value: JsonValue = serde_json::from_str(body)
        .map_err(|e| Error::decode(format!("Response body is not JSON: {e}")))?;

    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = &mut value;
    if !path.is_empty() {
        for part in path.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| Error::decode(format!("Missing field '{part}' in response")))?;
        }
    }

    match current.take() {
        JsonValue::Array(items) => Ok(items),
        JsonValue::Null => Ok(Vec::new()),
        other => Err(Error::decode(format!(
            "Expected an array of items, found {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
