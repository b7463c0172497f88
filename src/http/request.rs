//! HTTP request building

use super::client::HttpFeedConfig;
use crate::feed::RequestBuilder;
use crate::types::StringMap;
use std::sync::Arc;

/// A ready-to-send page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFeedRequest {
    /// Feed URL
    pub url: String,
    /// Request-specific headers (continuation, page size)
    pub headers: StringMap,
    /// Token this request resumes from
    pub continuation_token: Option<String>,
    /// Requested page size
    pub page_size: u32,
}

/// Builds `HttpFeedRequest`s from a feed configuration
#[derive(Debug, Clone)]
pub struct HttpRequestBuilder {
    config: Arc<HttpFeedConfig>,
}

impl HttpRequestBuilder {
    /// Create a new request builder
    pub fn new(config: Arc<HttpFeedConfig>) -> Self {
        Self { config }
    }
}

impl RequestBuilder for HttpRequestBuilder {
    type Request = HttpFeedRequest;

    fn build(&self, continuation_token: Option<&str>, page_size: u32) -> HttpFeedRequest {
        let mut headers = StringMap::new();
        headers.insert(self.config.page_size_header.clone(), page_size.to_string());
        // The token goes out byte-for-byte; an empty one is still sent
        if let Some(token) = continuation_token {
            headers.insert(
                self.config.continuation_request_header.clone(),
                token.to_string(),
            );
        }

        HttpFeedRequest {
            url: self.config.url.clone(),
            headers,
            continuation_token: continuation_token.map(str::to_owned),
            page_size,
        }
    }
}
