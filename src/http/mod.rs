//! HTTP feed adapter
//!
//! Implements the fetcher's collaborator contracts over plain HTTP.
//!
//! # Features
//!
//! - **Request building**: Continuation token and page size travel in
//!   configurable request headers
//! - **Page execution**: One GET per page, items read from a JSON body field
//! - **Change feeds**: `304 Not Modified` means the feed is caught up; a
//!   query feed gets it as a status error
//! - **Error classification**: 429, timeouts and error statuses map onto
//!   distinct `Error` variants so an outer retry layer can tell them apart
//!
//! The adapter never retries; a failed page surfaces to the fetcher's
//! caller unchanged.

mod client;
mod request;

pub use client::{HttpFeedConfig, HttpFeedConfigBuilder, HttpPageExecutor};
pub use request::{HttpFeedRequest, HttpRequestBuilder};

use crate::error::Result;
use crate::feed::{FeedOptions, Fetcher};
use std::sync::Arc;

/// Fetcher driven over HTTP
pub type HttpFetcher = Fetcher<HttpRequestBuilder, HttpPageExecutor>;

/// Build a fetcher for an HTTP feed
///
/// `304 Not Modified` handling follows the feed kind in `options`.
pub fn http_fetcher(mut config: HttpFeedConfig, options: FeedOptions) -> Result<HttpFetcher> {
    config.not_modified_is_caught_up = options.is_change_feed();
    let config = Arc::new(config);
    let builder = HttpRequestBuilder::new(Arc::clone(&config));
    let executor = HttpPageExecutor::new(config)?;
    Fetcher::new(builder, executor, options)
}
