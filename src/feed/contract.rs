//! Collaborator contracts
//!
//! The fetcher never sees the transport. It asks a `RequestBuilder` for an
//! opaque request and hands that request, untouched, to a `PageExecutor`.

use super::types::FeedPage;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Builds an opaque request for one page
///
/// Must be pure: no I/O, no hidden state. `page_size` is always positive.
pub trait RequestBuilder: Send + Sync {
    /// Backend-specific request type
    type Request: Send + 'static;

    /// Build the request for the page starting at `continuation_token`
    fn build(&self, continuation_token: Option<&str>, page_size: u32) -> Self::Request;
}

impl<F, R> RequestBuilder for F
where
    F: Fn(Option<&str>, u32) -> R + Send + Sync,
    R: Send + 'static,
{
    type Request = R;

    fn build(&self, continuation_token: Option<&str>, page_size: u32) -> R {
        self(continuation_token, page_size)
    }
}

/// Executes a request and yields one page
///
/// Any failure is reported as an error; the fetcher does not look at which
/// kind.
#[async_trait]
pub trait PageExecutor<R: Send + 'static>: Send + Sync {
    /// Record type carried by pages
    type Item: Send;

    /// Perform the round trip
    async fn execute(&self, request: R) -> Result<FeedPage<Self::Item>>;
}

#[async_trait]
impl<R, E> PageExecutor<R> for Arc<E>
where
    R: Send + 'static,
    E: PageExecutor<R> + ?Sized,
{
    type Item = E::Item;

    async fn execute(&self, request: R) -> Result<FeedPage<Self::Item>> {
        (**self).execute(request).await
    }
}
