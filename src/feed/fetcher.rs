//! The fetcher state machine
//!
//! One fetcher drives one logical scan. It is pull-based: nothing happens
//! until the caller asks for the next page, and at most one page request is
//! ever in flight.

use super::contract::{PageExecutor, RequestBuilder};
use super::page_size::next_page_size;
use super::termination::TerminationRule;
use super::types::{FeedOptions, FeedPage};
use crate::checkpoint::ScanCheckpoint;
use crate::error::{Error, Result};
use futures::stream::{self, Stream};
use tracing::{debug, trace, warn};

/// Paginated feed fetcher
///
/// State only changes after a page request has fully completed, so a
/// failed or cancelled `next_page` leaves the fetcher exactly as it was and
/// a retry re-issues the identical request.
pub struct Fetcher<B, E> {
    builder: B,
    executor: E,
    options: FeedOptions,
    rule: &'static dyn TerminationRule,
    continuation_token: Option<String>,
    total_items_fetched: u64,
    pages_fetched: u64,
    exhausted: bool,
}

impl<B, E> Fetcher<B, E>
where
    B: RequestBuilder,
    E: PageExecutor<B::Request>,
{
    /// Create a fetcher ready to drive
    ///
    /// Fails fast on invalid options. A query feed with `top == 0` starts out
    /// exhausted and never issues a request.
    pub fn new(builder: B, executor: E, options: FeedOptions) -> Result<Self> {
        options.validate()?;

        let exhausted = options.top_limit() == Some(0);
        if exhausted {
            debug!("top is 0, fetcher starts exhausted");
        }

        Ok(Self {
            builder,
            executor,
            rule: options.kind.termination_rule(),
            continuation_token: options.initial_continuation_token.clone(),
            options,
            total_items_fetched: 0,
            pages_fetched: 0,
            exhausted,
        })
    }

    /// Check if another page may be requested
    pub fn should_fetch_more(&self) -> bool {
        !self.exhausted
    }

    /// Page size the next request would use, `None` once exhausted
    pub fn next_page_size(&self) -> Option<u32> {
        if self.exhausted {
            return None;
        }
        next_page_size(
            self.options.max_page_size(),
            self.options.top_limit(),
            self.total_items_fetched,
        )
    }

    /// Fetch the next page
    ///
    /// Calling this once `should_fetch_more()` is false is an
    /// `Error::IllegalState`. Executor errors are returned as-is.
    pub async fn next_page(&mut self) -> Result<FeedPage<E::Item>> {
        if self.exhausted {
            return Err(Error::illegal_state(
                "next_page called on an exhausted fetcher",
            ));
        }
        let page_size = self.next_page_size().ok_or_else(|| {
            Error::illegal_state(format!(
                "no items left under top={} after {} fetched",
                self.options.top, self.total_items_fetched
            ))
        })?;

        trace!(
            continuation = ?self.continuation_token,
            page_size,
            "Building page request"
        );
        let request = self
            .builder
            .build(self.continuation_token.as_deref(), page_size);

        let page = match self.executor.execute(request).await {
            Ok(page) => page,
            Err(e) => {
                warn!(
                    page = self.pages_fetched + 1,
                    "Page request failed, fetcher state unchanged: {e}"
                );
                return Err(e);
            }
        };

        self.apply(&page);
        Ok(page)
    }

    /// Fold a completed page into the scan state
    fn apply(&mut self, page: &FeedPage<E::Item>) {
        self.total_items_fetched += page.len() as u64;
        self.pages_fetched += 1;
        self.continuation_token = page.continuation_token().map(str::to_owned);
        self.exhausted = self
            .rule
            .evaluate(&page.signals(), &self.options, self.total_items_fetched)
            .should_stop();

        debug!(
            page = self.pages_fetched,
            items = page.len(),
            total = self.total_items_fetched,
            status = ?page.status(),
            exhausted = self.exhausted,
            "Page completed"
        );
    }

    /// Stream pages until the feed is exhausted
    ///
    /// Each page is requested only when the stream is polled. The stream ends
    /// after the first error; the fetcher is left resumable.
    pub fn pages(&mut self) -> impl Stream<Item = Result<FeedPage<E::Item>>> + '_ {
        stream::unfold(Some(self), |fetcher| async move {
            let fetcher = fetcher?;
            if !fetcher.should_fetch_more() {
                return None;
            }
            match fetcher.next_page().await {
                Ok(page) => Some((Ok(page), Some(fetcher))),
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    /// Fetch every remaining page and collect the items in order
    pub async fn drain(&mut self) -> Result<Vec<E::Item>> {
        let mut items = Vec::new();
        while self.should_fetch_more() {
            let page = self.next_page().await?;
            items.extend(page.into_items());
        }
        Ok(items)
    }

    /// Snapshot of the resumable scan state
    pub fn checkpoint(&self) -> ScanCheckpoint {
        ScanCheckpoint {
            kind: self.options.kind,
            continuation_token: self.continuation_token.clone(),
            items_fetched: self.total_items_fetched,
            exhausted: self.exhausted,
        }
    }
}

impl<B, E> Fetcher<B, E> {
    /// Current continuation token
    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    /// Items fetched across all completed pages
    pub fn total_items_fetched(&self) -> u64 {
        self.total_items_fetched
    }

    /// Number of completed pages
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    /// Check if the scan is over
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Options this fetcher was built with
    pub fn options(&self) -> &FeedOptions {
        &self.options
    }
}

impl<B, E> std::fmt::Debug for Fetcher<B, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("options", &self.options)
            .field("rule", &self.rule)
            .field("continuation_token", &self.continuation_token)
            .field("total_items_fetched", &self.total_items_fetched)
            .field("pages_fetched", &self.pages_fetched)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}
