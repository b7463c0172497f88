//! Termination rules
//!
//! Each feed kind decides exhaustion differently. The fetcher looks up the
//! rule once at construction and applies it after every completed page.

use super::types::{FeedKind, FeedOptions, PageSignals, StatusSignal, StopResult};
use std::fmt::Debug;

/// Decides whether a scan is exhausted after a page completes
pub trait TerminationRule: Debug + Send + Sync {
    /// Evaluate the rule against the latest page
    ///
    /// `total_fetched` already includes the page's items.
    fn evaluate(
        &self,
        page: &PageSignals<'_>,
        options: &FeedOptions,
        total_fetched: u64,
    ) -> StopResult;
}

// ============================================================================
// Query Feed
// ============================================================================

/// Query feeds end on an absent/empty token or once `top` is reached
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryFeedTermination;

impl TerminationRule for QueryFeedTermination {
    fn evaluate(
        &self,
        page: &PageSignals<'_>,
        options: &FeedOptions,
        total_fetched: u64,
    ) -> StopResult {
        let top_reached = options
            .top_limit()
            .is_some_and(|top| total_fetched >= top);
        StopResult::from(page.continuation_exhausted() || top_reached)
    }
}

// ============================================================================
// Change Feed
// ============================================================================

/// Change feeds end only when the backend says it is caught up
///
/// Token absence means nothing here and `top` is not honored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeFeedTermination;

impl TerminationRule for ChangeFeedTermination {
    fn evaluate(
        &self,
        page: &PageSignals<'_>,
        _options: &FeedOptions,
        _total_fetched: u64,
    ) -> StopResult {
        StopResult::from(page.status == StatusSignal::NoMoreChanges)
    }
}

impl FeedKind {
    /// The termination rule for this kind of feed
    pub fn termination_rule(self) -> &'static dyn TerminationRule {
        match self {
            FeedKind::Query => &QueryFeedTermination,
            FeedKind::ChangeFeed => &ChangeFeedTermination,
        }
    }
}
