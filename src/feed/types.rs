//! Feed types
//!
//! Data shapes shared by the fetcher and its collaborators: per-scan
//! options, the page produced by one round trip, and the signals used to
//! decide when a scan is over.

use crate::checkpoint::ScanCheckpoint;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Sentinel `top` value meaning "no cap on total results"
pub const NO_TOP: i64 = -1;

/// Default number of items requested per page
pub const DEFAULT_MAX_ITEM_COUNT: i32 = 100;

// ============================================================================
// Feed Kind
// ============================================================================

/// Which termination protocol a feed follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// Snapshot query; ends when the backend stops issuing continuation tokens
    #[default]
    Query,
    /// Ordered change log; "ends" when the backend reports it is caught up
    ChangeFeed,
}

impl FeedKind {
    /// Check if this is a change feed
    pub fn is_change_feed(self) -> bool {
        matches!(self, Self::ChangeFeed)
    }
}

// ============================================================================
// Status Signal
// ============================================================================

/// Backend status attached to every page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSignal {
    /// Ordinary page
    #[default]
    Ok,
    /// Change feed is caught up; the continuation token stays resumable
    NoMoreChanges,
}

// ============================================================================
// Feed Options
// ============================================================================

/// Per-scan configuration, fixed for the lifetime of a fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedOptions {
    /// Resume point; `None` starts from the beginning
    #[serde(default)]
    pub initial_continuation_token: Option<String>,
    /// Largest batch the backend may return per page
    #[serde(default = "default_max_item_count")]
    pub max_item_count: i32,
    /// Total result cap across the scan, `NO_TOP` for none
    #[serde(default = "default_top")]
    pub top: i64,
    /// Termination protocol
    #[serde(default)]
    pub kind: FeedKind,
}

fn default_max_item_count() -> i32 {
    DEFAULT_MAX_ITEM_COUNT
}

fn default_top() -> i64 {
    NO_TOP
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            initial_continuation_token: None,
            max_item_count: DEFAULT_MAX_ITEM_COUNT,
            top: NO_TOP,
            kind: FeedKind::Query,
        }
    }
}

impl FeedOptions {
    /// Create options for a query feed with the given page size
    pub fn query(max_item_count: i32) -> Self {
        Self {
            max_item_count,
            ..Default::default()
        }
    }

    /// Create options for a change feed with the given page size
    pub fn change_feed(max_item_count: i32) -> Self {
        Self {
            max_item_count,
            kind: FeedKind::ChangeFeed,
            ..Default::default()
        }
    }

    /// Set the resume token
    #[must_use]
    pub fn with_continuation_token(mut self, token: impl Into<String>) -> Self {
        self.initial_continuation_token = Some(token.into());
        self
    }

    /// Set the total result cap (`NO_TOP` to clear it)
    #[must_use]
    pub fn with_top(mut self, top: i64) -> Self {
        self.top = top;
        self
    }

    /// Check if these options describe a change feed
    pub fn is_change_feed(&self) -> bool {
        self.kind.is_change_feed()
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.max_item_count <= 0 {
            return Err(Error::invalid_value(
                "max_item_count",
                format!("must be positive, got {}", self.max_item_count),
            ));
        }
        if self.top < NO_TOP {
            return Err(Error::invalid_value(
                "top",
                format!("must be {NO_TOP} or non-negative, got {}", self.top),
            ));
        }
        Ok(())
    }

    /// Largest page size as an unsigned count
    ///
    /// Only meaningful on validated options.
    pub fn max_page_size(&self) -> u32 {
        self.max_item_count.max(1) as u32
    }

    /// The cap that actually applies to this scan
    ///
    /// Change feeds are never capped.
    pub fn top_limit(&self) -> Option<u64> {
        if self.is_change_feed() || self.top < 0 {
            None
        } else {
            Some(self.top as u64)
        }
    }

    /// Build options that pick up where a checkpoint left off
    ///
    /// The checkpoint's token replaces the initial token and any query-feed
    /// cap is reduced by what the checkpointed scan already fetched.
    #[must_use]
    pub fn resume_from(&self, checkpoint: &ScanCheckpoint) -> Self {
        let top = match self.top_limit() {
            Some(top) => top.saturating_sub(checkpoint.items_fetched) as i64,
            None => self.top,
        };
        Self {
            initial_continuation_token: checkpoint.continuation_token.clone(),
            top,
            ..self.clone()
        }
    }
}

// ============================================================================
// Feed Page
// ============================================================================

/// Result of one successful page execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage<T> {
    items: Vec<T>,
    continuation_token: Option<String>,
    status: StatusSignal,
}

impl<T> FeedPage<T> {
    /// Create an ordinary page
    pub fn new(items: Vec<T>, continuation_token: Option<String>) -> Self {
        Self {
            items,
            continuation_token,
            status: StatusSignal::Ok,
        }
    }

    /// Create a change-feed page signalling that the feed is caught up
    pub fn no_more_changes(items: Vec<T>, continuation_token: Option<String>) -> Self {
        Self {
            items,
            continuation_token,
            status: StatusSignal::NoMoreChanges,
        }
    }

    /// Replace the status signal
    #[must_use]
    pub fn with_status(mut self, status: StatusSignal) -> Self {
        self.status = status;
        self
    }

    /// Items in backend order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Take ownership of the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of items in this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resume point for the next page, exactly as the backend sent it
    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    /// Check if the page carries a usable (non-empty) continuation token
    pub fn has_continuation(&self) -> bool {
        self.continuation_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    /// Backend status signal
    pub fn status(&self) -> StatusSignal {
        self.status
    }

    /// The parts of the page a termination rule may look at
    pub fn signals(&self) -> PageSignals<'_> {
        PageSignals {
            continuation_token: self.continuation_token(),
            status: self.status,
        }
    }
}

/// Item-independent view of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSignals<'a> {
    /// Continuation token as returned
    pub continuation_token: Option<&'a str>,
    /// Status signal as returned
    pub status: StatusSignal,
}

impl PageSignals<'_> {
    /// Check if the token is absent or empty
    pub fn continuation_exhausted(&self) -> bool {
        self.continuation_token.map_or(true, str::is_empty)
    }
}

// ============================================================================
// Stop Result
// ============================================================================

/// Verdict of a termination rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Keep fetching
    Continue,
    /// The scan is exhausted
    Stop,
}

impl StopResult {
    /// Check if we should continue
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if we should stop
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

impl From<bool> for StopResult {
    fn from(stop: bool) -> Self {
        if stop {
            Self::Stop
        } else {
            Self::Continue
        }
    }
}
