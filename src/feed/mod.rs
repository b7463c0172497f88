//! Feed module
//!
//! Paginated fetch engine for query feeds and change feeds.
//!
//! # Overview
//!
//! A `Fetcher` owns one scan. The caller pulls pages one at a time:
//!
//! ```rust,ignore
//! let mut fetcher = Fetcher::new(builder, executor, FeedOptions::query(100))?;
//! while fetcher.should_fetch_more() {
//!     let page = fetcher.next_page().await?;
//!     handle(page.items());
//! }
//! ```
//!
//! Page sizes are negotiated between the backend maximum
//! (`max_item_count`) and the client cap (`top`). When a scan is over is
//! decided by a `TerminationRule` picked from the `FeedKind`.

mod contract;
mod fetcher;
mod page_size;
mod termination;
mod types;

pub use contract::{PageExecutor, RequestBuilder};
pub use fetcher::Fetcher;
pub use page_size::{next_page_size, remaining_under_top};
pub use termination::{ChangeFeedTermination, QueryFeedTermination, TerminationRule};
pub use types::{
    FeedKind, FeedOptions, FeedPage, PageSignals, StatusSignal, StopResult,
    DEFAULT_MAX_ITEM_COUNT, NO_TOP,
};
