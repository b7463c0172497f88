// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # feedfetch
//!
//! A resumable, pull-based paginated feed fetch engine.
//!
//! ## Features
//!
//! - **Continuation tokens**: Opaque resume points passed back verbatim
//! - **Page-size negotiation**: Client-side `top` cap vs. backend page maximum
//! - **Two termination protocols**: Query feeds and change feeds
//! - **Failure-safe state**: A failed or cancelled page leaves the scan untouched
//! - **Checkpoints**: Persist scan progress and resume later
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use feedfetch::feed::FeedOptions;
//! use feedfetch::http::{http_fetcher, HttpFeedConfig};
//!
//! #[tokio::main]
//! async fn main() -> feedfetch::Result<()> {
//!     let config = HttpFeedConfig::new("https://db.example.com/colls/orders/docs");
//!     let mut fetcher = http_fetcher(config, FeedOptions::query(100).with_top(500))?;
//!
//!     while fetcher.should_fetch_more() {
//!         let page = fetcher.next_page().await?;
//!         println!("{} items", page.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Fetcher                             │
//! │  should_fetch_more() → bool     next_page() → FeedPage       │
//! └──────────────────────────────────────────────────────────────┘
//!          │                  │                     │
//! ┌────────┴───────┬──────────┴─────────┬───────────┴──────────┐
//! │ RequestBuilder │   PageExecutor     │  TerminationRule     │
//! ├────────────────┼────────────────────┼──────────────────────┤
//! │ (token, size)  │ request → page     │ Query: token / top   │
//! │  → request     │ (HTTP adapter)     │ Change: caught up    │
//! └────────────────┴────────────────────┴──────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Fetch engine: options, pages, termination rules, the fetcher
pub mod feed;

/// Scan checkpoints and their persistence
pub mod checkpoint;

/// HTTP adapter for the fetcher's collaborators
pub mod http;

/// Scan definitions
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use feed::{FeedKind, FeedOptions, FeedPage, Fetcher, PageExecutor, RequestBuilder, StatusSignal};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
