//! Scan configuration
//!
//! A scan definition names a feed endpoint and the options to drive it
//! with. Definitions are YAML (or JSON, picked by file extension):
//!
//! ```yaml
//! name: orders
//! url: https://db.example.com/colls/orders/docs
//! kind: change_feed
//! max_item_count: 100
//! top: -1
//! http:
//!   continuation_header: x-continuation
//!   items_field: items
//!   timeout_secs: 30
//!   headers:
//!     Authorization: Bearer ...
//! ```

use crate::error::{Error, Result};
use crate::feed::{FeedKind, FeedOptions, DEFAULT_MAX_ITEM_COUNT, NO_TOP};
use crate::http::HttpFeedConfig;
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Scan Config
// ============================================================================

/// Complete scan definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Scan name, also the checkpoint key
    pub name: String,

    /// Feed endpoint
    pub url: String,

    /// Feed kind
    #[serde(default)]
    pub kind: FeedKind,

    /// Largest page the backend may return
    #[serde(default = "default_max_item_count")]
    pub max_item_count: i32,

    /// Total result cap, -1 for none
    #[serde(default = "default_top")]
    pub top: i64,

    /// Token to start from
    #[serde(default)]
    pub continuation_token: Option<String>,

    /// HTTP wire settings
    #[serde(default)]
    pub http: HttpSettings,
}

fn default_max_item_count() -> i32 {
    DEFAULT_MAX_ITEM_COUNT
}

fn default_top() -> i64 {
    NO_TOP
}

/// HTTP wire settings for a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Header carrying the continuation token (both directions)
    #[serde(default = "default_continuation_header")]
    pub continuation_header: String,

    /// Response header override for the continuation token
    #[serde(default)]
    pub continuation_response_header: Option<String>,

    /// Header carrying the page size
    #[serde(default = "default_page_size_header")]
    pub page_size_header: String,

    /// Path to the items array in the body
    #[serde(default = "default_items_field")]
    pub items_field: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: StringMap,
}

fn default_continuation_header() -> String {
    "x-continuation".to_string()
}

fn default_page_size_header() -> String {
    "x-max-item-count".to_string()
}

fn default_items_field() -> String {
    "items".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            continuation_header: default_continuation_header(),
            continuation_response_header: None,
            page_size_header: default_page_size_header(),
            items_field: default_items_field(),
            timeout_secs: default_timeout_secs(),
            headers: StringMap::new(),
        }
    }
}

impl ScanConfig {
    /// Validate the definition
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::missing_field("name"));
        }
        if self.url.trim().is_empty() {
            return Err(Error::missing_field("url"));
        }
        url::Url::parse(&self.url)?;

        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be positive"));
        }
        if self.http.continuation_header.is_empty() {
            return Err(Error::invalid_value(
                "http.continuation_header",
                "cannot be empty",
            ));
        }
        if self.http.page_size_header.is_empty() {
            return Err(Error::invalid_value("http.page_size_header", "cannot be empty"));
        }

        self.feed_options().validate()
    }

    /// Fetcher options described by this scan
    pub fn feed_options(&self) -> FeedOptions {
        FeedOptions {
            initial_continuation_token: self.continuation_token.clone(),
            max_item_count: self.max_item_count,
            top: self.top,
            kind: self.kind,
        }
    }

    /// HTTP adapter settings described by this scan
    pub fn http_config(&self) -> HttpFeedConfig {
        let mut builder = HttpFeedConfig::builder(&self.url)
            .continuation_header(&self.http.continuation_header)
            .page_size_header(&self.http.page_size_header)
            .items_field(&self.http.items_field)
            .not_modified_is_caught_up(self.kind.is_change_feed())
            .timeout(Duration::from_secs(self.http.timeout_secs));

        if let Some(name) = &self.http.continuation_response_header {
            builder = builder.continuation_response_header(name);
        }
        for (key, value) in &self.http.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a scan definition from a YAML or JSON file
pub fn load_scan(path: impl AsRef<Path>) -> Result<ScanConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read scan file '{}': {e}",
                path.display()
            ))
        }
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_scan_from_json(&content)
    } else {
        load_scan_from_str(&content)
    }
}

/// Load a scan definition from a YAML string
pub fn load_scan_from_str(yaml: &str) -> Result<ScanConfig> {
    let config: ScanConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

/// Load a scan definition from a JSON string
pub fn load_scan_from_json(json: &str) -> Result<ScanConfig> {
    let config: ScanConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}
