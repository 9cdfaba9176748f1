//! AFDB product crawler
//!
//! This crate crawls the AFDB e-commerce site, extracts product records from
//! product pages and completes each record with a lookup against the site's
//! stock-status API before handing it to the configured output sinks.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod item;
pub mod output;
pub mod robots;
pub mod state;
pub mod stock;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Extraction error for {url}: {source}")]
    Extract { url: String, source: ExtractError },

    #[error("Stock lookup error for SKU {sku}: {source}")]
    Stock { sku: String, source: StockError },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Errors raised while extracting a product from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Structured product data script not found")]
    MissingStructuredData,

    #[error("Structured product data is not valid JSON: {0}")]
    MalformedStructuredData(#[from] serde_json::Error),

    #[error("Structured product data has no usable 'sku' field")]
    MissingSku,
}

/// Errors raised while building or reading a stock lookup
#[derive(Debug, Error)]
pub enum StockError {
    #[error("Invalid stock endpoint: {0}")]
    InvalidEndpoint(#[from] ::url::ParseError),

    #[error("Stock response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stock response is missing {0}")]
    Shape(&'static str),

    #[error("Record cannot be completed: {0}")]
    Record(#[from] ExtractError),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::item::{PartialRecord, ProductRecord};
pub use crate::state::{DomainState, RecordState};
pub use crate::url::{classify_link, extract_domain, normalize_url, LinkDecision};
