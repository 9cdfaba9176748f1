//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and response classification
//! - HTML link extraction
//! - Request scheduling, politeness delays and concurrency limits
//! - Overall crawl coordination, including the chained stock lookups

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_url, is_html, FetchResult, MAX_REDIRECTS};
pub use parser::extract_links;
pub use scheduler::{Next, Request, RequestKind, ScheduledRequest, Scheduler};

use crate::config::Config;
use crate::output::{build_sinks, CrawlStats};

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the configured output sinks
/// 2. Build the HTTP client and seed the frontier
/// 3. Fetch pages, follow links and chain stock lookups
/// 4. Emit every completed product record
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration, recorded with the run
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Crawl completed; counters for the run
/// * `Err(CrawlError)` - Crawl could not start or an output failed
pub async fn crawl(config: Config, config_hash: &str) -> crate::Result<CrawlStats> {
    let sinks = build_sinks(&config.output, config_hash)?;
    Coordinator::new(config, sinks)?.run().await
}
