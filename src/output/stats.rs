//! Crawl counters and product statistics
//!
//! [`CrawlStats`] is filled by the coordinator while a crawl runs.
//! [`ProductStatistics`] is read back from the product database for
//! `--stats`.

use crate::storage::{RunRecord, Storage, StorageResult};

/// Counters collected during one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched successfully
    pub pages_fetched: u64,
    /// Page responses that were not HTML
    pub pages_skipped: u64,
    /// Links accepted into the frontier
    pub links_queued: u64,
    /// Links rejected by the link rules or the allowed domains
    pub links_filtered: u64,
    /// Links dropped by the duplicate filter
    pub links_duplicate: u64,
    /// Page requests dropped by robots.txt
    pub robots_denied: u64,
    /// Requests dropped by the depth or page limits
    pub limit_dropped: u64,
    /// Product pages whose SKU could not be extracted
    pub sku_failures: u64,
    /// Stock lookups sent
    pub stock_requests: u64,
    /// Records dropped because the stock lookup failed
    pub stock_failures: u64,
    /// Stock lookups sent again after a failure
    pub stock_retries: u64,
    /// Page fetches that failed
    pub fetch_errors: u64,
    /// Records handed to the sinks
    pub products_emitted: u64,
}

impl CrawlStats {
    /// Logs a one-line summary at info level
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl finished: {} pages fetched, {} products emitted, {} SKU failures, {} stock failures, {} fetch errors",
            self.pages_fetched,
            self.products_emitted,
            self.sku_failures,
            self.stock_failures,
            self.fetch_errors
        );
        tracing::debug!("Crawl counters: {:?}", self);
    }
}

/// Product statistics read from storage
#[derive(Debug, Clone)]
pub struct ProductStatistics {
    /// Total number of stored products
    pub total_products: u64,

    /// Product counts per stock message, most frequent first
    pub by_stock: Vec<(String, u64)>,

    /// Product counts per brand, most frequent first
    pub by_brand: Vec<(String, u64)>,

    /// The most recent crawl run
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<ProductStatistics> {
    Ok(ProductStatistics {
        total_products: storage.count_products()?,
        by_stock: storage.count_by_stock()?,
        by_brand: storage.count_by_brand()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ProductStatistics) {
    println!("=== Product Statistics ===\n");

    if let Some(run) = &stats.latest_run {
        println!("Latest run:");
        println!("  ID: {}", run.id);
        println!("  Status: {}", run.status.to_db_string());
        println!("  Started: {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        println!();
    }

    println!("Total products: {}\n", stats.total_products);

    println!("Products by stock status:");
    for (stock, count) in &stats.by_stock {
        println!(
            "  {}: {} ({:.1}%)",
            stock,
            count,
            percentage(*count, stats.total_products)
        );
    }
    println!();

    if !stats.by_brand.is_empty() {
        println!("Products by brand ({}):", stats.by_brand.len());
        for (brand, count) in &stats.by_brand {
            println!("  {}: {}", brand, count);
        }
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}
