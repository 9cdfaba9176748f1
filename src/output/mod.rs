//! Output module for emitted product records
//!
//! This module handles:
//! - The [`ItemSink`] interface records are emitted through
//! - The JSON Lines feed and the SQLite product table
//! - Crawl counters and product statistics

mod jsonl;
mod sqlite_output;
pub mod stats;
mod traits;

pub use jsonl::JsonLinesSink;
pub use sqlite_output::SqliteSink;
pub use stats::{load_statistics, print_statistics, CrawlStats, ProductStatistics};
pub use traits::{ItemSink, OutputError, OutputResult};

use crate::config::OutputConfig;
use crate::storage::open_storage;
use std::path::Path;

/// Builds the sinks named by the output configuration
///
/// # Arguments
///
/// * `config` - The output configuration
/// * `config_hash` - Hash recorded with the run in the product database
pub fn build_sinks(config: &OutputConfig, config_hash: &str) -> OutputResult<Vec<Box<dyn ItemSink>>> {
    let mut sinks: Vec<Box<dyn ItemSink>> = Vec::new();

    if let Some(path) = &config.jsonl_path {
        tracing::info!("Writing products to {}", path);
        sinks.push(Box::new(JsonLinesSink::create(Path::new(path))?));
    }

    if let Some(path) = &config.database_path {
        tracing::info!("Storing products in {}", path);
        let storage = open_storage(Path::new(path))?;
        sinks.push(Box::new(SqliteSink::new(storage, config_hash)?));
    }

    if sinks.is_empty() {
        tracing::warn!("No output configured; extracted products will only be counted");
    }

    Ok(sinks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_both_sinks() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            jsonl_path: Some(dir.path().join("p.jsonl").display().to_string()),
            database_path: Some(dir.path().join("p.db").display().to_string()),
        };

        let sinks = build_sinks(&config, "hash").unwrap();
        let names: Vec<&str> = sinks.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["jsonl", "sqlite"]);
    }

    #[test]
    fn test_build_no_sinks() {
        let config = OutputConfig {
            jsonl_path: None,
            database_path: None,
        };
        assert!(build_sinks(&config, "hash").unwrap().is_empty());
    }
}
