//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::item::ProductRecord;
use crate::storage::{RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run and returns its ID
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Updates the status of a run, setting its finish time
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Products =====

    /// Inserts a product or replaces the row with the same URL
    fn upsert_product(&mut self, run_id: i64, product: &ProductRecord) -> StorageResult<()>;

    /// Gets a product by page URL
    fn get_product_by_url(&self, url: &str) -> StorageResult<Option<ProductRecord>>;

    // ===== Statistics =====

    /// Gets total product count
    fn count_products(&self) -> StorageResult<u64>;

    /// Product counts per stock message, most frequent first
    fn count_by_stock(&self) -> StorageResult<Vec<(String, u64)>>;

    /// Product counts per brand, most frequent first; products without a
    /// brand are not counted
    fn count_by_brand(&self) -> StorageResult<Vec<(String, u64)>>;
}
