//! Item sink trait and output errors

use crate::item::ProductRecord;
use crate::storage::{RunStatus, StorageError};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for finished product records
///
/// Each record is handed to every sink exactly once, in emission order.
pub trait ItemSink {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Writes one finished record
    fn write_item(&mut self, record: &ProductRecord) -> OutputResult<()>;

    /// Flushes buffered output once the crawl has ended
    ///
    /// # Arguments
    ///
    /// * `status` - How the crawl run ended
    fn finish(&mut self, status: RunStatus) -> OutputResult<()>;
}
