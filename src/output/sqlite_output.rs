//! SQLite product table sink

use crate::item::ProductRecord;
use crate::output::traits::{ItemSink, OutputResult};
use crate::storage::{RunStatus, Storage};

/// Upserts each record into the products table of a storage backend
///
/// A run row is opened when the sink is created and closed by `finish`.
pub struct SqliteSink<S: Storage> {
    storage: S,
    run_id: i64,
}

impl<S: Storage> SqliteSink<S> {
    /// Starts a new run in `storage`
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backend to write to
    /// * `config_hash` - Hash of the configuration the run was started with
    pub fn new(mut storage: S, config_hash: &str) -> OutputResult<Self> {
        let run_id = storage.create_run(config_hash)?;
        tracing::debug!("Started run {} in product database", run_id);
        Ok(Self { storage, run_id })
    }

    /// Id of the run this sink writes to
    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage> ItemSink for SqliteSink<S> {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn write_item(&mut self, record: &ProductRecord) -> OutputResult<()> {
        self.storage.upsert_product(self.run_id, record)?;
        Ok(())
    }

    fn finish(&mut self, status: RunStatus) -> OutputResult<()> {
        self.storage.finish_run(self.run_id, status)?;
        tracing::debug!(
            "Run {} recorded as {}",
            self.run_id(),
            status.to_db_string()
        );
        Ok(())
    }
}
