//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::item::ProductRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::path::Path;

const PRODUCT_COLUMNS: &str = "url, sku, title, brand, description, category, image_urls, \
     product_type, finition, variure, details, stock";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path` and ensures the schema exists
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn query_products<P: Params>(&self, sql: &str, params: P) -> StorageResult<Vec<ProductRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, ProductRow::from_row)?;
        let products: StorageResult<Vec<ProductRecord>> =
            rows.map(|row| row?.into_record()).collect();
        products
    }

    fn query_counts(&self, sql: &str) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })?;
        let counts: Result<Vec<_>, rusqlite::Error> = rows.collect();
        Ok(counts?)
    }

    fn read_run(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
        Ok(RunRecord {
            id: row.get(0)?,
            started_at: row.get(1)?,
            finished_at: row.get(2)?,
            config_hash: row.get(3)?,
            status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
                .unwrap_or(RunStatus::Running),
        })
    }
}

/// A products row before its JSON columns are decoded
struct ProductRow {
    url: String,
    sku: String,
    title: Option<String>,
    brand: Option<String>,
    description: Option<String>,
    category: String,
    image_urls: Option<String>,
    product_type: Option<String>,
    finition: Option<String>,
    variure: Option<String>,
    details: String,
    stock: String,
}

impl ProductRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            url: row.get(0)?,
            sku: row.get(1)?,
            title: row.get(2)?,
            brand: row.get(3)?,
            description: row.get(4)?,
            category: row.get(5)?,
            image_urls: row.get(6)?,
            product_type: row.get(7)?,
            finition: row.get(8)?,
            variure: row.get(9)?,
            details: row.get(10)?,
            stock: row.get(11)?,
        })
    }

    fn into_record(self) -> StorageResult<ProductRecord> {
        Ok(ProductRecord {
            url: self.url,
            title: self.title,
            brand: self.brand,
            description: self.description,
            category: serde_json::from_str(&self.category)?,
            image_urls: self.image_urls,
            sku: self.sku,
            product_type: self.product_type,
            finition: self.finition,
            variure: self.variure,
            details: serde_json::from_str(&self.details)?,
            stock: self.stock,
        })
    }
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                Self::read_run,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                Self::read_run,
            )
            .optional()?;
        Ok(run)
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Products =====

    fn upsert_product(&mut self, run_id: i64, product: &ProductRecord) -> StorageResult<()> {
        let category = serde_json::to_string(&product.category)?;
        let details = serde_json::to_string(&product.details)?;
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO products (url, sku, title, brand, description, category, image_urls,
                 product_type, finition, variure, details, stock, run_id, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(url) DO UPDATE SET
                 sku = excluded.sku,
                 title = excluded.title,
                 brand = excluded.brand,
                 description = excluded.description,
                 category = excluded.category,
                 image_urls = excluded.image_urls,
                 product_type = excluded.product_type,
                 finition = excluded.finition,
                 variure = excluded.variure,
                 details = excluded.details,
                 stock = excluded.stock,
                 run_id = excluded.run_id,
                 scraped_at = excluded.scraped_at",
            params![
                product.url,
                product.sku,
                product.title,
                product.brand,
                product.description,
                category,
                product.image_urls,
                product.product_type,
                product.finition,
                product.variure,
                details,
                product.stock,
                run_id,
                now,
            ],
        )?;
        Ok(())
    }

    fn get_product_by_url(&self, url: &str) -> StorageResult<Option<ProductRecord>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE url = ?1");
        Ok(self.query_products(&sql, params![url])?.into_iter().next())
    }

    // ===== Statistics =====

    fn count_products(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_by_stock(&self) -> StorageResult<Vec<(String, u64)>> {
        self.query_counts(
            "SELECT stock, COUNT(*) AS n FROM products GROUP BY stock ORDER BY n DESC, stock ASC",
        )
    }

    fn count_by_brand(&self) -> StorageResult<Vec<(String, u64)>> {
        self.query_counts(
            "SELECT brand, COUNT(*) AS n FROM products WHERE brand IS NOT NULL
             GROUP BY brand ORDER BY n DESC, brand ASC",
        )
    }
}
