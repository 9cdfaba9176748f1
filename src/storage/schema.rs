//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the product database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- One row per product page; re-crawls overwrite the row
CREATE TABLE IF NOT EXISTS products (
    url TEXT PRIMARY KEY,
    sku TEXT NOT NULL,
    title TEXT,
    brand TEXT,
    description TEXT,
    category TEXT NOT NULL DEFAULT '[]',
    image_urls TEXT,
    product_type TEXT,
    finition TEXT,
    variure TEXT,
    details TEXT NOT NULL DEFAULT '{}',
    stock TEXT NOT NULL,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    scraped_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_sku ON products(sku);
CREATE INDEX IF NOT EXISTS idx_products_brand ON products(brand);
CREATE INDEX IF NOT EXISTS idx_products_run ON products(run_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
