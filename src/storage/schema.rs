//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Hermes database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Indexed pages, one row per normalized URL
CREATE TABLE IF NOT EXISTS documents (
    url TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    domain TEXT NOT NULL,
    fetched_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_domain ON documents(domain);

-- Registered domains and their page counts
CREATE TABLE IF NOT EXISTS domains (
    domain TEXT PRIMARY KEY,
    added_at TEXT NOT NULL,
    last_crawled TEXT,
    page_count INTEGER NOT NULL DEFAULT 0
);

-- Questions and answers, in order
CREATE TABLE IF NOT EXISTS chat_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    sources TEXT NOT NULL DEFAULT '[]',
    domain TEXT,
    created_at TEXT NOT NULL
);

-- Persisted crawl settings (single row)
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    max_pages_per_crawl INTEGER NOT NULL,
    crawl_delay_ms INTEGER NOT NULL,
    respect_robots_txt INTEGER NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
