//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::config::CrawlSettings;
use crate::document::{Document, Source};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{ChatMessage, ChatRole, DomainRecord, NewChatMessage};
use crate::HermesError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const DOCUMENT_COLUMNS: &str = "url, title, content, description, domain, fetched_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(HermesError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, HermesError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, HermesError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    // ===== Documents =====

    fn put_document(&mut self, document: &Document) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        write_document(&tx, document)?;
        tx.commit()?;
        Ok(())
    }

    fn put_documents(&mut self, documents: &[Document]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        for document in documents {
            write_document(&tx, document)?;
        }
        tx.commit()?;

        tracing::debug!("Stored {} documents", documents.len());
        Ok(documents.len())
    }

    fn get_document(&self, url: &str) -> StorageResult<Option<Document>> {
        let document = self
            .conn
            .query_row(
                &format!("SELECT {} FROM documents WHERE url = ?1", DOCUMENT_COLUMNS),
                params![url],
                row_to_document,
            )
            .optional()?;

        Ok(document)
    }

    fn get_documents(&self, domain: Option<&str>) -> StorageResult<Vec<Document>> {
        let documents = match domain {
            Some(domain) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {} FROM documents WHERE domain = ?1 ORDER BY rowid",
                    DOCUMENT_COLUMNS
                ))?;
                let rows = stmt.query_map(params![domain], row_to_document)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {} FROM documents ORDER BY rowid",
                    DOCUMENT_COLUMNS
                ))?;
                let rows = stmt.query_map([], row_to_document)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(documents)
    }

    fn count_documents(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Domains =====

    fn add_domain(&mut self, domain: &str) -> StorageResult<()> {
        touch_domain(&self.conn, domain)?;
        Ok(())
    }

    fn get_domains(&self) -> StorageResult<Vec<DomainRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT domain, added_at, last_crawled, page_count FROM domains ORDER BY added_at, domain",
        )?;

        let domains = stmt
            .query_map([], |row| {
                let last_crawled: Option<String> = row.get(2)?;
                Ok(DomainRecord {
                    domain: row.get(0)?,
                    added_at: parse_timestamp(1, row.get(1)?)?,
                    last_crawled: last_crawled.map(|s| parse_timestamp(2, s)).transpose()?,
                    page_count: row.get::<_, i64>(3)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(domains)
    }

    fn remove_domain(&mut self, domain: &str) -> StorageResult<u64> {
        let tx = self.conn.transaction()?;

        let removed_documents = tx.execute("DELETE FROM documents WHERE domain = ?1", params![domain])?;
        let removed_domains = tx.execute("DELETE FROM domains WHERE domain = ?1", params![domain])?;

        if removed_documents == 0 && removed_domains == 0 {
            return Err(StorageError::NotFound(format!("Domain {}", domain)));
        }

        tx.commit()?;
        tracing::info!("Removed domain {} ({} documents)", domain, removed_documents);
        Ok(removed_documents as u64)
    }

    fn count_domains(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM domains", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn clear_all(&mut self) -> StorageResult<()> {
        self.conn
            .execute_batch("DELETE FROM documents; DELETE FROM domains;")?;
        Ok(())
    }

    // ===== Chat History =====

    fn add_chat_message(&mut self, message: &NewChatMessage) -> StorageResult<i64> {
        let sources = serde_json::to_string(&message.sources)?;
        let now = timestamp(&Utc::now());

        self.conn.execute(
            "INSERT INTO chat_history (role, content, sources, domain, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.role.to_db_string(),
                message.content,
                sources,
                message.domain,
                now
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_chat_history(&self) -> StorageResult<Vec<ChatMessage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, role, content, sources, domain, created_at FROM chat_history ORDER BY id",
        )?;

        let messages = stmt
            .query_map([], |row| {
                let sources: String = row.get(3)?;
                Ok(ChatMessage {
                    id: row.get(0)?,
                    role: parse_role(1, row.get(1)?)?,
                    content: row.get(2)?,
                    sources: serde_json::from_str::<Vec<Source>>(&sources).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
                    })?,
                    domain: row.get(4)?,
                    created_at: parse_timestamp(5, row.get(5)?)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(messages)
    }

    fn clear_chat_history(&mut self) -> StorageResult<()> {
        self.conn.execute("DELETE FROM chat_history", [])?;
        Ok(())
    }

    // ===== Settings =====

    fn get_settings(&self) -> StorageResult<Option<CrawlSettings>> {
        let settings = self
            .conn
            .query_row(
                "SELECT max_pages_per_crawl, crawl_delay_ms, respect_robots_txt FROM settings WHERE id = 1",
                [],
                |row| {
                    Ok(CrawlSettings {
                        max_pages_per_crawl: row.get(0)?,
                        crawl_delay_ms: row.get::<_, i64>(1)? as u64,
                        respect_robots_txt: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(settings)
    }

    fn update_settings(&mut self, settings: &CrawlSettings) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO settings (id, max_pages_per_crawl, crawl_delay_ms, respect_robots_txt)
             VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                max_pages_per_crawl = excluded.max_pages_per_crawl,
                crawl_delay_ms = excluded.crawl_delay_ms,
                respect_robots_txt = excluded.respect_robots_txt",
            params![
                settings.max_pages_per_crawl,
                settings.crawl_delay_ms as i64,
                settings.respect_robots_txt
            ],
        )?;
        Ok(())
    }
}

/// Upserts a document and refreshes its domain's stats
fn write_document(conn: &Connection, document: &Document) -> Result<(), rusqlite::Error> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO documents ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            DOCUMENT_COLUMNS
        ),
        params![
            document.url,
            document.title,
            document.content,
            document.description,
            document.domain,
            timestamp(&document.fetched_at)
        ],
    )?;

    touch_domain(conn, &document.domain)?;

    Ok(())
}

/// Registers a domain or refreshes its crawl time and page count
///
/// `page_count` is recounted from the documents table on every call.
fn touch_domain(conn: &Connection, domain: &str) -> Result<(), rusqlite::Error> {
    let now = timestamp(&Utc::now());
    conn.execute(
        "INSERT INTO domains (domain, added_at, last_crawled, page_count)
         VALUES (?1, ?2, ?2, (SELECT COUNT(*) FROM documents WHERE domain = ?1))
         ON CONFLICT(domain) DO UPDATE SET
            last_crawled = excluded.last_crawled,
            page_count = excluded.page_count",
        params![domain, now],
    )?;
    Ok(())
}

fn parse_role(column: usize, value: String) -> Result<ChatRole, rusqlite::Error> {
    ChatRole::from_db_string(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            Type::Text,
            format!("unknown chat role '{}'", value).into(),
        )
    })
}

fn row_to_document(row: &Row<'_>) -> Result<Document, rusqlite::Error> {
    Ok(Document {
        url: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        description: row.get(3)?,
        domain: row.get(4)?,
        fetched_at: parse_timestamp(5, row.get(5)?)?,
    })
}

/// Fixed-width RFC 3339 so stored timestamps sort as text
fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(column: usize, value: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
