//! SQLite persistence for notices
//!
//! One table holds the durable notices keyed by the `(title, url)` identity
//! pair. Writes go through a conflict-aware bulk upsert that only ever
//! touches the `date` column on conflict, so identity fields and
//! `created_at` are immutable once a row exists and an unchanged date is a
//! no-op write.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};

use crate::models::{Notice, StoredNotice, UNKNOWN_DATE};

/// SQLite-backed notice store
///
/// Uses a `Mutex` to keep the connection thread-safe; the write volume of an
/// ingestion run is far below the point where that serialization matters.
pub struct NoticeStore {
    conn: Mutex<Connection>,
}

impl NoticeStore {
    /// Open (creating if needed) the store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).context("Failed to open SQLite database")?;

        // WAL mode lets the read API serve queries while a run is writing
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;

        tracing::info!(path = %path.display(), "notice store initialized");
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory SQLite")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS notices (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    url TEXT NOT NULL,
                    date TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    UNIQUE(title, url)
                );

                CREATE INDEX IF NOT EXISTS idx_notices_date
                    ON notices(date);
                "#,
        )
        .context("Failed to create SQLite schema")?;

        Ok(())
    }

    /// Latest calendar date across all stored notices, ignoring the
    /// `Unknown` sentinel
    pub fn max_known_date(&self) -> Result<Option<NaiveDate>> {
        let conn = self.conn.lock().unwrap();
        let max: Option<String> = conn
            .query_row(
                "SELECT MAX(date) FROM notices WHERE date <> ?1",
                params![UNKNOWN_DATE],
                |row| row.get(0),
            )
            .context("Failed to query max date")?;

        Ok(max.and_then(|text| NaiveDate::parse_from_str(&text, "%Y-%m-%d").ok()))
    }

    /// Notices with `date >= since`, newest first
    ///
    /// The comparison is over the ISO date text, under which the `Unknown`
    /// sentinel sorts above every calendar date; undated rows are therefore
    /// always part of the result.
    pub fn since(&self, since: NaiveDate) -> Result<Vec<StoredNotice>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT title, url, date, created_at FROM notices
                 WHERE date >= ?1 ORDER BY date DESC",
            )
            .context("Failed to prepare window query")?;

        let rows = stmt
            .query_map(params![since.format("%Y-%m-%d").to_string()], row_to_notice)
            .context("Failed to query notices since date")?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Most recent `limit` notices, newest first
    pub fn latest(&self, limit: usize) -> Result<Vec<StoredNotice>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT title, url, date, created_at FROM notices
                 ORDER BY date DESC LIMIT ?1",
            )
            .context("Failed to prepare latest query")?;

        let rows = stmt
            .query_map(params![limit as i64], row_to_notice)
            .context("Failed to query latest notices")?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Bulk conflict-aware upsert of one batch
    ///
    /// Inserts unseen identity pairs and updates `date` where it differs;
    /// a conflicting row with an equal date is left untouched. Returns the
    /// number of rows actually written, which is zero for a fully redundant
    /// batch.
    pub fn upsert_batch(&self, notices: &[Notice]) -> Result<usize> {
        if notices.is_empty() {
            return Ok(0);
        }

        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now().to_rfc3339();

        let mut sql = String::from("INSERT INTO notices (title, url, date, created_at) VALUES ");
        let placeholders: Vec<&str> = notices.iter().map(|_| "(?, ?, ?, ?)").collect();
        sql.push_str(&placeholders.join(", "));
        sql.push_str(
            " ON CONFLICT(title, url) DO UPDATE SET date = excluded.date
              WHERE notices.date <> excluded.date",
        );

        let mut values: Vec<rusqlite::types::Value> = Vec::with_capacity(notices.len() * 4);
        for notice in notices {
            values.push(notice.title.clone().into());
            values.push(notice.url.clone().into());
            values.push(notice.date.to_string().into());
            values.push(created_at.clone().into());
        }

        let affected = conn
            .execute(&sql, rusqlite::params_from_iter(values))
            .context("Failed to upsert notice batch")?;

        Ok(affected)
    }

    /// Total number of stored notices
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM notices", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn row_to_notice(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredNotice> {
    Ok(StoredNotice {
        title: row.get(0)?,
        url: row.get(1)?,
        date: row
            .get::<_, String>(2)?
            .parse()
            .expect("infallible"),
        created_at: DateTime::parse_from_rfc3339(&row.get::<_, String>(3)?)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
