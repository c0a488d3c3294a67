//! suchna - University notice-board ingestion service
//!
//! Periodically scrapes a loosely structured notice-board page, infers
//! publication dates from unreliable filename and text signals, and persists
//! only the notices that are new or changed.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`ingest`] - The ingestion pipeline (fetch, extract, infer, diff, persist)
//! - [`models`] - Core data structures and types
//! - [`storage`] - SQLite persistence for notices
//! - [`scheduler`] - Fixed-cadence ingestion trigger
//! - [`server`] - Read-only HTTP query surface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use suchna::config::Config;
//! use suchna::ingest::Pipeline;
//! use suchna::storage::NoticeStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(NoticeStore::open(&config.database.sqlite_path)?);
//!     let pipeline = Pipeline::new(&config, store)?;
//!     let report = pipeline.run().await;
//!     println!("created {} of {}", report.created, report.total);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod scheduler;
pub mod server;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, FetchError, Result};
    pub use crate::ingest::Pipeline;
    pub use crate::models::{IngestReport, Notice, NoticeDate, RawCandidate, RunOutcome, StoredNotice};
    pub use crate::storage::NoticeStore;
}

// Direct re-exports for convenience
pub use models::{IngestReport, Notice, NoticeDate, RunOutcome};
