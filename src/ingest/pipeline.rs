//! Pipeline orchestration
//!
//! Wires fetch, extraction, date inference, dedup/diff and batched
//! persistence into the single entry point the scheduler invokes. Nothing in
//! here propagates an error to the caller: a broken fetch, an unreadable
//! reference window or a failing batch each degrade to a logged partial or
//! empty run, and the next scheduled tick starts fresh.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::ingest::dates::DateInference;
use crate::ingest::diff;
use crate::ingest::extractor::NoticeExtractor;
use crate::ingest::fetcher::PageFetcher;
use crate::models::{IngestReport, Notice, RunOutcome, StoredNotice};
use crate::storage::NoticeStore;

/// The notice ingestion pipeline
pub struct Pipeline {
    fetcher: PageFetcher,
    extractor: NoticeExtractor,
    inference: DateInference,
    store: Arc<NoticeStore>,
    source_url: Url,
    batch_size: usize,
    /// Non-reentrancy guard; an in-flight run holds it for its full duration
    run_guard: Mutex<()>,
}

impl Pipeline {
    /// Build a pipeline from configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an unparseable source URL and
    /// `Error::Fetch` if the HTTP client cannot be constructed.
    pub fn new(config: &Config, store: Arc<NoticeStore>) -> Result<Self> {
        let source_url = Url::parse(&config.source.url)
            .map_err(|err| Error::config(format!("invalid source url: {err}")))?;

        let fetcher = PageFetcher::new(config.request_timeout(), &config.source.user_agent)?;

        Ok(Self {
            fetcher,
            extractor: NoticeExtractor::new(),
            inference: DateInference::new(),
            store,
            source_url,
            batch_size: config.ingest.batch_size,
            run_guard: Mutex::new(()),
        })
    }

    /// Run one ingestion pass, waiting for any in-flight run to finish first
    pub async fn run(&self) -> IngestReport {
        let _guard = self.run_guard.lock().await;
        self.run_inner().await
    }

    /// Run one ingestion pass unless a run is already in flight
    ///
    /// Returns `None` when the guard is held; the scheduler treats that as
    /// a skipped tick rather than queueing overlapping runs against the
    /// same store.
    pub async fn try_run(&self) -> Option<IngestReport> {
        match self.run_guard.try_lock() {
            Ok(_guard) => Some(self.run_inner().await),
            Err(_) => None,
        }
    }

    async fn run_inner(&self) -> IngestReport {
        let html = match self.fetcher.fetch(self.source_url.as_str()).await {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(
                    url = %self.source_url,
                    error = %err,
                    "source fetch failed, run degrades to no-op"
                );
                return IngestReport::no_op(RunOutcome::Failed);
            }
        };

        let candidates = self.extractor.extract(&html, &self.source_url);
        if candidates.is_empty() {
            tracing::info!("no candidates extracted from source page");
            return IngestReport::no_op(RunOutcome::NothingNew);
        }
        tracing::debug!(count = candidates.len(), "extracted candidates");

        let notices = self.inference.infer(candidates);
        let unique = diff::dedup(notices);

        let window = match self.reference_window() {
            Ok(window) => window,
            Err(err) => {
                tracing::error!(error = %err, "failed to load reference window, skipping run");
                return IngestReport::no_op(RunOutcome::Failed);
            }
        };

        let changed = diff::diff(unique, &window);
        if changed.is_empty() {
            tracing::info!("no new or changed notices");
            return IngestReport::no_op(RunOutcome::NothingNew);
        }

        tracing::info!(count = changed.len(), "persisting new or changed notices");
        self.persist(&changed)
    }

    /// Recently stored notices used as the change-detection baseline
    fn reference_window(&self) -> anyhow::Result<Vec<StoredNotice>> {
        let since = match self.store.max_known_date()? {
            Some(date) => date,
            // empty store: fall back to the validity window's lower bound
            None => NaiveDate::from_ymd_opt(2018, 1, 1).expect("valid epoch"),
        };

        self.store.since(since)
    }

    /// Write the diff set in bounded batches, tolerating partial failure
    fn persist(&self, changed: &[Notice]) -> IngestReport {
        let total = changed.len() as u64;
        let mut created = 0u64;

        for (index, chunk) in changed.chunks(self.batch_size).enumerate() {
            let offset = index * self.batch_size;

            // the diff can still hand adjacent duplicates to one batch
            let batch = diff::dedup(chunk.to_vec());

            match self.store.upsert_batch(&batch) {
                Ok(affected) => {
                    created += affected as u64;
                    tracing::debug!(offset, size = batch.len(), affected, "batch persisted");
                }
                Err(err) => {
                    tracing::error!(
                        offset,
                        size = chunk.len(),
                        error = %err,
                        "batch upsert failed, continuing with remaining batches"
                    );
                }
            }
        }

        IngestReport {
            created,
            updated: 0,
            total,
            outcome: RunOutcome::Ingested,
        }
    }
}
