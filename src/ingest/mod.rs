//! Notice ingestion pipeline
//!
//! One ingestion run is a linear flow with no internal parallelism:
//!
//! ```text
//! ┌─────────┐    ┌───────────┐    ┌───────────┐    ┌────────────┐    ┌──────────┐
//! │ Fetcher │───▶│ Extractor │───▶│   Dates   │───▶│ Dedup/Diff │───▶│ Persist  │
//! └─────────┘    └───────────┘    └───────────┘    └────────────┘    └──────────┘
//!   raw HTML      candidates       dated notices     change set        batches
//! ```
//!
//! Data flows strictly left to right; no stage reaches back upstream. The
//! [`Pipeline`] entry point never returns an error to its caller; every
//! failure degrades to a logged no-op run.

pub mod dates;
pub mod diff;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;

pub use dates::DateInference;
pub use extractor::NoticeExtractor;
pub use fetcher::PageFetcher;
pub use pipeline::Pipeline;
