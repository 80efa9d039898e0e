//! Storage abstractions for harvest artifacts.
//!
//! A harvest run produces three files, written atomically:
//!
//! ```text
//! storage/
//! ├── records.json    # Serialized record set, sorted by id
//! ├── failures.json   # Per-URI failure log (uri, stage, reason)
//! └── harvest.json    # Run summary (timestamp, counts)
//! ```
//!
//! `records.json` is the boundary artifact the index builder consumes.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::harvest::{Failure, HarvestOutcome};
use crate::models::Record;

// Re-export for convenience
pub use local::LocalStorage;

/// Summary of a persisted harvest run, written to `harvest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestSummary {
    /// ISO 8601 timestamp of the harvest write
    pub harvested_at: DateTime<Utc>,
    pub record_count: usize,
    pub failure_count: usize,
}

/// Trait for harvest artifact storage backends.
#[async_trait]
pub trait PortalStorage: Send + Sync {
    /// Persist a harvest outcome: records, failure log, and summary.
    ///
    /// Each file is written atomically, but the three writes are sequential:
    /// an abort mid-write can pair a fresh `records.json` with the previous
    /// run's failure log and summary. The summary is written last, so a
    /// `harvest.json` whose timestamp is newer than its siblings never
    /// exists; its counts only ever lag the record set, never lead it.
    async fn write_harvest(&self, outcome: &HarvestOutcome) -> Result<HarvestSummary>;

    /// Load the persisted record set.
    async fn load_records(&self) -> Result<Vec<Record>>;

    /// Load the failure log from the last harvest, empty if none exists.
    async fn load_failures(&self) -> Result<Vec<Failure>>;

    /// Load the last harvest summary, `None` before any harvest.
    async fn load_summary(&self) -> Result<Option<HarvestSummary>>;
}
