//! Local filesystem storage implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::harvest::{Failure, HarvestOutcome};
use crate::models::{Record, RecordOutput};
use crate::storage::{HarvestSummary, PortalStorage};

const RECORDS_KEY: &str = "records.json";
const FAILURES_KEY: &str = "failures.json";
const SUMMARY_KEY: &str = "harvest.json";

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PortalStorage for LocalStorage {
    async fn write_harvest(&self, outcome: &HarvestOutcome) -> Result<HarvestSummary> {
        let outputs: Vec<RecordOutput> = outcome.records.iter().map(RecordOutput::from).collect();

        self.write_json(RECORDS_KEY, &outputs).await?;
        self.write_json(FAILURES_KEY, &outcome.failures).await?;

        // Summary last: it marks the records/failures pair as complete.
        let summary = HarvestSummary {
            harvested_at: Utc::now(),
            record_count: outcome.records.len(),
            failure_count: outcome.failures.len(),
        };
        self.write_json(SUMMARY_KEY, &summary).await?;

        info!(
            "Wrote {} records and {} failures to {}",
            summary.record_count,
            summary.failure_count,
            self.root_dir.display()
        );
        Ok(summary)
    }

    async fn load_records(&self) -> Result<Vec<Record>> {
        let outputs: Vec<RecordOutput> =
            self.read_json(RECORDS_KEY).await?.ok_or_else(|| {
                AppError::config(format!(
                    "No records found in {}. Run harvest first.",
                    self.root_dir.display()
                ))
            })?;
        Ok(outputs.into_iter().map(Record::from).collect())
    }

    async fn load_failures(&self) -> Result<Vec<Failure>> {
        Ok(self.read_json(FAILURES_KEY).await?.unwrap_or_default())
    }

    async fn load_summary(&self) -> Result<Option<HarvestSummary>> {
        self.read_json(SUMMARY_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::FailureStage;

    fn sample_outcome() -> HarvestOutcome {
        HarvestOutcome {
            records: vec![Record {
                id: "ab12".to_string(),
                manifest_uri: "https://example.org/iiif/m1".to_string(),
                label: "Sample".to_string(),
                author: Some("Someone".to_string()),
                repository: None,
                language: None,
                material: None,
                date: None,
                description: None,
                thumbnail_uri: None,
            }],
            failures: vec![Failure::new(
                "https://example.org/iiif/broken",
                FailureStage::Fetch,
                "HTTP 500",
            )],
            fetched: 2,
            collections: 0,
            duplicates: 0,
        }
    }

    #[tokio::test]
    async fn test_write_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let outcome = sample_outcome();
        let summary = storage.write_harvest(&outcome).await.unwrap();
        assert_eq!(summary.record_count, 1);
        assert_eq!(summary.failure_count, 1);

        let records = storage.load_records().await.unwrap();
        assert_eq!(records, outcome.records);

        let failures = storage.load_failures().await.unwrap();
        assert_eq!(failures, outcome.failures);

        let loaded = storage.load_summary().await.unwrap().unwrap();
        assert_eq!(loaded.record_count, 1);
    }

    #[tokio::test]
    async fn test_sentinel_only_lives_in_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.write_harvest(&sample_outcome()).await.unwrap();

        let raw = tokio::fs::read_to_string(dir.path().join(RECORDS_KEY))
            .await
            .unwrap();
        assert!(raw.contains("N/A"));

        // Reading restores explicit absence.
        let records = storage.load_records().await.unwrap();
        assert_eq!(records[0].repository, None);
        assert_eq!(records[0].author.as_deref(), Some("Someone"));
    }

    #[tokio::test]
    async fn test_missing_records_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(storage.load_records().await.is_err());
        assert!(storage.load_summary().await.unwrap().is_none());
        assert!(storage.load_failures().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rewrite_replaces_previous_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.write_harvest(&sample_outcome()).await.unwrap();

        let empty = HarvestOutcome::default();
        storage.write_harvest(&empty).await.unwrap();

        assert!(storage.load_records().await.unwrap().is_empty());
        assert!(storage.load_failures().await.unwrap().is_empty());
    }
}
