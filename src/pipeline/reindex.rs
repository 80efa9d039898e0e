// src/pipeline/reindex.rs

//! Reindex pipeline: load the persisted record set, build a snapshot in
//! isolation, and publish it atomically.

use std::sync::Arc;

use log::info;

use crate::error::Result;
use crate::index::{Snapshot, SnapshotStore};
use crate::storage::PortalStorage;

/// Rebuild the index from storage and publish it.
///
/// A build failure (e.g. duplicate record id) returns the error without
/// touching the store; the previously published snapshot keeps serving.
pub async fn run_reindex(
    storage: &dyn PortalStorage,
    store: &SnapshotStore,
) -> Result<Arc<Snapshot>> {
    let records = storage.load_records().await?;
    let snapshot = Snapshot::build(records)?;
    let published = store.publish(snapshot);
    info!(
        "Published index generation {} with {} records",
        published.generation,
        published.len()
    );
    Ok(published)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;
    use crate::harvest::{Failure, HarvestOutcome};
    use crate::models::Record;
    use crate::storage::HarvestSummary;

    /// Storage stub serving a fixed record set.
    struct FixedStorage {
        records: Vec<Record>,
    }

    #[async_trait]
    impl PortalStorage for FixedStorage {
        async fn write_harvest(&self, _outcome: &HarvestOutcome) -> Result<HarvestSummary> {
            unimplemented!("not used by reindex tests")
        }

        async fn load_records(&self) -> Result<Vec<Record>> {
            Ok(self.records.clone())
        }

        async fn load_failures(&self) -> Result<Vec<Failure>> {
            Ok(Vec::new())
        }

        async fn load_summary(&self) -> Result<Option<HarvestSummary>> {
            Ok(None)
        }
    }

    fn record(id: &str) -> Record {
        Record {
            id: id.to_string(),
            manifest_uri: format!("https://example.org/iiif/{id}"),
            label: format!("Item {id}"),
            author: None,
            repository: None,
            language: None,
            material: None,
            date: None,
            description: None,
            thumbnail_uri: None,
        }
    }

    #[tokio::test]
    async fn test_reindex_publishes_new_generation() {
        let storage = FixedStorage {
            records: vec![record("a"), record("b")],
        };
        let store = SnapshotStore::new();

        let published = run_reindex(&storage, &store).await.unwrap();
        assert_eq!(published.generation, 1);
        assert_eq!(store.current().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_rebuild_keeps_serving_previous_index() {
        let store = SnapshotStore::new();
        let good = FixedStorage {
            records: vec![record("a")],
        };
        run_reindex(&good, &store).await.unwrap();

        let bad = FixedStorage {
            records: vec![record("dup"), record("dup")],
        };
        let error = run_reindex(&bad, &store).await.unwrap_err();
        assert!(matches!(error, AppError::IndexBuild(_)));

        // Previous snapshot is still the published one.
        assert_eq!(store.current().generation, 1);
        assert_eq!(store.current().len(), 1);
    }
}
