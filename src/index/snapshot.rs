//! Immutable index snapshots with atomic publication.
//!
//! A snapshot is built fully in isolation from one record set, then
//! published through [`SnapshotStore`] as a single `Arc` swap. Readers
//! always hold one consistent snapshot; a failed rebuild leaves the
//! previous snapshot serving.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::index::{Facet, FacetTable};
use crate::models::Record;

/// One fully-built index generation: records plus facet tables.
#[derive(Debug)]
pub struct Snapshot {
    /// Monotonic generation number, assigned at publication
    pub generation: u64,
    pub built_at: DateTime<Utc>,
    /// Records in result order (case-insensitive label, ties by id)
    records: Vec<Record>,
    by_id: HashMap<String, usize>,
    facets: HashMap<Facet, FacetTable>,
}

impl Snapshot {
    /// Build a snapshot from a record set.
    ///
    /// The record set must have unique ids; a duplicate aborts the build.
    pub fn build(mut records: Vec<Record>) -> Result<Self> {
        records.sort_by_key(Record::sort_key);

        let mut by_id = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if by_id.insert(record.id.clone(), position).is_some() {
                return Err(AppError::index_build(format!(
                    "duplicate record id {} ({})",
                    record.id, record.manifest_uri
                )));
            }
        }

        let facets = Facet::ALL
            .iter()
            .map(|&facet| (facet, FacetTable::build(facet, &records)))
            .collect();

        Ok(Self {
            generation: 0,
            built_at: Utc::now(),
            records,
            by_id,
            facets,
        })
    }

    /// Empty snapshot served before the first harvest is indexed.
    pub fn empty() -> Self {
        Self::build(Vec::new()).expect("empty record set always builds")
    }

    /// All records, in result order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id).map(|&position| &self.records[position])
    }

    /// The facet table for one dimension.
    pub fn facet(&self, facet: Facet) -> &FacetTable {
        &self.facets[&facet]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Holds the currently published snapshot.
///
/// Readers clone the `Arc` and keep using their snapshot even across a
/// concurrent publication; queries never observe a partially-built index.
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    /// Create a store serving an empty snapshot.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::empty())),
        }
    }

    /// The currently published snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().expect("snapshot lock poisoned"))
    }

    /// Publish a new snapshot, assigning the next generation number.
    /// The swap is the only mutation readers can observe.
    pub fn publish(&self, mut snapshot: Snapshot) -> Arc<Snapshot> {
        let mut guard = self.current.write().expect("snapshot lock poisoned");
        snapshot.generation = guard.generation + 1;
        let published = Arc::new(snapshot);
        *guard = Arc::clone(&published);
        published
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
