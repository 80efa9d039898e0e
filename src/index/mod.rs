//! Facet index: per-dimension value tables over the record set, published
//! as immutable snapshots.

mod facet;
mod snapshot;

pub use facet::{Facet, FacetBucket, FacetTable};
pub use snapshot::{Snapshot, SnapshotStore};
