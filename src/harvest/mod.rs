//! IIIF harvesting: recursive traversal of collections and manifests.

mod failure;
mod harvester;
mod source;

pub use failure::{Failure, FailureStage};
pub use harvester::{HarvestOutcome, Harvester};
pub use source::{DocumentSource, HttpSource};
