// src/pipeline/harvest.rs

//! Harvest pipeline: seed list in, persisted record set out.

use std::sync::Arc;

use log::{info, warn};

use crate::error::Result;
use crate::harvest::{Harvester, HttpSource};
use crate::models::{Config, SeedList};
use crate::storage::{HarvestSummary, PortalStorage};

/// Run a full harvest over the seed list and persist the artifacts.
///
/// Persisting is the final step; an aborted run never replaces the
/// previously written record set.
pub async fn run_harvest(
    config: Arc<Config>,
    storage: &dyn PortalStorage,
    seeds: &SeedList,
) -> Result<HarvestSummary> {
    seeds.validate()?;
    info!("Harvesting from {} seed URIs", seeds.len());

    let source = Arc::new(HttpSource::new(&config.harvester)?);
    let harvester = Harvester::new(Arc::clone(&config), source)?;
    let outcome = harvester.run(seeds).await;

    if !outcome.failures.is_empty() {
        warn!(
            "{} URIs failed; see failures.json for details",
            outcome.failures.len()
        );
    }

    let summary = storage.write_harvest(&outcome).await?;
    info!(
        "Harvest stored: {} records from {} fetched documents, {} failures, {} collections traversed, {} duplicates skipped",
        summary.record_count,
        outcome.fetched,
        summary.failure_count,
        outcome.collections,
        outcome.duplicates
    );
    Ok(summary)
}
