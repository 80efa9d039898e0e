//! Recursive harvest of IIIF collections and manifests.
//!
//! Traversal keeps a single pool of in-flight fetches, topped up from a
//! queue as results complete. Member URIs discovered in a collection are
//! scheduled as soon as a slot frees, so a slow host only ever occupies its
//! own slot and independent branches keep moving. The visited set is owned
//! by the scheduling loop, so a URI is enqueued at most once even when
//! collections reference shared manifests.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use serde_json::Value;

use crate::error::Result;
use crate::harvest::{DocumentSource, Failure, FailureStage};
use crate::models::{Config, Record, SeedList};
use crate::normalize::Normalizer;

/// Summary of a harvest run.
#[derive(Debug, Default)]
pub struct HarvestOutcome {
    /// Normalized records, sorted by id
    pub records: Vec<Record>,
    /// Per-URI failures, in completion order
    pub failures: Vec<Failure>,
    /// Documents fetched successfully
    pub fetched: usize,
    /// Collections traversed
    pub collections: usize,
    /// Manifests dropped because their id was already recorded
    pub duplicates: usize,
}

/// Service that walks IIIF resources reachable from a seed list.
pub struct Harvester {
    config: Arc<Config>,
    source: Arc<dyn DocumentSource>,
    normalizer: Normalizer,
}

impl Harvester {
    /// Create a harvester over the given document source.
    pub fn new(config: Arc<Config>, source: Arc<dyn DocumentSource>) -> Result<Self> {
        let normalizer = Normalizer::new(&config)?;
        Ok(Self {
            config,
            source,
            normalizer,
        })
    }

    /// Harvest every manifest reachable from the seed list.
    ///
    /// Individual URI failures are collected, never fatal; the run always
    /// completes over whatever remains reachable.
    pub async fn run(&self, seeds: &SeedList) -> HarvestOutcome {
        let delay = Duration::from_millis(self.config.harvester.request_delay_ms);
        let concurrency = self.config.harvester.max_concurrent.max(1);

        let mut outcome = HarvestOutcome::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut seen_ids: HashSet<String> = HashSet::new();

        let mut queue: VecDeque<String> = VecDeque::new();
        for uri in &seeds.uris {
            if visited.insert(uri.clone()) {
                queue.push_back(uri.clone());
            }
        }

        let mut in_flight: FuturesUnordered<BoxFuture<'static, (String, Result<Value>)>> =
            FuturesUnordered::new();
        while in_flight.len() < concurrency {
            let Some(uri) = queue.pop_front() else { break };
            in_flight.push(self.fetch_task(uri, delay));
        }

        while let Some((uri, result)) = in_flight.next().await {
            match result {
                Ok(document) => {
                    outcome.fetched += 1;
                    self.process_document(
                        &uri,
                        &document,
                        &mut visited,
                        &mut queue,
                        &mut seen_ids,
                        &mut outcome,
                    );
                }
                Err(error) => {
                    warn!("Failed to fetch {}: {}", uri, error);
                    outcome.failures.push(Failure::from_error(&uri, &error));
                }
            }

            // Refill freed slots immediately, including any members the
            // document just contributed.
            while in_flight.len() < concurrency {
                let Some(next) = queue.pop_front() else { break };
                in_flight.push(self.fetch_task(next, delay));
            }
        }

        // Deterministic record order regardless of fetch completion order.
        outcome.records.sort_by(|a, b| a.id.cmp(&b.id));

        info!(
            "Harvest complete: {} records from {} fetched documents, {} failures, {} collections traversed",
            outcome.records.len(),
            outcome.fetched,
            outcome.failures.len(),
            outcome.collections
        );
        outcome
    }

    /// One fetch as an owned future. The politeness delay runs inside the
    /// task, so pacing a request never blocks polling of the other in-flight
    /// fetches.
    fn fetch_task(
        &self,
        uri: String,
        delay: Duration,
    ) -> BoxFuture<'static, (String, Result<Value>)> {
        let source = Arc::clone(&self.source);
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = source.fetch(&uri).await;
            (uri, result)
        })
    }

    /// Route one fetched document: collections feed the queue, manifests
    /// become records, anything else is a normalization failure.
    fn process_document(
        &self,
        uri: &str,
        document: &Value,
        visited: &mut HashSet<String>,
        queue: &mut VecDeque<String>,
        seen_ids: &mut HashSet<String>,
        outcome: &mut HarvestOutcome,
    ) {
        match document_type(document) {
            Some(kind) if is_collection_type(kind) => {
                outcome.collections += 1;
                let members = member_uris(document);
                debug!("Collection {} lists {} members", uri, members.len());
                for member in members {
                    if visited.insert(member.clone()) {
                        queue.push_back(member);
                    }
                }
            }
            Some(kind) if is_manifest_type(kind) => match self.normalizer.normalize(uri, document)
            {
                Ok(record) => {
                    if seen_ids.insert(record.id.clone()) {
                        outcome.records.push(record);
                    } else {
                        outcome.duplicates += 1;
                        warn!("Duplicate record skipped: {}", record.manifest_uri);
                    }
                }
                Err(error) => {
                    warn!("Failed to normalize {}: {}", uri, error);
                    outcome.failures.push(Failure::from_error(uri, &error));
                }
            },
            Some(kind) => {
                warn!("Unsupported IIIF type {:?} at {}", kind, uri);
                outcome.failures.push(Failure::new(
                    uri,
                    FailureStage::Normalize,
                    format!("unsupported IIIF type {kind:?}"),
                ));
            }
            None => {
                warn!("No IIIF type declared at {}", uri);
                outcome.failures.push(Failure::new(
                    uri,
                    FailureStage::Normalize,
                    "document declares no IIIF type",
                ));
            }
        }
    }
}

/// Declared IIIF type, Presentation 2 (`@type`) or 3 (`type`).
fn document_type(document: &Value) -> Option<&str> {
    document
        .get("@type")
        .or_else(|| document.get("type"))
        .and_then(Value::as_str)
}

fn is_collection_type(kind: &str) -> bool {
    kind == "sc:Collection" || kind == "Collection"
}

fn is_manifest_type(kind: &str) -> bool {
    kind == "sc:Manifest" || kind == "Manifest"
}

/// Collect member URIs of a collection from the `collections`, `manifests`,
/// and `members` arrays.
fn member_uris(document: &Value) -> Vec<String> {
    let mut uris = Vec::new();
    for key in ["collections", "manifests", "members"] {
        let Some(entries) = document.get(key).and_then(Value::as_array) else {
            continue;
        };
        for entry in entries {
            let id = entry
                .get("@id")
                .or_else(|| entry.get("id"))
                .and_then(Value::as_str)
                .map(str::trim);
            if let Some(id) = id.filter(|id| !id.is_empty()) {
                uris.push(id.to_string());
            }
        }
    }
    uris
}
