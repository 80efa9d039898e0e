//! Document sources: where IIIF JSON comes from.
//!
//! The harvester fetches through the [`DocumentSource`] trait so traversal
//! logic can be exercised against in-memory fixtures.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::HarvesterConfig;

/// Source of IIIF documents keyed by URI.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch one document as parsed JSON.
    ///
    /// Transport/status problems surface as `Fetch` errors, JSON problems as
    /// `Parse` errors; both are recoverable per URI.
    async fn fetch(&self, uri: &str) -> Result<Value>;
}

/// HTTP-backed document source.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source with the configured user agent and timeout.
    pub fn new(config: &HarvesterConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, uri: &str) -> Result<Value> {
        let response = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| AppError::fetch(uri, e))?
            .error_for_status()
            .map_err(|e| AppError::fetch(uri, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| AppError::fetch(uri, e))?;

        serde_json::from_str(&body).map_err(|e| AppError::parse(uri, e))
    }
}
