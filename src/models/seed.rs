//! Seed list model: the plain-text list of IIIF URIs that starts a harvest.

use std::fs;
use std::path::Path;

use url::Url;

use crate::error::{AppError, Result};

/// Ordered list of seed URIs (collections or manifests), one per input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedList {
    pub uris: Vec<String>,
}

impl SeedList {
    /// Load a seed list from a plain-text file, one URI per line.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse seed list text. Blank lines and `#` comment lines are skipped.
    pub fn parse(content: &str) -> Self {
        let uris = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Self { uris }
    }

    /// Validate that the list is non-empty and every entry is an absolute
    /// http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.uris.is_empty() {
            return Err(AppError::validation("Seed list contains no URIs"));
        }
        for uri in &self.uris {
            let parsed = Url::parse(uri)
                .map_err(|e| AppError::validation(format!("Invalid seed URI {uri}: {e}")))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(AppError::validation(format!(
                    "Seed URI {uri} must use http or https"
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}
