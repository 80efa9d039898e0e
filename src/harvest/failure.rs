//! Per-URI failure records for operator inspection.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Stage of the pipeline at which a URI failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// Network, timeout, or HTTP status failure
    Fetch,
    /// Response was not valid JSON
    Parse,
    /// Document could not be normalized into a record
    Normalize,
}

/// One failed URI with the stage and a human-readable reason.
///
/// Failures never abort a harvest run; they are collected into
/// `failures.json` alongside the record set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Failure {
    pub uri: String,
    pub stage: FailureStage,
    pub reason: String,
}

impl Failure {
    pub fn new(uri: impl Into<String>, stage: FailureStage, reason: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            stage,
            reason: reason.into(),
        }
    }

    /// Classify an error from fetching or normalizing a URI.
    pub fn from_error(uri: &str, error: &AppError) -> Self {
        let stage = match error {
            AppError::Parse { .. } | AppError::Json(_) => FailureStage::Parse,
            AppError::Normalization { .. } => FailureStage::Normalize,
            _ => FailureStage::Fetch,
        };
        Self::new(uri, stage, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_by_error_variant() {
        let fetch = AppError::fetch("https://x.example.org", "timed out");
        assert_eq!(
            Failure::from_error("https://x.example.org", &fetch).stage,
            FailureStage::Fetch
        );

        let parse = AppError::parse("https://x.example.org", "expected value");
        assert_eq!(
            Failure::from_error("https://x.example.org", &parse).stage,
            FailureStage::Parse
        );

        let norm = AppError::normalization("https://x.example.org", "manifest has no @id");
        assert_eq!(
            Failure::from_error("https://x.example.org", &norm).stage,
            FailureStage::Normalize
        );
    }
}
