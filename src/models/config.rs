//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and harvesting behavior settings
    #[serde(default)]
    pub harvester: HarvesterConfig,

    /// Metadata field extraction settings
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Repository identification rules (URI substring -> display name)
    #[serde(default = "defaults::repositories")]
    pub repositories: Vec<RepositoryRule>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.harvester.user_agent.trim().is_empty() {
            return Err(AppError::validation("harvester.user_agent is empty"));
        }
        if self.harvester.timeout_secs == 0 {
            return Err(AppError::validation("harvester.timeout_secs must be > 0"));
        }
        if self.harvester.max_concurrent == 0 {
            return Err(AppError::validation("harvester.max_concurrent must be > 0"));
        }
        if self.normalizer.author_labels.is_empty() {
            return Err(AppError::validation("normalizer.author_labels is empty"));
        }
        if self.normalizer.date_labels.is_empty() {
            return Err(AppError::validation("normalizer.date_labels is empty"));
        }
        if self.normalizer.language_labels.is_empty() {
            return Err(AppError::validation("normalizer.language_labels is empty"));
        }
        if self.normalizer.material_labels.is_empty() {
            return Err(AppError::validation("normalizer.material_labels is empty"));
        }
        for rule in &self.repositories {
            if rule.pattern.trim().is_empty() || rule.name.trim().is_empty() {
                return Err(AppError::validation(
                    "repository rules need both pattern and name",
                ));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            harvester: HarvesterConfig::default(),
            normalizer: NormalizerConfig::default(),
            repositories: defaults::repositories(),
        }
    }
}

/// HTTP client and harvesting behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvesterConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between completed requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent in-flight requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Metadata field extraction settings.
///
/// IIIF metadata labels are chosen by holding institutions and are not part
/// of the schema, so each target field carries an ordered list of label
/// synonyms matched case-insensitively as substrings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default = "defaults::author_labels")]
    pub author_labels: Vec<String>,

    #[serde(default = "defaults::date_labels")]
    pub date_labels: Vec<String>,

    #[serde(default = "defaults::language_labels")]
    pub language_labels: Vec<String>,

    #[serde(default = "defaults::material_labels")]
    pub material_labels: Vec<String>,

    /// Fallback labels for repository when no URI rule matches
    #[serde(default = "defaults::repository_labels")]
    pub repository_labels: Vec<String>,

    /// Image API suffix patterns replaced on thumbnail URIs
    #[serde(default = "defaults::thumbnail_strip_patterns")]
    pub thumbnail_strip_patterns: Vec<String>,

    /// Image API suffix appended to thumbnail URIs for sizing
    #[serde(default = "defaults::thumbnail_suffix")]
    pub thumbnail_suffix: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            author_labels: defaults::author_labels(),
            date_labels: defaults::date_labels(),
            language_labels: defaults::language_labels(),
            material_labels: defaults::material_labels(),
            repository_labels: defaults::repository_labels(),
            thumbnail_strip_patterns: defaults::thumbnail_strip_patterns(),
            thumbnail_suffix: defaults::thumbnail_suffix(),
        }
    }
}

/// Identifies a holding repository by a substring of the manifest URI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryRule {
    /// Substring to look for in the manifest URI (e.g. "cudl")
    pub pattern: String,

    /// Repository display name (e.g. "Cambridge University Library")
    pub name: String,
}

mod defaults {
    use super::RepositoryRule;

    pub fn user_agent() -> String {
        format!("iiif-portal/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn request_delay() -> u64 {
        100
    }

    pub fn max_concurrent() -> usize {
        8
    }

    pub fn author_labels() -> Vec<String> {
        ["author", "creator", "artist", "scribe"]
            .map(String::from)
            .to_vec()
    }

    pub fn date_labels() -> Vec<String> {
        ["date"].map(String::from).to_vec()
    }

    pub fn language_labels() -> Vec<String> {
        ["language"].map(String::from).to_vec()
    }

    pub fn material_labels() -> Vec<String> {
        ["material", "medium", "support"].map(String::from).to_vec()
    }

    pub fn repository_labels() -> Vec<String> {
        ["repository", "institution", "holding"]
            .map(String::from)
            .to_vec()
    }

    pub fn thumbnail_strip_patterns() -> Vec<String> {
        vec![r"/full/.*/0/.*jpg$".to_string()]
    }

    pub fn thumbnail_suffix() -> String {
        "/full/!200,200/0/default.jpg".to_string()
    }

    pub fn repositories() -> Vec<RepositoryRule> {
        vec![RepositoryRule {
            pattern: "cudl".to_string(),
            name: "Cambridge University Library".to_string(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.harvester.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_label_list() {
        let mut config = Config::default();
        config.normalizer.language_labels.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [harvester]
            max_concurrent = 2

            [[repositories]]
            pattern = "gallica"
            name = "Bibliotheque nationale de France"
            "#,
        )
        .unwrap();
        assert_eq!(config.harvester.max_concurrent, 2);
        assert_eq!(config.harvester.timeout_secs, 30);
        assert_eq!(config.repositories[0].name, "Bibliotheque nationale de France");
        assert!(!config.normalizer.author_labels.is_empty());
    }
}
