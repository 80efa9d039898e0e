//! Record data structures.
//!
//! `Record` is the internal shape: absence of a metadata field is an
//! `Option::None`, never a magic string. `RecordOutput` is the serialized
//! boundary shape consumed by the rendering layer, where absent fields carry
//! the `"N/A"` sentinel and the thumbnail is omitted entirely when missing.

use serde::{Deserialize, Serialize};

/// Sentinel written for absent metadata fields at the serialization boundary.
pub const NOT_AVAILABLE: &str = "N/A";

/// Display title used when a manifest carries no label.
pub const UNTITLED: &str = "Untitled";

/// One harvested IIIF manifest, normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Stable identifier (hash of the manifest URI)
    pub id: String,

    /// Canonical IIIF manifest URI
    pub manifest_uri: String,

    /// Display title, `"Untitled"` if the manifest had none
    pub label: String,

    pub author: Option<String>,
    pub repository: Option<String>,
    pub language: Option<String>,
    pub material: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,

    /// Thumbnail image URI; rendered conditionally on presence
    pub thumbnail_uri: Option<String>,
}

impl Record {
    /// Sort key for result ordering: case-insensitive label, ties by id.
    pub fn sort_key(&self) -> (String, String) {
        (self.label.to_lowercase(), self.id.clone())
    }
}

/// Serialized record shape written to `records.json`.
///
/// Every metadata field is present; absence is the `"N/A"` sentinel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordOutput {
    pub id: String,
    pub manifest_uri: String,
    pub label: String,
    pub author: String,
    pub repository: String,
    pub language: String,
    pub material: String,
    pub date: String,
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_uri: Option<String>,
}

fn to_sentinel(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn from_sentinel(value: String) -> Option<String> {
    if value.is_empty() || value == NOT_AVAILABLE {
        None
    } else {
        Some(value)
    }
}

impl From<&Record> for RecordOutput {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            manifest_uri: record.manifest_uri.clone(),
            label: record.label.clone(),
            author: to_sentinel(&record.author),
            repository: to_sentinel(&record.repository),
            language: to_sentinel(&record.language),
            material: to_sentinel(&record.material),
            date: to_sentinel(&record.date),
            description: to_sentinel(&record.description),
            thumbnail_uri: record.thumbnail_uri.clone(),
        }
    }
}

impl From<RecordOutput> for Record {
    fn from(output: RecordOutput) -> Self {
        Self {
            id: output.id,
            manifest_uri: output.manifest_uri,
            label: output.label,
            author: from_sentinel(output.author),
            repository: from_sentinel(output.repository),
            language: from_sentinel(output.language),
            material: from_sentinel(output.material),
            date: from_sentinel(output.date),
            description: from_sentinel(output.description),
            thumbnail_uri: output.thumbnail_uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        Record {
            id: "ab12".to_string(),
            manifest_uri: "https://example.org/iiif/manifest.json".to_string(),
            label: "A Sample Manuscript".to_string(),
            author: Some("Ibn Battuta".to_string()),
            repository: None,
            language: Some("Arabic".to_string()),
            material: None,
            date: None,
            description: Some("A travel account.".to_string()),
            thumbnail_uri: None,
        }
    }

    #[test]
    fn test_output_uses_sentinel_for_absent_fields() {
        let output = RecordOutput::from(&sample_record());
        assert_eq!(output.author, "Ibn Battuta");
        assert_eq!(output.repository, NOT_AVAILABLE);
        assert_eq!(output.material, NOT_AVAILABLE);
        assert_eq!(output.thumbnail_uri, None);
    }

    #[test]
    fn test_thumbnail_omitted_when_absent() {
        let output = RecordOutput::from(&sample_record());
        let json = serde_json::to_string(&output).unwrap();
        assert!(!json.contains("thumbnail_uri"));
    }

    #[test]
    fn test_round_trip_restores_absence() {
        let record = sample_record();
        let output = RecordOutput::from(&record);
        let restored = Record::from(output);
        assert_eq!(restored, record);
    }

    #[test]
    fn test_sort_key_is_case_insensitive() {
        let mut record = sample_record();
        record.label = "ZEBRA".to_string();
        assert_eq!(record.sort_key().0, "zebra");
    }
}
