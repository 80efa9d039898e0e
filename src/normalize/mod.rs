//! Metadata normalizer: one raw IIIF manifest document to one `Record`.
//!
//! IIIF metadata labels are institution-specific, so each target field is
//! matched against a configured, ordered list of label synonyms rather than
//! hard-coded keys. The mapping is applied uniformly to every manifest.

pub mod text;

use regex::Regex;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Config, NormalizerConfig, Record, RepositoryRule, UNTITLED};
use crate::utils::{is_absolute_http_url, record_id};

use text::extract_value;

/// Normalizes manifest JSON into records using configured field mappings.
pub struct Normalizer {
    config: NormalizerConfig,
    repositories: Vec<RepositoryRule>,
    strip_patterns: Vec<Regex>,
}

impl Normalizer {
    /// Create a normalizer from application configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let strip_patterns = config
            .normalizer
            .thumbnail_strip_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    AppError::config(format!("Invalid thumbnail pattern {p}: {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config: config.normalizer.clone(),
            repositories: config.repositories.clone(),
            strip_patterns,
        })
    }

    /// Map one manifest document to a record.
    ///
    /// `source_uri` is the URI the document was fetched from, used for error
    /// context; the record's canonical URI is the manifest's own `@id`.
    pub fn normalize(&self, source_uri: &str, document: &Value) -> Result<Record> {
        let manifest_uri = document
            .get("@id")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::normalization(source_uri, "manifest has no @id"))?
            .to_string();

        let label = document
            .get("label")
            .and_then(extract_value)
            .unwrap_or_else(|| UNTITLED.to_string());

        let description = document.get("description").and_then(extract_value);

        let metadata = document
            .get("metadata")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let author = self.metadata_value(metadata, &self.config.author_labels);
        let date = self.metadata_value(metadata, &self.config.date_labels);
        let language = self.metadata_value(metadata, &self.config.language_labels);
        let material = self.metadata_value(metadata, &self.config.material_labels);

        let repository = self
            .repository_from_uri(&manifest_uri)
            .or_else(|| self.metadata_value(metadata, &self.config.repository_labels));

        let thumbnail_uri = self.extract_thumbnail(document);

        Ok(Record {
            id: record_id(&manifest_uri),
            manifest_uri,
            label,
            author,
            repository,
            language,
            material,
            date,
            description,
            thumbnail_uri,
        })
    }

    /// Find a metadata value whose label matches one of the synonyms.
    ///
    /// Synonyms are tried in configured order; within one synonym the
    /// manifest's metadata entries are scanned in document order and the
    /// first label containing the synonym (case-insensitive) wins.
    fn metadata_value(&self, metadata: &[Value], labels: &[String]) -> Option<String> {
        for synonym in labels {
            let synonym = synonym.to_lowercase();
            for entry in metadata {
                let Some(label) = entry.get("label").and_then(extract_value) else {
                    continue;
                };
                if label.to_lowercase().contains(&synonym) {
                    if let Some(value) = entry.get("value").and_then(extract_value) {
                        return Some(value);
                    }
                }
            }
        }
        None
    }

    /// Identify the holding repository by URI substring rules, first match
    /// wins.
    fn repository_from_uri(&self, manifest_uri: &str) -> Option<String> {
        self.repositories
            .iter()
            .find(|rule| manifest_uri.contains(&rule.pattern))
            .map(|rule| rule.name.clone())
    }

    /// Extract a thumbnail URI from the manifest.
    ///
    /// The declared `thumbnail` resource is preferred; otherwise the first
    /// canvas's image service is used. Non-absolute URIs are dropped, and the
    /// Image API size suffix is normalized so thumbnails render at a
    /// consistent size.
    fn extract_thumbnail(&self, document: &Value) -> Option<String> {
        let raw = Self::declared_thumbnail(document)
            .or_else(|| Self::first_canvas_image(document))?;
        let uri = extract_value(&Value::String(raw))?;
        if !is_absolute_http_url(&uri) {
            return None;
        }
        Some(self.apply_size_suffix(&uri))
    }

    fn declared_thumbnail(document: &Value) -> Option<String> {
        let thumbnail = document.get("thumbnail")?;
        match thumbnail {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map.get("@id").and_then(Value::as_str).map(String::from),
            _ => None,
        }
    }

    fn first_canvas_image(document: &Value) -> Option<String> {
        let resource = document
            .get("sequences")?
            .get(0)?
            .get("canvases")?
            .get(0)?
            .get("images")?
            .get(0)?
            .get("resource")?;

        // An image service id is preferred over the full-size resource id.
        let id = resource
            .get("service")
            .and_then(|service| service.get("@id"))
            .or_else(|| resource.get("@id"))?;
        id.as_str().map(String::from)
    }

    fn apply_size_suffix(&self, uri: &str) -> String {
        for pattern in &self.strip_patterns {
            if pattern.is_match(uri) {
                return pattern
                    .replace(uri, self.config.thumbnail_suffix.as_str())
                    .into_owned();
            }
        }
        // Already a concrete image file: leave it alone. Bare service ids
        // get the sizing suffix appended.
        let lower = uri.to_lowercase();
        if lower.ends_with(".jpg") || lower.ends_with(".jpeg") || lower.ends_with(".png") {
            uri.to_string()
        } else {
            format!("{}{}", uri.trim_end_matches('/'), self.config.thumbnail_suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalizer() -> Normalizer {
        Normalizer::new(&Config::default()).unwrap()
    }

    fn sample_manifest() -> Value {
        json!({
            "@id": "https://cudl.lib.cam.ac.uk/iiif/MS-ADD-00269",
            "@type": "sc:Manifest",
            "label": "Codex <i>Bezae</i>",
            "description": ["A fifth-century manuscript.", "Greek and Latin."],
            "metadata": [
                {"label": "Author(s)", "value": "Unknown scribe"},
                {"label": "Date of Creation", "value": "c. 400"},
                {"label": "Language(s)", "value": "Greek; Latin"},
                {"label": "Material", "value": "<span>Parchment</span>"}
            ],
            "sequences": [{
                "canvases": [{
                    "images": [{
                        "resource": {
                            "@id": "https://images.example.org/full/full/0/default.jpg",
                            "service": {"@id": "https://images.example.org/iiif/MS-ADD-00269-000-00001"}
                        }
                    }]
                }]
            }]
        })
    }

    #[test]
    fn test_normalize_extracts_all_fields() {
        let record = normalizer()
            .normalize("https://seed.example.org/m.json", &sample_manifest())
            .unwrap();
        assert_eq!(record.manifest_uri, "https://cudl.lib.cam.ac.uk/iiif/MS-ADD-00269");
        assert_eq!(record.label, "Codex Bezae");
        assert_eq!(
            record.description.as_deref(),
            Some("A fifth-century manuscript., Greek and Latin.")
        );
        assert_eq!(record.author.as_deref(), Some("Unknown scribe"));
        assert_eq!(record.date.as_deref(), Some("c. 400"));
        assert_eq!(record.language.as_deref(), Some("Greek; Latin"));
        assert_eq!(record.material.as_deref(), Some("Parchment"));
        // URI rule from default config
        assert_eq!(record.repository.as_deref(), Some("Cambridge University Library"));
        assert_eq!(
            record.thumbnail_uri.as_deref(),
            Some("https://images.example.org/iiif/MS-ADD-00269-000-00001/full/!200,200/0/default.jpg")
        );
    }

    #[test]
    fn test_missing_id_is_normalization_error() {
        let document = json!({"@type": "sc:Manifest", "label": "No id"});
        let error = normalizer()
            .normalize("https://seed.example.org/m.json", &document)
            .unwrap_err();
        assert!(matches!(error, AppError::Normalization { .. }));
    }

    #[test]
    fn test_missing_label_falls_back_to_untitled() {
        let document = json!({"@id": "https://example.org/iiif/m1"});
        let record = normalizer()
            .normalize("https://example.org/iiif/m1", &document)
            .unwrap();
        assert_eq!(record.label, UNTITLED);
        assert_eq!(record.author, None);
        assert_eq!(record.thumbnail_uri, None);
    }

    #[test]
    fn test_declared_thumbnail_preferred_and_resized() {
        let document = json!({
            "@id": "https://example.org/iiif/m2",
            "thumbnail": {"@id": "https://images.example.org/m2/full/300,/0/native.jpg"},
        });
        let record = normalizer()
            .normalize("https://example.org/iiif/m2", &document)
            .unwrap();
        assert_eq!(
            record.thumbnail_uri.as_deref(),
            Some("https://images.example.org/m2/full/!200,200/0/default.jpg")
        );
    }

    #[test]
    fn test_relative_thumbnail_is_dropped() {
        let document = json!({
            "@id": "https://example.org/iiif/m3",
            "thumbnail": "/thumbs/m3.jpg",
        });
        let record = normalizer()
            .normalize("https://example.org/iiif/m3", &document)
            .unwrap();
        assert_eq!(record.thumbnail_uri, None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = normalizer();
        let a = n
            .normalize("https://seed.example.org/m.json", &sample_manifest())
            .unwrap();
        let b = n
            .normalize("https://seed.example.org/m.json", &sample_manifest())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_author_synonym_priority_is_configured_order() {
        let document = json!({
            "@id": "https://example.org/iiif/m4",
            "metadata": [
                {"label": "Artist", "value": "Second choice"},
                {"label": "Author", "value": "First choice"}
            ]
        });
        let record = normalizer()
            .normalize("https://example.org/iiif/m4", &document)
            .unwrap();
        // "author" precedes "artist" in the default synonym list.
        assert_eq!(record.author.as_deref(), Some("First choice"));
    }
}
