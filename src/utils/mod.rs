//! Utility functions and helpers.

use sha2::{Digest, Sha256};
use url::Url;

/// Length of the hex id derived from the manifest URI hash.
const RECORD_ID_LEN: usize = 16;

/// Derive the stable record id for a manifest URI.
///
/// SHA-256 of the URI, truncated to 16 hex characters. Deterministic across
/// runs so repeated harvests of unchanged content produce identical records.
pub fn record_id(manifest_uri: &str) -> String {
    let digest = Sha256::digest(manifest_uri.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(RECORD_ID_LEN);
    id
}

/// Check whether a string is an absolute http(s) URL.
pub fn is_absolute_http_url(candidate: &str) -> bool {
    matches!(
        Url::parse(candidate),
        Ok(url) if url.scheme() == "http" || url.scheme() == "https"
    )
}
