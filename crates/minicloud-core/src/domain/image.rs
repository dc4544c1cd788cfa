//! Image records as seen from the two sources of truth
//!
//! - [`RemoteListingEntry`] - one entry of the polled `/list` response
//! - [`SessionUploadEntry`] - an upload completed by this process
//! - [`MergedImageRecord`] - the reconciled gallery view of either

use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// RemoteListingEntry
// ============================================================================

/// An image reported by the backend's `/list` endpoint
///
/// A missing `key` deserializes as the empty string; such entries are
/// dropped when the gallery is merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteListingEntry {
    /// Backend-assigned image key
    #[serde(default)]
    pub key: String,
    /// Stored size in bytes
    #[serde(
        default,
        deserialize_with = "lenient_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<u64>,
    /// Last modification time as reported by the backend
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<String>,
}

impl RemoteListingEntry {
    /// Creates an entry carrying only a key
    pub fn from_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Returns true if the entry names an image
    pub fn has_key(&self) -> bool {
        !self.key.is_empty()
    }

    /// `last_modified` as epoch milliseconds
    ///
    /// Accepts RFC 3339 timestamps and plain integer milliseconds. Anything
    /// else is treated as missing.
    pub fn last_modified_millis(&self) -> Option<i64> {
        let raw = self.last_modified.as_deref()?.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.timestamp_millis());
        }
        raw.parse::<i64>().ok()
    }
}

fn lenient_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// ============================================================================
// SessionUploadEntry
// ============================================================================

/// An upload completed during this session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUploadEntry {
    /// Key returned by the backend
    pub key: String,
    /// Thumbnail URL built right after the upload
    pub backend_url: String,
    /// File name as selected by the user
    pub original_name: String,
    /// Upload completion time in epoch milliseconds
    pub uploaded_at: i64,
}

// ============================================================================
// MergedImageRecord
// ============================================================================

/// Which source a merged record was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Remote,
    Session,
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::Remote => write!(f, "remote"),
            RecordSource::Session => write!(f, "session"),
        }
    }
}

/// One gallery entry after reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedImageRecord {
    pub key: String,
    pub original_name: String,
    pub backend_url: String,
    /// Epoch milliseconds; `None` sorts after every dated record
    pub uploaded_at: Option<i64>,
    pub source: RecordSource,
}

impl From<&SessionUploadEntry> for MergedImageRecord {
    fn from(entry: &SessionUploadEntry) -> Self {
        Self {
            key: entry.key.clone(),
            original_name: entry.original_name.clone(),
            backend_url: entry.backend_url.clone(),
            uploaded_at: Some(entry.uploaded_at),
            source: RecordSource::Session,
        }
    }
}
