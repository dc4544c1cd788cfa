//! Gallery merge
//!
//! Combines the polled remote listing with the session upload log into one
//! de-duplicated, newest-first sequence. The result is derived on demand
//! and never stored.
//!
//! ## Rules
//!
//! 1. Without a base URL only session uploads are shown
//! 2. Remote entries are inserted first, keyed by `key`
//! 3. Session entries replace remote ones with the same key wholesale
//! 4. Records are sorted by `uploaded_at` descending; undated records go
//!    last and ties keep insertion order

use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::debug;

use minicloud_core::domain::{
    build_image_url, MergedImageRecord, RecordSource, RemoteListingEntry, SessionUploadEntry,
    TransformParams,
};

/// Insertion-ordered map from key to record
#[derive(Default)]
struct RecordMap {
    records: Vec<MergedImageRecord>,
    index: HashMap<String, usize>,
}

impl RecordMap {
    /// Inserts a record, replacing an existing one in place
    fn upsert(&mut self, record: MergedImageRecord) {
        match self.index.get(&record.key) {
            Some(&position) => self.records[position] = record,
            None => {
                self.index.insert(record.key.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    fn into_records(self) -> Vec<MergedImageRecord> {
        self.records
    }
}

/// Merges remote and session records into the gallery view
///
/// # Arguments
/// * `base_url` - Current backend address; empty disables remote records
/// * `remote` - Last successfully polled listing
/// * `session` - Session upload log, newest first
/// * `thumbnail_width` - Width used for remote thumbnail URLs
pub fn merge_records(
    base_url: &str,
    remote: &[RemoteListingEntry],
    session: &[SessionUploadEntry],
    thumbnail_width: u32,
) -> Vec<MergedImageRecord> {
    let mut map = RecordMap::default();
    let remote_enabled = !base_url.trim().is_empty();

    if remote_enabled {
        let thumbnail = TransformParams::thumbnail(thumbnail_width);
        for entry in remote.iter().filter(|e| e.has_key()) {
            let backend_url = build_image_url(base_url, &entry.key, &thumbnail)
                .unwrap_or_else(|e| {
                    debug!(key = %entry.key, error = %e, "Cannot build thumbnail URL");
                    String::new()
                });
            map.upsert(MergedImageRecord {
                key: entry.key.clone(),
                original_name: entry.key.clone(),
                backend_url,
                uploaded_at: entry.last_modified_millis(),
                source: RecordSource::Remote,
            });
        }
    }

    for entry in session.iter().filter(|e| !e.key.is_empty()) {
        map.upsert(MergedImageRecord::from(entry));
    }

    let mut records = map.into_records();
    // `None < Some(_)`, so reversing puts undated records last
    records.sort_by_key(|r| Reverse(r.uploaded_at));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:3000";

    fn remote(key: &str, last_modified: Option<&str>) -> RemoteListingEntry {
        RemoteListingEntry {
            key: key.to_string(),
            size: None,
            last_modified: last_modified.map(str::to_string),
        }
    }

    fn session(key: &str, name: &str, uploaded_at: i64) -> SessionUploadEntry {
        SessionUploadEntry {
            key: key.to_string(),
            backend_url: format!("{BASE}/image/{key}?w=400"),
            original_name: name.to_string(),
            uploaded_at,
        }
    }

    fn keys(records: &[MergedImageRecord]) -> Vec<&str> {
        records.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn test_remote_records_use_key_and_thumbnail() {
        let merged = merge_records(BASE, &[remote("cat.jpg", None)], &[], 400);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].original_name, "cat.jpg");
        assert_eq!(merged[0].backend_url, "http://localhost:3000/image/cat.jpg?w=400");
        assert_eq!(merged[0].uploaded_at, None);
        assert_eq!(merged[0].source, RecordSource::Remote);
    }

    #[test]
    fn test_session_wins_wholesale() {
        let merged = merge_records(
            BASE,
            &[remote("k1", Some("5"))],
            &[session("k1", "holiday.png", 42)],
            400,
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0], MergedImageRecord::from(&session("k1", "holiday.png", 42)));
        assert_eq!(merged[0].source, RecordSource::Session);
    }

    #[test]
    fn test_sorted_descending_with_undated_last() {
        let merged = merge_records(
            BASE,
            &[remote("a", Some("500")), remote("b", None), remote("c", Some("1000"))],
            &[],
            400,
        );

        assert_eq!(keys(&merged), vec!["c", "a", "b"]);
        let stamps: Vec<_> = merged.iter().map(|r| r.uploaded_at).collect();
        assert_eq!(stamps, vec![Some(1000), Some(500), None]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let merged = merge_records(
            BASE,
            &[remote("first", None), remote("second", None)],
            &[session("s2", "b", 10), session("s1", "a", 10)],
            400,
        );

        assert_eq!(keys(&merged), vec!["s2", "s1", "first", "second"]);
    }

    #[test]
    fn test_rfc3339_last_modified_is_comparable_with_uploads() {
        let merged = merge_records(
            BASE,
            &[remote("old", Some("2020-01-01T00:00:00Z"))],
            &[session("new", "new.png", 1_700_000_000_000)],
            400,
        );

        assert_eq!(keys(&merged), vec!["new", "old"]);
        assert_eq!(merged[1].uploaded_at, Some(1_577_836_800_000));
    }

    #[test]
    fn test_keyless_entries_are_skipped() {
        let merged = merge_records(
            BASE,
            &[remote("", Some("1")), remote("ok", None)],
            &[session("", "broken.png", 3)],
            400,
        );

        assert_eq!(keys(&merged), vec!["ok"]);
    }

    #[test]
    fn test_empty_base_url_shows_session_only() {
        let merged = merge_records("", &[remote("r", Some("1"))], &[session("s", "s.png", 2)], 400);

        assert_eq!(keys(&merged), vec!["s"]);
        assert_eq!(merged[0].source, RecordSource::Session);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let remote_entries = vec![remote("a", Some("3")), remote("b", None)];
        let session_entries = vec![session("c", "c.png", 7), session("a", "a.png", 1)];

        let first = merge_records(BASE, &remote_entries, &session_entries, 400);
        let second = merge_records(BASE, &remote_entries, &session_entries, 400);
        assert_eq!(first, second);
    }

    #[test]
    fn test_thumbnail_width_is_configurable() {
        let merged = merge_records(BASE, &[remote("x", None)], &[], 250);
        assert!(merged[0].backend_url.ends_with("/image/x?w=250"));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_records(BASE, &[], &[], 400).is_empty());
        assert!(merge_records("", &[], &[], 400).is_empty());
    }
}
