//! Session upload log
//!
//! Most-recent-first record of uploads completed by this process. Lives
//! only as long as the process; nothing is persisted.

use std::sync::{Arc, RwLock};

use super::image::SessionUploadEntry;

/// Shared, prepend-only log of this session's uploads
///
/// Cloning the handle shares the underlying log.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    entries: Arc<RwLock<Vec<SessionUploadEntry>>>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an upload at the front of the log
    pub fn record(&self, entry: SessionUploadEntry) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(0, entry);
    }

    /// Snapshot of the log, newest first
    pub fn entries(&self) -> Vec<SessionUploadEntry> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, at: i64) -> SessionUploadEntry {
        SessionUploadEntry {
            key: key.to_string(),
            backend_url: format!("http://h/image/{key}?w=400"),
            original_name: format!("{key}.jpg"),
            uploaded_at: at,
        }
    }

    #[test]
    fn test_record_prepends() {
        let log = SessionLog::new();
        log.record(entry("first", 1));
        log.record(entry("second", 2));

        let keys: Vec<_> = log.entries().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["second", "first"]);
    }

    #[test]
    fn test_clones_share_state() {
        let log = SessionLog::new();
        let other = log.clone();
        other.record(entry("k", 1));

        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
    }

    #[test]
    fn test_clear() {
        let log = SessionLog::new();
        log.record(entry("k", 1));
        log.clear();
        assert!(log.is_empty());
    }
}
