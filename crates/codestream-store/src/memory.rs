//! In-memory store backend

use crate::error::{StoreError, StoreResult};
use crate::traits::{StoreReader, StoreWriter};
use crate::types::{CloneDoc, StatusEntry};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-process store backend.
///
/// Counters are atomics, document collections sit behind `RwLock`s. All
/// collections are append-only and bounded only by process memory, matching
/// the store contract this crate abstracts.
#[derive(Default)]
pub struct MemoryStore {
    files: RwLock<Vec<String>>,
    chunks: AtomicU64,
    candidates: AtomicU64,
    clones: RwLock<Vec<CloneDoc>>,
    status: RwLock<Vec<StatusEntry>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreReader for MemoryStore {
    fn files_count(&self) -> StoreResult<u64> {
        Ok(self.files.read().len() as u64)
    }

    fn file_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.files.read().clone())
    }

    fn chunks_count(&self) -> StoreResult<u64> {
        Ok(self.chunks.load(Ordering::Relaxed))
    }

    fn candidates_count(&self) -> StoreResult<u64> {
        Ok(self.candidates.load(Ordering::Relaxed))
    }

    fn clones_count(&self) -> StoreResult<u64> {
        Ok(self.clones.read().len() as u64)
    }

    fn clones(&self) -> StoreResult<Vec<CloneDoc>> {
        Ok(self.clones.read().clone())
    }

    fn status_log(&self) -> StoreResult<Vec<StatusEntry>> {
        // Stored oldest-first, served newest-first
        let mut log = self.status.read().clone();
        log.reverse();
        Ok(log)
    }
}

impl StoreWriter for MemoryStore {
    fn add_file(&self, name: &str) -> StoreResult<()> {
        self.files.write().push(name.to_string());
        Ok(())
    }

    fn add_chunks(&self, count: u64) -> StoreResult<()> {
        self.chunks.fetch_add(count, Ordering::Relaxed);
        Ok(())
    }

    fn add_candidates(&self, count: u64) -> StoreResult<()> {
        self.candidates.fetch_add(count, Ordering::Relaxed);
        Ok(())
    }

    fn add_clones(&self, clones: Vec<CloneDoc>) -> StoreResult<()> {
        // A clone document without locations cannot be reported anywhere
        if clones.iter().any(|doc| doc.instances.is_empty()) {
            return Err(StoreError::MalformedDocument {
                collection: "clones".to_string(),
                reason: "clone document has no instances".to_string(),
            });
        }
        self.clones.write().extend(clones);
        Ok(())
    }

    fn push_status(&self, message: &str) -> StoreResult<()> {
        self.status.write().push(StatusEntry::now(message));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CloneInstance;

    #[test]
    fn test_counters_accumulate() {
        let store = MemoryStore::new();
        store.add_chunks(10).unwrap();
        store.add_chunks(5).unwrap();
        store.add_candidates(3).unwrap();
        assert_eq!(store.chunks_count().unwrap(), 15);
        assert_eq!(store.candidates_count().unwrap(), 3);
    }

    #[test]
    fn test_files_tracked_in_order() {
        let store = MemoryStore::new();
        store.add_file("a.java").unwrap();
        store.add_file("b.java").unwrap();
        assert_eq!(store.files_count().unwrap(), 2);
        assert_eq!(
            store.file_names().unwrap(),
            vec!["a.java".to_string(), "b.java".to_string()]
        );
    }

    #[test]
    fn test_status_log_newest_first() {
        let store = MemoryStore::new();
        store.push_status("first").unwrap();
        store.push_status("second").unwrap();
        let log = store.status_log().unwrap();
        assert_eq!(log[0].message, "second");
        assert_eq!(log[1].message, "first");
    }

    #[test]
    fn test_clones_append() {
        let store = MemoryStore::new();
        let doc = CloneDoc::new(vec![CloneInstance {
            file_name: "a.java".to_string(),
            start_line: 1,
            end_line: 8,
        }]);
        store.add_clones(vec![doc.clone()]).unwrap();
        store.add_clones(vec![doc]).unwrap();
        assert_eq!(store.clones().unwrap().len(), 2);
    }

    #[test]
    fn test_instanceless_clone_doc_is_rejected() {
        let store = MemoryStore::new();
        let err = store.add_clones(vec![CloneDoc::new(vec![])]).unwrap_err();
        assert!(matches!(err, StoreError::MalformedDocument { .. }));
        assert_eq!(store.clones().unwrap().len(), 0);
    }
}
