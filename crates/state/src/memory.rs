// Path: crates/state/src/memory.rs
//! An ordered, in-memory `StateAccess` backend.

use dwork_api::state::{next_prefix, StateAccess, StateError, StateScanIter};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::Arc;

/// Key-value store backed by a `BTreeMap`, so scans and the root hash are
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    version: u64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed batches.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Hash over every key-value pair in key order. Two stores with equal contents
    /// always have equal roots.
    pub fn root_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for (key, value) in &self.data {
            hasher.update((key.len() as u32).to_le_bytes());
            hasher.update(key);
            hasher.update((value.len() as u32).to_le_bytes());
            hasher.update(value);
        }
        hasher.finalize().into()
    }
}

impl StateAccess for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.data.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.data.remove(key);
        Ok(())
    }

    fn batch_set(&mut self, updates: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        for (key, value) in updates {
            self.data.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StateError> {
        Ok(keys.iter().map(|k| self.data.get(k).cloned()).collect())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        for key in deletes {
            self.data.remove(key);
        }
        for (key, value) in inserts {
            self.data.insert(key.clone(), value.clone());
        }
        self.version += 1;
        tracing::trace!(
            target: "state",
            version = self.version,
            inserts = inserts.len(),
            deletes = deletes.len(),
            "applied batch"
        );
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let start = Included(prefix.to_vec());
        let end = match next_prefix(prefix) {
            Some(ub) => Excluded(ub),
            None => Unbounded,
        };
        let iter = self
            .data
            .range((start, end))
            .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice()))));
        Ok(Box::new(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dwork_api::state::StateOverlay;

    #[test]
    fn prefix_scan_is_ordered_and_bounded() {
        let mut store = MemoryStore::new();
        store.insert(b"job::b", b"2").unwrap();
        store.insert(b"job::a", b"1").unwrap();
        store.insert(b"jobs", b"x").unwrap();
        store.insert(b"ws::a", b"y").unwrap();

        let keys: Vec<Vec<u8>> = store
            .prefix_scan(b"job::")
            .unwrap()
            .map(|r| r.unwrap().0.to_vec())
            .collect();
        assert_eq!(keys, vec![b"job::a".to_vec(), b"job::b".to_vec()]);
    }

    #[test]
    fn root_hash_tracks_content_not_history() {
        let mut a = MemoryStore::new();
        let mut b = MemoryStore::new();
        a.insert(b"k1", b"v1").unwrap();
        a.insert(b"k2", b"v2").unwrap();
        b.insert(b"k2", b"v2").unwrap();
        b.insert(b"tmp", b"t").unwrap();
        b.delete(b"tmp").unwrap();
        b.insert(b"k1", b"v1").unwrap();
        assert_eq!(a.root_hash(), b.root_hash());

        b.insert(b"k1", b"other").unwrap();
        assert_ne!(a.root_hash(), b.root_hash());
    }

    #[test]
    fn overlay_batch_commits_into_store() {
        let mut store = MemoryStore::new();
        store.insert(b"gone", b"1").unwrap();
        let (inserts, deletes) = {
            let mut overlay = StateOverlay::new(&store);
            overlay.insert(b"new", b"2").unwrap();
            overlay.delete(b"gone").unwrap();
            overlay.into_ordered_batch()
        };
        store.batch_apply(&inserts, &deletes).unwrap();
        assert_eq!(store.get(b"new").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.get(b"gone").unwrap(), None);
        assert_eq!(store.version(), 1);
    }
}
