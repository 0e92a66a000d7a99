//! Deterministic in-memory collaborators for tests and local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use fragvault_core::{FileRecord, FragmentRef, VaultError, VaultResult};

use crate::catalog::Catalog;
use crate::store::FragmentStore;

/// In-memory fragment store.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    gets: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get` calls served so far. Lets tests assert that a
    /// rejected download never touched storage.
    pub fn get_count(&self) -> u64 {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Flip one bit of a stored object. Test helper for tamper scenarios.
    pub fn corrupt(&self, reference: &FragmentRef, byte_offset: usize) {
        let mut objects = self.objects.lock().unwrap();
        let data = objects
            .get_mut(reference.as_str())
            .expect("corrupting an object that was never stored");
        data[byte_offset] ^= 0x01;
    }
}

#[async_trait]
impl FragmentStore for MemoryStore {
    async fn put(&self, scope: &str, index: u64, data: Vec<u8>) -> VaultResult<FragmentRef> {
        let key = format!("memory/fragments/{scope}/{index}");
        self.objects.lock().unwrap().insert(key.clone(), data);
        Ok(FragmentRef(key))
    }

    async fn get(&self, reference: &FragmentRef) -> VaultResult<Vec<u8>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .get(reference.as_str())
            .cloned()
            .ok_or_else(|| VaultError::Storage(format!("no such fragment: {reference}")))
    }
}

/// Store wrapper that fails `put` for one fragment index, for
/// all-or-nothing commit tests.
pub struct FailingStore<S> {
    inner: S,
    fail_put_at: u64,
}

impl<S: FragmentStore> FailingStore<S> {
    pub fn new(inner: S, fail_put_at: u64) -> Self {
        Self { inner, fail_put_at }
    }
}

#[async_trait]
impl<S: FragmentStore> FragmentStore for FailingStore<S> {
    async fn put(&self, scope: &str, index: u64, data: Vec<u8>) -> VaultResult<FragmentRef> {
        if index == self.fail_put_at {
            return Err(VaultError::Storage(format!(
                "injected put failure at index {index}"
            )));
        }
        self.inner.put(scope, index, data).await
    }

    async fn get(&self, reference: &FragmentRef) -> VaultResult<Vec<u8>> {
        self.inner.get(reference).await
    }
}

/// In-memory catalog.
#[derive(Default)]
pub struct MemoryCatalog {
    records: Mutex<HashMap<String, FileRecord>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn create(&self, record: FileRecord) -> VaultResult<String> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.id) {
            return Err(VaultError::Storage(format!(
                "catalog id collision: {}",
                record.id
            )));
        }
        let id = record.id.clone();
        records.insert(id.clone(), record);
        Ok(id)
    }

    async fn find_by_id(&self, id: &str) -> VaultResult<Option<FileRecord>> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        let reference = store.put("s", 0, b"data".to_vec()).await.unwrap();
        assert_eq!(store.get(&reference).await.unwrap(), b"data");
        assert_eq!(store.get_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_store_fails_only_target_index() {
        let store = FailingStore::new(MemoryStore::new(), 1);
        assert!(store.put("s", 0, vec![0]).await.is_ok());
        assert!(store.put("s", 1, vec![1]).await.is_err());
        assert!(store.put("s", 2, vec![2]).await.is_ok());
    }
}
