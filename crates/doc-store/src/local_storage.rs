//! Browser localStorage Backend
//!
//! Only built for wasm32. Every JS failure maps to `StoreError::Backend`.

use web_sys::Storage;

use crate::error::{StoreError, StoreResult};
use crate::kv_store::KvStore;
use crate::traits::{walk_indexed_keys, KvBackend};

pub struct LocalStorageBackend {
    storage: Storage,
}

impl LocalStorageBackend {
    pub fn open() -> StoreResult<Self> {
        let window = web_sys::window().ok_or_else(|| StoreError::Backend("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Backend(format!("localStorage: {:?}", e)))?
            .ok_or_else(|| StoreError::Backend("localStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl KvBackend for LocalStorageBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Backend(format!("get {}: {:?}", key, e)))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Backend(format!("set {}: {:?}", key, e)))
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let len = self
            .storage
            .length()
            .map_err(|e| StoreError::Backend(format!("length: {:?}", e)))?;
        walk_indexed_keys(len, |i| {
            self.storage
                .key(i)
                .map_err(|e| StoreError::Backend(format!("key {}: {:?}", i, e)))
        })
    }
}

pub type LocalStorageStore = KvStore<LocalStorageBackend>;

impl KvStore<LocalStorageBackend> {
    /// Open the named database in the page's localStorage
    pub fn open(name: impl Into<String>) -> StoreResult<Self> {
        Ok(KvStore::new(name, LocalStorageBackend::open()?))
    }
}
