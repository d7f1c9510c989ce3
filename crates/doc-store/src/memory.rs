//! In-Memory Backend

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::StoreResult;
use crate::kv_store::KvStore;
use crate::traits::KvBackend;

/// Ordered map kept for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

pub type MemoryStore = KvStore<MemoryBackend>;

impl KvStore<MemoryBackend> {
    pub fn in_memory(name: impl Into<String>) -> Self {
        KvStore::new(name, MemoryBackend::new())
    }
}
