//! Document Store
//!
//! Revisioned JSON documents addressed by string ids, in the manner of a
//! browser-local document database. Revision and conflict rules live in
//! [`KvStore`]; backends only move strings in and out of a key/value map.

mod document;
mod error;
mod kv_store;
mod memory;
mod traits;

#[cfg(target_arch = "wasm32")]
mod local_storage;


pub use document::{AllDocsOptions, PutResponse, Revision, Row, RowValue, ID_FIELD, REV_FIELD};
pub use error::{StoreError, StoreResult};
pub use kv_store::KvStore;
pub use memory::{MemoryBackend, MemoryStore};
pub use traits::{DocumentStore, KvBackend};

#[cfg(target_arch = "wasm32")]
pub use local_storage::{LocalStorageBackend, LocalStorageStore};
