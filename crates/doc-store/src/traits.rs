//! Store Traits
//!
//! `DocumentStore` is the capability the UI talks to. `KvBackend` is the
//! raw key/value medium a [`KvStore`](crate::KvStore) is built on.

use async_trait::async_trait;
use serde_json::Value;

use crate::document::{AllDocsOptions, PutResponse, Row};
use crate::error::StoreResult;

/// CRUD over revisioned JSON documents
///
/// Futures are not `Send`: the browser backend holds JS handles and every
/// call runs on the UI thread.
#[async_trait(?Send)]
pub trait DocumentStore {
    /// Database name
    fn name(&self) -> &str;

    /// List documents ordered by id
    async fn all_docs(&self, options: AllDocsOptions) -> StoreResult<Vec<Row>>;

    /// Create a new document. The document must carry a string `_id`.
    async fn post(&self, doc: Value) -> StoreResult<PutResponse>;

    /// Fetch a document, including its `_id` and current `_rev`
    async fn get(&self, id: &str) -> StoreResult<Value>;

    /// Write a document. Updates must carry the current `_rev`.
    async fn put(&self, doc: Value) -> StoreResult<PutResponse>;

    /// Release the database. Later calls fail with `StoreError::Closed`.
    fn close(&self);
}

/// String key/value medium
pub trait KvBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// All keys currently present, in no particular order
    fn keys(&self) -> StoreResult<Vec<String>>;
}

/// Collect every key of an index-addressed store such as `Storage`
///
/// `key_at` is asked for slots `0..len`; empty slots are skipped.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn walk_indexed_keys<F>(len: u32, mut key_at: F) -> StoreResult<Vec<String>>
where
    F: FnMut(u32) -> StoreResult<Option<String>>,
{
    let mut keys = Vec::with_capacity(len as usize);
    for i in 0..len {
        if let Some(key) = key_at(i)? {
            keys.push(key);
        }
    }
    Ok(keys)
}

/// Lets several databases share one backend, as pages share localStorage
impl<B: KvBackend + ?Sized> KvBackend for std::rc::Rc<B> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }
}
