//! Key/Value Document Store
//!
//! Implements `DocumentStore` on top of any `KvBackend`. Documents are
//! stored as JSON strings under `<name>/<id>`.

use std::cell::Cell;

use async_trait::async_trait;
use serde_json::Value;

use crate::document::{
    stored_revision, AllDocsOptions, Parts, PutResponse, Revision, Row, RowValue,
};
use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentStore, KvBackend};

pub struct KvStore<B> {
    name: String,
    prefix: String,
    backend: B,
    closed: Cell<bool>,
}

impl<B: KvBackend> KvStore<B> {
    pub fn new(name: impl Into<String>, backend: B) -> Self {
        let name = name.into();
        let prefix = format!("{}/", name);
        Self {
            name,
            prefix,
            backend,
            closed: Cell::new(false),
        }
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.get() {
            return Err(StoreError::Closed(self.name.clone()));
        }
        Ok(())
    }

    fn key_for(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }

    fn read(&self, id: &str) -> StoreResult<Option<Value>> {
        match self.backend.get(&self.key_for(id))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write(&self, parts: Parts, rev: Revision) -> StoreResult<PutResponse> {
        let doc = Parts::assemble(&parts.id, &rev, parts.body);
        self.backend.set(&self.key_for(&parts.id), &serde_json::to_string(&doc)?)?;
        log::debug!("[Db] {} wrote {} at {}", self.name, parts.id, rev);
        Ok(PutResponse {
            ok: true,
            id: parts.id,
            rev: rev.to_string(),
        })
    }
}

#[async_trait(?Send)]
impl<B: KvBackend> DocumentStore for KvStore<B> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn all_docs(&self, options: AllDocsOptions) -> StoreResult<Vec<Row>> {
        self.ensure_open()?;
        let mut ids: Vec<String> = self
            .backend
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.prefix).map(str::to_string))
            .collect();
        ids.sort();
        if options.descending {
            ids.reverse();
        }

        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            // Keys can disappear between listing and reading
            let Some(raw) = self.backend.get(&self.key_for(&id))? else { continue };
            let (doc, rev) = match parse_stored(&raw) {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::warn!("[Db] {} skipping unreadable entry {}: {}", self.name, id, e);
                    continue;
                }
            };
            rows.push(Row {
                key: id.clone(),
                id,
                value: RowValue { rev: rev.to_string() },
                doc: options.include_docs.then_some(doc),
            });
        }
        Ok(rows)
    }

    async fn post(&self, doc: Value) -> StoreResult<PutResponse> {
        self.ensure_open()?;
        let parts = Parts::split(doc)?;
        if self.read(&parts.id)?.is_some() {
            return Err(StoreError::Conflict(parts.id));
        }
        let rev = Revision::first(&parts.body);
        self.write(parts, rev)
    }

    async fn get(&self, id: &str) -> StoreResult<Value> {
        self.ensure_open()?;
        self.read(id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn put(&self, doc: Value) -> StoreResult<PutResponse> {
        self.ensure_open()?;
        let parts = Parts::split(doc)?;
        let rev = match (self.read(&parts.id)?, parts.rev.as_deref()) {
            (None, None) => Revision::first(&parts.body),
            (Some(current), Some(given)) => {
                let current = stored_revision(&current)?;
                if current.to_string() != given {
                    return Err(StoreError::Conflict(parts.id));
                }
                current.next(&parts.body)
            }
            // Update of a missing document, or overwrite without a revision
            (None, Some(_)) | (Some(_), None) => return Err(StoreError::Conflict(parts.id)),
        };
        self.write(parts, rev)
    }

    fn close(&self) {
        if !self.closed.replace(true) {
            log::info!("[Db] closed {}", self.name);
        }
    }
}

/// Stored JSON and its revision
fn parse_stored(raw: &str) -> StoreResult<(Value, Revision)> {
    let doc: Value = serde_json::from_str(raw)?;
    let rev = stored_revision(&doc)?;
    Ok((doc, rev))
}
