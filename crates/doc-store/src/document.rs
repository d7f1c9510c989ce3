//! Document Types
//!
//! Wire-level shapes returned by the store and the revision token format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

pub const ID_FIELD: &str = "_id";
pub const REV_FIELD: &str = "_rev";

/// Hex chars of the body digest kept in a revision
const DIGEST_LEN: usize = 32;

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutResponse {
    pub ok: bool,
    pub id: String,
    pub rev: String,
}

/// Options for `all_docs`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllDocsOptions {
    /// Attach the full document body to each row
    pub include_docs: bool,
    /// Order by id descending instead of ascending
    pub descending: bool,
}

impl Default for AllDocsOptions {
    fn default() -> Self {
        Self {
            include_docs: true,
            descending: false,
        }
    }
}

/// One entry of an `all_docs` listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub key: String,
    pub value: RowValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowValue {
    pub rev: String,
}

/// Revision token, rendered as `<generation>-<digest>`
///
/// The generation starts at 1 and grows by one per accepted write. The
/// digest hashes the previous revision together with the new body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision {
    generation: u64,
    digest: String,
}

impl Revision {
    pub fn first(body: &Map<String, Value>) -> Self {
        Self::derive(1, "", body)
    }

    pub fn next(&self, body: &Map<String, Value>) -> Self {
        Self::derive(self.generation + 1, &self.to_string(), body)
    }

    fn derive(generation: u64, previous: &str, body: &Map<String, Value>) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(previous.as_bytes());
        for (key, value) in body {
            hasher.update(key.as_bytes());
            hasher.update(value.to_string().as_bytes());
        }
        let mut digest = hasher.finalize().to_hex().to_string();
        digest.truncate(DIGEST_LEN);
        Self { generation, digest }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.generation, self.digest)
    }
}

impl FromStr for Revision {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StoreError::InvalidDocument(format!("malformed revision `{}`", s));
        let (generation, digest) = s.split_once('-').ok_or_else(invalid)?;
        let generation: u64 = generation.parse().map_err(|_| invalid())?;
        if generation == 0 || digest.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            generation,
            digest: digest.to_string(),
        })
    }
}

/// A document taken apart into id, optional revision and body
pub(crate) struct Parts {
    pub id: String,
    pub rev: Option<String>,
    pub body: Map<String, Value>,
}

impl Parts {
    pub fn split(doc: Value) -> StoreResult<Self> {
        let Value::Object(mut body) = doc else {
            return Err(StoreError::InvalidDocument("document must be a JSON object".to_string()));
        };
        let invalid = |msg: &str| StoreError::InvalidDocument(msg.to_string());
        let id = match body.remove(ID_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => id,
            Some(_) => return Err(invalid("`_id` must be a non-empty string")),
            None => return Err(invalid("missing `_id`")),
        };
        let rev = match body.remove(REV_FIELD) {
            Some(Value::String(rev)) => Some(rev),
            Some(Value::Null) | None => None,
            Some(_) => return Err(invalid("`_rev` must be a string")),
        };
        Ok(Self { id, rev, body })
    }

    /// Rebuild the stored form with `_id` and `_rev` leading the body
    pub fn assemble(id: &str, rev: &Revision, body: Map<String, Value>) -> Value {
        let mut doc = Map::with_capacity(body.len() + 2);
        doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        doc.insert(REV_FIELD.to_string(), Value::String(rev.to_string()));
        doc.extend(body);
        Value::Object(doc)
    }
}

/// Revision of a document as stored
pub(crate) fn stored_revision(doc: &Value) -> StoreResult<Revision> {
    doc.get(REV_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::InvalidDocument("stored document has no `_rev`".to_string()))?
        .parse()
}
