//! Document store - hierarchical key/value documents with merge writes.
//!
//! The store is the system of record for collections, decks, ownership
//! entries and summaries. Documents are JSON objects addressed by a
//! [`DocPath`]; writes either replace the whole document or merge top-level
//! fields into it. Each document write is atomic; nothing spans documents.
//!
//! ## Example
//!
//! ```ignore
//! use tcg_binder::store::{CollectionPath, DocumentStore, InMemoryDocumentStore, WriteMode};
//!
//! let store = InMemoryDocumentStore::new();
//! let decks = CollectionPath::root("users").doc("u1").collection("decks");
//! let path = store.add(&decks, fields)?;
//! store.set(&path, more_fields, WriteMode::Merge)?;
//! let snapshot = store.get(&path)?;
//! ```

mod documents;
mod in_memory;
mod path;
mod subscription;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub use documents::{Document, DocumentRepository, DocumentsExt, Versioned};
pub use in_memory::InMemoryDocumentStore;
pub use path::{CollectionPath, DocPath};
pub use subscription::{SnapshotSender, Subscription};

/// Top-level fields of a document.
pub type Fields = serde_json::Map<String, Value>;

/// Error type for document store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("document store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("document not found: {path}")]
    NotFound { path: String },
    #[error("invalid document path: {0}")]
    InvalidPath(String),
    #[error("field {field} of {path} is not numeric")]
    NotNumeric { path: String, field: String },
    #[error("document serialization error: {0}")]
    Serde(String),
    #[error("document store backend error: {0}")]
    Backend(String),
}

/// How a write combines with an existing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// The written fields become the whole document.
    Replace,
    /// Written top-level fields overwrite their counterparts; all other
    /// existing fields are kept. Creates the document when absent.
    Merge,
}

/// A document as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub path: DocPath,
    pub fields: Fields,
    pub version: u64,
}

impl DocumentSnapshot {
    pub fn id(&self) -> &str {
        self.path.id()
    }

    /// Decode the fields into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        from_fields(self.fields.clone())
    }

    /// Raw value of one field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Every document directly inside one collection, ordered by id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionSnapshot {
    pub documents: Vec<DocumentSnapshot>,
}

impl CollectionSnapshot {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentSnapshot> {
        self.documents.iter()
    }

    /// Decode every document, skipping (and logging) those that do not match `T`.
    pub fn decode_all<T: DeserializeOwned>(&self) -> Vec<T> {
        self.documents
            .iter()
            .filter_map(|doc| match doc.decode() {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(path = %doc.path, error = %err, "skipping undecodable document");
                    None
                }
            })
            .collect()
    }
}

/// Abstract hierarchical document storage.
///
/// Implementations provide per-document atomicity only. Concurrent writers
/// touching the same field follow last-write-wins.
pub trait DocumentStore: Send + Sync {
    /// Point read. Returns None if the document does not exist.
    fn get(&self, path: &DocPath) -> Result<Option<DocumentSnapshot>, StoreError>;

    /// Point write (replace or merge). Returns the new document version.
    fn set(&self, path: &DocPath, fields: Fields, mode: WriteMode) -> Result<u64, StoreError>;

    /// Merge fields into an existing document. Fails if it does not exist.
    fn update(&self, path: &DocPath, fields: Fields) -> Result<u64, StoreError>;

    /// Add `delta` to a numeric field (missing field counts as 0, missing
    /// document is created). Returns the new value.
    fn increment(&self, path: &DocPath, field: &str, delta: i64) -> Result<i64, StoreError>;

    /// Delete a document. Returns true if it existed. Sub-collections are
    /// not touched.
    fn delete(&self, path: &DocPath) -> Result<bool, StoreError>;

    /// Read every document directly inside `collection`.
    fn list(&self, collection: &CollectionPath) -> Result<CollectionSnapshot, StoreError>;

    /// Watch `collection`; see [`Subscription`].
    fn subscribe(&self, collection: &CollectionPath) -> Result<Subscription, StoreError>;

    /// Create a document with a generated id.
    fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<DocPath, StoreError> {
        let path = collection.doc(&uuid::Uuid::new_v4().simple().to_string());
        self.set(&path, fields, WriteMode::Replace)?;
        Ok(path)
    }
}

/// Serialize a record into document fields. The record must serialize to an object.
pub fn to_fields<T: Serialize + ?Sized>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value).map_err(|e| StoreError::Serde(e.to_string()))? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Serde(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Deserialize document fields into a record.
pub fn from_fields<T: DeserializeOwned>(fields: Fields) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| StoreError::Serde(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
