//! InMemoryDocumentStore - BTreeMap-backed document store for tests and
//! single-process use.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;

use super::{
    CollectionPath, CollectionSnapshot, DocPath, DocumentSnapshot, DocumentStore, Fields,
    SnapshotSender, StoreError, Subscription, WriteMode,
};

/// Internal stored representation of a document.
struct StoredDocument {
    fields: Fields,
    version: u64,
}

struct Watcher {
    collection: CollectionPath,
    sender: SnapshotSender,
}

/// In-memory document store.
///
/// Storage key is the full document path, so a collection listing is a
/// range scan. Clone-friendly via Arc; clones share storage and watchers.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    storage: Arc<RwLock<BTreeMap<String, StoredDocument>>>,
    watchers: Arc<Mutex<Vec<Watcher>>>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(BTreeMap::new())),
            watchers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Total number of documents across all collections.
    pub fn len(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write_document(
        &self,
        path: &DocPath,
        operation: &'static str,
        apply: impl FnOnce(Option<&mut StoredDocument>) -> Result<Option<StoredDocument>, StoreError>,
    ) -> Result<u64, StoreError> {
        path.validate()?;
        let version = {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StoreError::LockPoisoned(operation))?;
            let key = path.as_str();
            match apply(storage.get_mut(key))? {
                Some(created) => {
                    let version = created.version;
                    storage.insert(key.to_string(), created);
                    version
                }
                None => storage.get(key).map(|doc| doc.version).unwrap_or(0),
            }
        };
        tracing::debug!(path = %path, version, operation, "document written");
        self.notify(&path.parent())?;
        Ok(version)
    }

    fn snapshot(&self, collection: &CollectionPath) -> Result<CollectionSnapshot, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("list"))?;

        let prefix = format!("{}/", collection.as_str());
        let documents = storage
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| !key[prefix.len()..].contains('/'))
            .map(|(key, stored)| DocumentSnapshot {
                path: collection.doc(&key[prefix.len()..]),
                fields: stored.fields.clone(),
                version: stored.version,
            })
            .collect();

        Ok(CollectionSnapshot { documents })
    }

    fn notify(&self, collection: &CollectionPath) -> Result<(), StoreError> {
        let mut watchers = self
            .watchers
            .lock()
            .map_err(|_| StoreError::LockPoisoned("notify"))?;
        if !watchers.iter().any(|w| &w.collection == collection) {
            return Ok(());
        }

        let snapshot = self.snapshot(collection)?;
        watchers.retain(|watcher| {
            if &watcher.collection != collection {
                return true;
            }
            watcher.sender.send(snapshot.clone())
        });
        Ok(())
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, path: &DocPath) -> Result<Option<DocumentSnapshot>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("get"))?;

        Ok(storage.get(path.as_str()).map(|stored| DocumentSnapshot {
            path: path.clone(),
            fields: stored.fields.clone(),
            version: stored.version,
        }))
    }

    fn set(&self, path: &DocPath, fields: Fields, mode: WriteMode) -> Result<u64, StoreError> {
        self.write_document(path, "set", move |existing| match (existing, mode) {
            (Some(doc), WriteMode::Merge) => {
                doc.fields.extend(fields);
                doc.version += 1;
                Ok(None)
            }
            (Some(doc), WriteMode::Replace) => {
                doc.fields = fields;
                doc.version += 1;
                Ok(None)
            }
            (None, _) => Ok(Some(StoredDocument { fields, version: 1 })),
        })
    }

    fn update(&self, path: &DocPath, fields: Fields) -> Result<u64, StoreError> {
        self.write_document(path, "update", move |existing| match existing {
            Some(doc) => {
                doc.fields.extend(fields);
                doc.version += 1;
                Ok(None)
            }
            None => Err(StoreError::NotFound {
                path: path.to_string(),
            }),
        })
    }

    fn increment(&self, path: &DocPath, field: &str, delta: i64) -> Result<i64, StoreError> {
        let mut result = 0;
        self.write_document(path, "increment", |existing| {
            let current = match existing.as_ref().and_then(|doc| doc.fields.get(field)) {
                None | Some(Value::Null) => 0,
                Some(Value::Number(n)) => n.as_i64().ok_or_else(|| StoreError::NotNumeric {
                    path: path.to_string(),
                    field: field.to_string(),
                })?,
                Some(_) => {
                    return Err(StoreError::NotNumeric {
                        path: path.to_string(),
                        field: field.to_string(),
                    })
                }
            };
            result = current.saturating_add(delta);

            match existing {
                Some(doc) => {
                    doc.fields.insert(field.to_string(), Value::from(result));
                    doc.version += 1;
                    Ok(None)
                }
                None => {
                    let mut fields = Fields::new();
                    fields.insert(field.to_string(), Value::from(result));
                    Ok(Some(StoredDocument { fields, version: 1 }))
                }
            }
        })?;
        Ok(result)
    }

    fn delete(&self, path: &DocPath) -> Result<bool, StoreError> {
        let removed = {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StoreError::LockPoisoned("delete"))?;
            storage.remove(path.as_str()).is_some()
        };
        if removed {
            tracing::debug!(path = %path, "document deleted");
            self.notify(&path.parent())?;
        }
        Ok(removed)
    }

    fn list(&self, collection: &CollectionPath) -> Result<CollectionSnapshot, StoreError> {
        self.snapshot(collection)
    }

    fn subscribe(&self, collection: &CollectionPath) -> Result<Subscription, StoreError> {
        let (sender, subscription) = Subscription::channel(collection.clone());

        // Held across the initial snapshot so a concurrent write either lands
        // in it or notifies this watcher afterwards.
        let mut watchers = self
            .watchers
            .lock()
            .map_err(|_| StoreError::LockPoisoned("subscribe"))?;
        sender.send(self.snapshot(collection)?);
        watchers.push(Watcher {
            collection: collection.clone(),
            sender,
        });
        Ok(subscription)
    }
}
