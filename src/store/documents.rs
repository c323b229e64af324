//! Typed access to the documents of one collection.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use super::{
    to_fields, CollectionPath, DocPath, DocumentStore, StoreError, Subscription, WriteMode,
};

/// Trait for records stored as documents.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Name of the collection segment holding this record type
    /// (e.g. "decks", "ownedCards", "cards").
    const COLLECTION: &'static str;

    /// Document id of this record inside its collection.
    fn id(&self) -> &str;
}

/// A record together with the store version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Typed repository over the documents of a single collection.
pub struct DocumentRepository<'a, S: ?Sized, D> {
    store: &'a S,
    collection: CollectionPath,
    _marker: PhantomData<D>,
}

impl<'a, S: DocumentStore + ?Sized, D: Document> DocumentRepository<'a, S, D> {
    pub fn new(store: &'a S, collection: CollectionPath) -> Self {
        Self {
            store,
            collection,
            _marker: PhantomData,
        }
    }

    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    /// Path of the document with `id`.
    pub fn path(&self, id: &str) -> DocPath {
        self.collection.doc(id)
    }

    /// Get a record by id.
    pub fn get(&self, id: &str) -> Result<Option<Versioned<D>>, StoreError> {
        match self.store.get(&self.path(id))? {
            Some(snapshot) => Ok(Some(Versioned {
                data: snapshot.decode()?,
                version: snapshot.version,
            })),
            None => Ok(None),
        }
    }

    /// Write the record as the whole document.
    pub fn save(&self, record: &D) -> Result<u64, StoreError> {
        self.store
            .set(&self.path(record.id()), to_fields(record)?, WriteMode::Replace)
    }

    /// Merge the record's fields into the document, creating it if absent.
    pub fn merge(&self, record: &D) -> Result<u64, StoreError> {
        self.store
            .set(&self.path(record.id()), to_fields(record)?, WriteMode::Merge)
    }

    /// Merge a partial update (any serializable object) into the document.
    pub fn merge_fields<P: Serialize + ?Sized>(&self, id: &str, partial: &P) -> Result<u64, StoreError> {
        self.store
            .set(&self.path(id), to_fields(partial)?, WriteMode::Merge)
    }

    /// Merge a partial update into an existing document. Fails when absent.
    pub fn update_fields<P: Serialize + ?Sized>(&self, id: &str, partial: &P) -> Result<u64, StoreError> {
        self.store.update(&self.path(id), to_fields(partial)?)
    }

    /// Delete a record by id. Returns true if it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(&self.path(id))
    }

    /// Every record in the collection, ordered by id. Documents that do not
    /// decode as `D` are skipped.
    pub fn list(&self) -> Result<Vec<Versioned<D>>, StoreError> {
        let snapshot = self.store.list(&self.collection)?;
        Ok(snapshot
            .iter()
            .filter_map(|doc| match doc.decode::<D>() {
                Ok(data) => Some(Versioned {
                    data,
                    version: doc.version,
                }),
                Err(err) => {
                    tracing::warn!(path = %doc.path, error = %err, "skipping undecodable document");
                    None
                }
            })
            .collect())
    }

    /// Records matching a predicate.
    pub fn find(&self, predicate: &dyn Fn(&D) -> bool) -> Result<Vec<Versioned<D>>, StoreError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| predicate(&record.data))
            .collect())
    }

    /// Number of documents in the collection.
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.store.list(&self.collection)?.len())
    }

    /// Watch the collection for changes.
    pub fn subscribe(&self) -> Result<Subscription, StoreError> {
        self.store.subscribe(&self.collection)
    }
}

/// Extension trait for typed document access on any DocumentStore.
pub trait DocumentsExt: DocumentStore {
    /// Get a typed repository over `collection`.
    fn documents<D: Document>(&self, collection: CollectionPath) -> DocumentRepository<'_, Self, D> {
        DocumentRepository::new(self, collection)
    }
}

impl<S: DocumentStore + ?Sized> DocumentsExt for S {}
