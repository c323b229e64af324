//! User-named collections and their card entries.

use std::cmp::Ordering;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::card::Card;
use crate::config::NameRules;
use crate::records::{Collection, CollectionCardEntry};
use crate::session::UserScope;
use crate::store::{DocumentRepository, DocumentStore, DocumentsExt, StoreError, Subscription};
use crate::validation::{validate_name, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("collection not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameOrder {
    #[default]
    Ascending,
    Descending,
}

/// A collection with its entry counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionOverview {
    pub collection: Collection,
    /// Entries in the collection.
    pub total_count: usize,
    /// Entries with a positive quantity.
    pub card_count: usize,
}

#[derive(Serialize)]
struct NamePatch<'a> {
    name: &'a str,
}

/// A user's collections.
pub struct Collections<'a, S: ?Sized> {
    store: &'a S,
    user: UserScope,
    rules: &'a NameRules,
}

impl<'a, S: DocumentStore + ?Sized> Collections<'a, S> {
    pub fn new(store: &'a S, user: UserScope, rules: &'a NameRules) -> Self {
        Self { store, user, rules }
    }

    fn repo(&self) -> DocumentRepository<'a, S, Collection> {
        self.store.documents::<Collection>(self.user.collections())
    }

    fn cards(&self, collection_id: &str) -> DocumentRepository<'a, S, CollectionCardEntry> {
        self.store
            .documents::<CollectionCardEntry>(self.user.collection_cards(collection_id))
    }

    /// Create a collection. The name is trimmed and validated first.
    pub fn create(&self, name: &str) -> Result<Collection, CollectionError> {
        let name = validate_name(name, self.rules)?;
        let collection = Collection {
            id: Uuid::new_v4().simple().to_string(),
            name,
            created_at: Some(Utc::now()),
        };
        self.repo().save(&collection)?;
        tracing::info!(collection_id = %collection.id, name = %collection.name, "created collection");
        Ok(collection)
    }

    pub fn get(&self, id: &str) -> Result<Option<Collection>, CollectionError> {
        Ok(self.repo().get(id)?.map(|record| {
            let mut collection = record.data;
            if collection.id.is_empty() {
                collection.id = id.to_string();
            }
            collection
        }))
    }

    pub fn rename(&self, id: &str, name: &str) -> Result<(), CollectionError> {
        let name = validate_name(name, self.rules)?;
        self.repo()
            .update_fields(id, &NamePatch { name: &name })
            .map_err(|err| match err {
                StoreError::NotFound { .. } => CollectionError::NotFound(id.to_string()),
                other => CollectionError::Store(other),
            })?;
        tracing::debug!(collection_id = id, name = %name, "renamed collection");
        Ok(())
    }

    /// Delete the collection document only; its card entries stay in the
    /// store. Returns true if it existed.
    pub fn delete(&self, id: &str) -> Result<bool, CollectionError> {
        let existed = self.repo().delete(id)?;
        tracing::info!(collection_id = id, existed, "deleted collection");
        Ok(existed)
    }

    /// Delete every card entry, then the collection document. Returns the
    /// number of entries removed.
    pub fn delete_cascade(&self, id: &str) -> Result<usize, CollectionError> {
        let cards = self.cards(id);
        let entries = self.store.list(cards.collection())?;
        let mut removed = 0;
        for entry in entries.iter() {
            if cards.delete(entry.id())? {
                removed += 1;
            }
        }
        self.repo().delete(id)?;
        tracing::info!(collection_id = id, entries = removed, "deleted collection and entries");
        Ok(removed)
    }

    /// Every collection with its counts, sorted by name.
    pub fn list_with_counts(&self, order: NameOrder) -> Result<Vec<CollectionOverview>, CollectionError> {
        let snapshot = self.store.list(&self.user.collections())?;
        let mut overviews = Vec::with_capacity(snapshot.len());

        for doc in snapshot.iter() {
            let mut collection = match doc.decode::<Collection>() {
                Ok(collection) => collection,
                Err(err) => {
                    tracing::warn!(path = %doc.path, error = %err, "skipping undecodable collection");
                    continue;
                }
            };
            if collection.id.is_empty() {
                collection.id = doc.id().to_string();
            }

            let entries = self.cards(doc.id()).list()?;
            let card_count = entries
                .iter()
                .filter(|entry| entry.data.quantity() > 0)
                .count();
            overviews.push(CollectionOverview {
                collection,
                total_count: entries.len(),
                card_count,
            });
        }

        overviews.sort_by(|a, b| {
            let ordering = compare_names(&a.collection.name, &b.collection.name);
            match order {
                NameOrder::Ascending => ordering,
                NameOrder::Descending => ordering.reverse(),
            }
        });
        Ok(overviews)
    }

    /// Add `card` to a collection with nothing owned and quantity 1. An
    /// existing entry is returned unchanged.
    pub fn add_card(&self, collection_id: &str, card: &Card) -> Result<CollectionCardEntry, CollectionError> {
        let cards = self.cards(collection_id);
        if let Some(existing) = cards.get(&card.id)? {
            return Ok(existing.data);
        }
        let mut entry = CollectionCardEntry::new(card.clone());
        entry.quantity = Some(1);
        cards.save(&entry)?;
        tracing::debug!(collection_id, card_id = %card.id, "added card to collection");
        Ok(entry)
    }

    /// Every entry of a collection, ordered by card id.
    pub fn entries(&self, collection_id: &str) -> Result<Vec<CollectionCardEntry>, CollectionError> {
        Ok(self
            .cards(collection_id)
            .list()?
            .into_iter()
            .map(|record| record.data)
            .collect())
    }

    /// Watch a collection's entries. The first snapshot is delivered
    /// immediately.
    pub fn subscribe_cards(&self, collection_id: &str) -> Result<Subscription, CollectionError> {
        Ok(self.cards(collection_id).subscribe()?)
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
