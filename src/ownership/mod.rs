//! Ownership reconciliation across the denormalized ownership documents.
//!
//! A card's ownership lives in three places that must agree:
//!
//! - the entry in the collection or master set being edited (its `owned` map),
//! - the user's Owned Card Index (`ownedCards/{cardId}`), which aggregates
//!   ownership of a card across every collection and master set,
//! - the Master Set Summary of the card's set (owned / total counts).
//!
//! [`Reconciler`] performs each edit as a sequence of merge writes, one per
//! document. Nothing spans documents: a failure part-way leaves earlier
//! writes in place and is surfaced to the caller. [`Reconciler::recalculate`]
//! and [`Reconciler::backfill`] repair drift after the fact.

mod bulk;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::records::{CollectionCardEntry, MasterSetEntry, MasterSetSummary, OwnedCardIndexEntry};
use crate::session::UserScope;
use crate::store::{CollectionPath, DocPath, DocumentStore, DocumentsExt, StoreError};
use crate::variant::{OwnedMap, VariantClassifier, VariantKey};

pub use bulk::BackfillReport;

/// Master set id used for cards whose set is unknown.
pub const UNKNOWN_SET: &str = "unknown";

/// Which ownership document an edit targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnershipScope {
    /// A user collection, by collection id.
    Collection(String),
    /// A master set checklist, by set id.
    MasterSet(String),
}

impl OwnershipScope {
    pub fn collection(id: impl Into<String>) -> Self {
        Self::Collection(id.into())
    }

    pub fn master_set(set_id: impl Into<String>) -> Self {
        Self::MasterSet(set_id.into())
    }

    /// Id recorded in the index entry's `collections` list.
    pub fn source_id(&self) -> &str {
        match self {
            Self::Collection(id) | Self::MasterSet(id) => id,
        }
    }

    /// Collection holding this scope's card entries.
    pub fn cards(&self, user: &UserScope) -> CollectionPath {
        match self {
            Self::Collection(id) => user.collection_cards(id),
            Self::MasterSet(set_id) => user.master_set_cards(set_id),
        }
    }
}

impl fmt::Display for OwnershipScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection(id) => write!(f, "collection:{}", id),
            Self::MasterSet(id) => write!(f, "masterSet:{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OwnershipError {
    #[error("{variant} is not a variant of card {card_id}")]
    VariantNotApplicable { card_id: String, variant: VariantKey },
    #[error("card snapshot {snapshot} does not match card {card_id}")]
    CardMismatch { card_id: String, snapshot: String },
    #[error("card {card_id} belongs to set {card_set}, not master set {set_id}")]
    SetMismatch {
        card_id: String,
        card_set: String,
        set_id: String,
    },
    #[error("ownership worker panicked while writing {0}")]
    WorkerPanicked(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Card fields plus the `owned` map, shared by collection and master set entries.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ScopeEntry {
    #[serde(flatten)]
    pub card: Card,
    #[serde(default)]
    pub owned: OwnedMap,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OwnedPatch<'a> {
    owned: &'a OwnedMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct QuantityPatch {
    quantity: u32,
}

/// Applies ownership edits for one user.
pub struct Reconciler<'a, S: ?Sized> {
    store: &'a S,
    user: UserScope,
    classifier: &'a VariantClassifier,
}

impl<'a, S: DocumentStore + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a S, user: UserScope, classifier: &'a VariantClassifier) -> Self {
        Self {
            store,
            user,
            classifier,
        }
    }

    pub fn user(&self) -> &UserScope {
        &self.user
    }

    /// Flip one variant of one card and propagate the change.
    ///
    /// In a collection the other keys of the map are kept as stored. In a
    /// master set the map is rebuilt from the card's current variants, so
    /// keys the classifier no longer derives are dropped, and a snapshot
    /// from another set is rejected. The entry is created from `snapshot`
    /// when absent. Returns the written map.
    pub fn toggle_variant(
        &self,
        scope: &OwnershipScope,
        card_id: &str,
        variant: VariantKey,
        snapshot: &Card,
    ) -> Result<OwnedMap, OwnershipError> {
        if snapshot.id != card_id {
            return Err(OwnershipError::CardMismatch {
                card_id: card_id.to_string(),
                snapshot: snapshot.id.clone(),
            });
        }

        if let OwnershipScope::MasterSet(set_id) = scope {
            let card_set = snapshot.set_id().filter(|id| !id.is_empty());
            if let Some(card_set) = card_set.filter(|id| *id != set_id.as_str()) {
                return Err(OwnershipError::SetMismatch {
                    card_id: card_id.to_string(),
                    card_set: card_set.to_string(),
                    set_id: set_id.clone(),
                });
            }
        }

        let variants = self.classifier.classify(snapshot);
        if !variants.contains(variant) {
            return Err(OwnershipError::VariantNotApplicable {
                card_id: card_id.to_string(),
                variant,
            });
        }

        let path = scope.cards(&self.user).doc(card_id);
        let current = self.read_owned(&path)?;
        let exists = current.is_some();
        let mut owned = current.unwrap_or_default();
        if let OwnershipScope::MasterSet(_) = scope {
            owned = owned.restricted_to(&variants);
        }
        let value = owned.toggle(variant);

        let now = Utc::now();
        self.write_owned(scope, snapshot, &owned, exists, now)?;
        self.sync_index(snapshot, &owned, scope.source_id(), now)?;

        tracing::debug!(%scope, card_id, %variant, owned = value, "toggled variant");

        if let OwnershipScope::MasterSet(set_id) = scope {
            match snapshot.set_total() {
                Some(total) => {
                    self.refresh_summary(set_id, total)?;
                }
                None => tracing::debug!(set_id = %set_id, "set total unknown, summary not refreshed"),
            }
        }

        Ok(owned)
    }

    /// Add `delta` to a collection entry's quantity, flooring at zero.
    ///
    /// Returns the new quantity, or `None` (and writes nothing) when the
    /// entry does not exist.
    pub fn adjust_quantity(
        &self,
        collection_id: &str,
        card_id: &str,
        delta: i64,
    ) -> Result<Option<u32>, OwnershipError> {
        let entries = self
            .store
            .documents::<CollectionCardEntry>(self.user.collection_cards(collection_id));
        let Some(entry) = entries.get(card_id)? else {
            tracing::debug!(collection_id, card_id, "quantity change on missing entry ignored");
            return Ok(None);
        };

        let next = (i64::from(entry.data.quantity()) + delta).clamp(0, i64::from(u32::MAX)) as u32;
        entries.update_fields(card_id, &QuantityPatch { quantity: next })?;
        tracing::debug!(collection_id, card_id, quantity = next, "adjusted quantity");
        Ok(Some(next))
    }

    /// Recount a master set and write its summary.
    ///
    /// `owned` counts entries with at least one owned variant.
    pub fn refresh_summary(&self, set_id: &str, total: u32) -> Result<MasterSetSummary, OwnershipError> {
        let entries = self
            .store
            .list(&self.user.master_set_cards(set_id))?
            .decode_all::<ScopeEntry>();
        let owned = entries.iter().filter(|entry| entry.owned.any_owned()).count() as u32;

        let summary = MasterSetSummary::compute(set_id, owned, total, Utc::now());
        self.store
            .documents::<MasterSetSummary>(self.user.master_set_summaries())
            .save(&summary)?;

        tracing::debug!(set_id, owned, total, completed = summary.completed, "refreshed master set summary");
        Ok(summary)
    }

    /// The stored `owned` map at `path`; `None` when the document is absent.
    fn read_owned(&self, path: &DocPath) -> Result<Option<OwnedMap>, StoreError> {
        let Some(doc) = self.store.get(path)? else {
            return Ok(None);
        };
        match doc.field("owned") {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|err| StoreError::Serde(err.to_string())),
            None => Ok(Some(OwnedMap::new())),
        }
    }

    /// Merge `owned` into the scope's entry for `card`.
    fn write_owned(
        &self,
        scope: &OwnershipScope,
        card: &Card,
        owned: &OwnedMap,
        exists: bool,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let cards = scope.cards(&self.user);
        match (scope, exists) {
            (OwnershipScope::Collection(_), true) => {
                self.store.documents::<CollectionCardEntry>(cards).merge_fields(
                    &card.id,
                    &OwnedPatch {
                        owned,
                        updated_at: None,
                    },
                )?;
            }
            (OwnershipScope::Collection(_), false) => {
                let entry = CollectionCardEntry {
                    card: card.clone(),
                    owned: owned.clone(),
                    quantity: None,
                };
                self.store.documents::<CollectionCardEntry>(cards).merge(&entry)?;
            }
            (OwnershipScope::MasterSet(_), true) => {
                self.store.documents::<MasterSetEntry>(cards).merge_fields(
                    &card.id,
                    &OwnedPatch {
                        owned,
                        updated_at: Some(now),
                    },
                )?;
            }
            (OwnershipScope::MasterSet(_), false) => {
                let entry = MasterSetEntry {
                    card: card.clone(),
                    owned: owned.clone(),
                    updated_at: Some(now),
                };
                self.store.documents::<MasterSetEntry>(cards).merge(&entry)?;
            }
        }
        Ok(())
    }

    /// Fold `written` into the card's index entry and record `source_id`.
    fn sync_index(
        &self,
        card: &Card,
        written: &OwnedMap,
        source_id: &str,
        now: DateTime<Utc>,
    ) -> Result<OwnedCardIndexEntry, StoreError> {
        let mut entry = self
            .read_index(&card.id)?
            .unwrap_or_else(|| OwnedCardIndexEntry::for_card(card));
        entry.refresh_card_fields(card);
        entry.absorb(written, source_id, now);
        self.store
            .documents::<OwnedCardIndexEntry>(self.user.owned_cards())
            .merge(&entry)?;
        Ok(entry)
    }

    /// The card's index entry, with `id` taken from the path when the
    /// stored document lacks it.
    fn read_index(&self, card_id: &str) -> Result<Option<OwnedCardIndexEntry>, StoreError> {
        let index = self
            .store
            .documents::<OwnedCardIndexEntry>(self.user.owned_cards());
        Ok(index.get(card_id)?.map(|record| {
            let mut entry = record.data;
            if entry.id.is_empty() {
                entry.id = card_id.to_string();
            }
            entry
        }))
    }
}
