//! Typed ownership records stored per user.
//!
//! Each record has a fixed field set and serializes to the camelCase
//! document shape. Entries that embed catalog data flatten the [`Card`]
//! into the document, so an entry reads like the card plus its ownership
//! fields.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{Card, CardImages};
use crate::variant::OwnedMap;
use crate::Document;

/// A user-named grouping of cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "collections")]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Document id. Older documents do not store it.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One card's ownership state inside one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "cards", id = "card.id")]
pub struct CollectionCardEntry {
    #[serde(flatten)]
    pub card: Card,
    #[serde(default)]
    pub owned: OwnedMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl CollectionCardEntry {
    pub fn new(card: Card) -> Self {
        Self {
            card,
            owned: OwnedMap::new(),
            quantity: None,
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity.unwrap_or(0)
    }
}

/// One card's ownership state inside a master set checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "cards", id = "card.id")]
#[serde(rename_all = "camelCase")]
pub struct MasterSetEntry {
    #[serde(flatten)]
    pub card: Card,
    #[serde(default)]
    pub owned: OwnedMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Cross-reference of a card's ownership across every collection and
/// master set it appears in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "ownedCards")]
#[serde(rename_all = "camelCase")]
pub struct OwnedCardIndexEntry {
    /// Card id. Entries written by older clients do not store it; the
    /// reconciler fills it in from the path.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<CardImages>,
    #[serde(default)]
    pub supertype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    /// True iff any value in `variants` is true.
    #[serde(default)]
    pub owned: bool,
    #[serde(default)]
    pub variants: OwnedMap,
    /// Ids of the collections and master sets that contributed ownership.
    #[serde(default)]
    pub collections: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OwnedCardIndexEntry {
    /// Empty index entry seeded with the card's display fields.
    pub fn for_card(card: &Card) -> Self {
        Self {
            id: card.id.clone(),
            name: card.name.clone(),
            images: card.images.clone(),
            supertype: card.supertype.clone(),
            rarity: card.rarity.clone(),
            owned: false,
            variants: OwnedMap::new(),
            collections: BTreeSet::new(),
            updated_at: None,
        }
    }

    /// Overlay `written` onto `variants`, record `source_id` and recompute `owned`.
    pub fn absorb(&mut self, written: &OwnedMap, source_id: &str, now: DateTime<Utc>) {
        self.variants.overlay(written);
        self.collections.insert(source_id.to_string());
        self.owned = self.variants.any_owned();
        self.updated_at = Some(now);
    }

    /// Refresh the display fields from a newer catalog snapshot.
    pub fn refresh_card_fields(&mut self, card: &Card) {
        self.name = card.name.clone();
        self.images = card.images.clone();
        self.supertype = card.supertype.clone();
        self.rarity = card.rarity.clone();
    }
}

/// Completion aggregate for one set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "masterSetSummaries", id = "set_id")]
#[serde(rename_all = "camelCase")]
pub struct MasterSetSummary {
    pub set_id: String,
    pub owned: u32,
    pub total: u32,
    /// True iff `owned == total`.
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MasterSetSummary {
    pub fn compute(set_id: impl Into<String>, owned: u32, total: u32, now: DateTime<Utc>) -> Self {
        Self {
            set_id: set_id.into(),
            owned,
            total,
            completed: owned == total,
            updated_at: Some(now),
        }
    }
}
