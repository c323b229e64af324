use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::card::{Card, PriceKind, ACE_SPEC};
use crate::store::{CollectionPath, DocumentStore, StoreError};

use super::{VariantKey, VariantSet};

/// Global collection holding pattern-variant membership, one document per
/// pattern variant key: `cardVariants/{pokeBallPattern|masterBallPattern}`.
pub const PATTERN_COLLECTION: &str = "cardVariants";

/// Card ids printed with a cosmetic pattern finish.
///
/// Membership cannot be derived from catalog fields, so it is maintained as
/// data in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternMembership {
    poke_ball: BTreeSet<String>,
    master_ball: BTreeSet<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PatternDocument {
    #[serde(default)]
    ids: Vec<String>,
}

impl PatternMembership {
    pub fn new<P, M>(poke_ball: P, master_ball: M) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            poke_ball: poke_ball.into_iter().map(Into::into).collect(),
            master_ball: master_ball.into_iter().map(Into::into).collect(),
        }
    }

    /// Load membership lists from the store. Missing documents mean no members.
    pub fn load<S: DocumentStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let collection = CollectionPath::root(PATTERN_COLLECTION);
        let mut membership = Self::default();

        for key in [VariantKey::PokeBallPattern, VariantKey::MasterBallPattern] {
            let Some(doc) = store.get(&collection.doc(key.as_str()))? else {
                continue;
            };
            let ids: BTreeSet<String> = doc.decode::<PatternDocument>()?.ids.into_iter().collect();
            match key {
                VariantKey::PokeBallPattern => membership.poke_ball = ids,
                _ => membership.master_ball = ids,
            }
        }

        tracing::debug!(
            poke_ball = membership.poke_ball.len(),
            master_ball = membership.master_ball.len(),
            "loaded pattern membership"
        );
        Ok(membership)
    }

    pub fn has(&self, key: VariantKey, card_id: &str) -> bool {
        match key {
            VariantKey::PokeBallPattern => self.poke_ball.contains(card_id),
            VariantKey::MasterBallPattern => self.master_ball.contains(card_id),
            _ => false,
        }
    }
}

/// Derives the ownable variants of a card from its catalog metadata.
#[derive(Debug, Clone, Default)]
pub struct VariantClassifier {
    patterns: PatternMembership,
}

impl VariantClassifier {
    pub fn new(patterns: PatternMembership) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &PatternMembership {
        &self.patterns
    }

    /// Every variant `card` can be owned in. May be empty.
    pub fn classify(&self, card: &Card) -> VariantSet {
        let rarity = card.rarity();
        let ace_spec = card.has_subtype(ACE_SPEC);
        let mut variants = VariantSet::new();

        if card.has_price(PriceKind::Normal) {
            variants.insert(VariantKey::Normal);
        }
        if card.has_price(PriceKind::ReverseHolofoil) {
            variants.insert(VariantKey::ReverseHolo);
        }
        // Special rarities and ACE SPEC cards never get a separate holo variant.
        if card.has_price(PriceKind::Holofoil) && !VariantKey::is_special_rarity(rarity) && !ace_spec {
            variants.insert(VariantKey::Holo);
        }
        if ace_spec {
            variants.insert(VariantKey::AceSpec);
        }
        for (key, name) in VariantKey::RARITIES {
            if rarity == name {
                variants.insert(key);
            }
        }
        for key in [VariantKey::PokeBallPattern, VariantKey::MasterBallPattern] {
            if self.patterns.has(key, &card.id) {
                variants.insert(key);
            }
        }

        variants
    }
}
