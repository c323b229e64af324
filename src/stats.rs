//! Collection statistics for dashboards and set pages.

use crate::card::{Card, Supertype};
use crate::records::{CollectionCardEntry, MasterSetEntry, MasterSetSummary};
use crate::session::UserScope;
use crate::store::{DocumentStore, DocumentsExt, StoreError};
use crate::variant::{VariantClassifier, VariantKey};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardTotals {
    /// Entries in the personal collection.
    pub cards_owned: usize,
    pub decks: usize,
    pub master_sets_completed: usize,
}

/// Count the user's personal collection entries, decks and completed
/// master sets.
pub fn dashboard_totals<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserScope,
) -> Result<DashboardTotals, StoreError> {
    let cards_owned = store.list(&user.personal_collection())?.len();
    let decks = store.list(&user.decks())?.len();
    let master_sets_completed = store
        .documents::<MasterSetSummary>(user.master_set_summaries())
        .find(&|summary: &MasterSetSummary| summary.completed)?
        .len();

    tracing::debug!(cards_owned, decks, master_sets_completed, "computed dashboard totals");
    Ok(DashboardTotals {
        cards_owned,
        decks,
        master_sets_completed,
    })
}

/// Entries with a positive quantity per supertype, in Pokémon, Trainer,
/// Energy order. All three are always present.
pub fn type_counts(entries: &[CollectionCardEntry]) -> Vec<(Supertype, usize)> {
    Supertype::ALL
        .into_iter()
        .map(|supertype| {
            let count = entries
                .iter()
                .filter(|entry| entry.quantity() > 0 && entry.card.supertype() == Some(supertype))
                .count();
            (supertype, count)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RarityCount {
    pub label: String,
    pub symbol: &'static str,
    pub count: usize,
}

/// Display symbol for a rarity.
pub fn rarity_symbol(rarity: &str) -> &'static str {
    match rarity {
        "Common" => "●",
        "Uncommon" => "◆",
        "Rare" => "★",
        "Double Rare" => "★★",
        "Ultra Rare" => "☆☆",
        "Illustration Rare" => "★",
        "Special Illustration Rare" => "★★",
        "Hyper Rare" => "★",
        _ => "•",
    }
}

/// Entries with a positive quantity per rarity, in first-seen order.
/// Cards without a rarity count as "Unknown".
pub fn rarity_counts(entries: &[CollectionCardEntry]) -> Vec<RarityCount> {
    let mut counts: Vec<RarityCount> = Vec::new();
    for entry in entries.iter().filter(|entry| entry.quantity() > 0) {
        let label = entry.card.rarity.as_deref().unwrap_or("Unknown");
        match counts.iter_mut().find(|count| count.label == label) {
            Some(count) => count.count += 1,
            None => counts.push(RarityCount {
                label: label.to_string(),
                symbol: rarity_symbol(label),
                count: 1,
            }),
        }
    }
    counts
}

/// Owned and available counts of one variant across a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantStat {
    pub variant: VariantKey,
    /// Master set entries with the variant marked owned.
    pub owned: usize,
    /// Cards of the set the variant exists for.
    pub total: usize,
}

/// Per-variant completion of a set. Variants no card of the set has are
/// left out.
pub fn set_variant_stats(
    cards: &[Card],
    entries: &[MasterSetEntry],
    classifier: &VariantClassifier,
) -> Vec<VariantStat> {
    let classified: Vec<_> = cards.iter().map(|card| classifier.classify(card)).collect();
    VariantKey::ALL
        .into_iter()
        .filter_map(|variant| {
            let total = classified.iter().filter(|set| set.contains(variant)).count();
            if total == 0 {
                return None;
            }
            let owned = entries.iter().filter(|entry| entry.owned.get(variant)).count();
            Some(VariantStat {
                variant,
                owned,
                total,
            })
        })
        .collect()
}

/// Number of entries owning each variant; variants nobody owns are left out.
pub fn collection_variant_totals(entries: &[CollectionCardEntry]) -> Vec<(VariantKey, usize)> {
    VariantKey::ALL
        .into_iter()
        .map(|variant| {
            let count = entries.iter().filter(|entry| entry.owned.get(variant)).count();
            (variant, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// One row per owned variant of each entry, restricted to the variants the
/// card currently has.
pub fn owned_variant_listing<'e>(
    entries: &'e [CollectionCardEntry],
    classifier: &VariantClassifier,
) -> Vec<(&'e Card, VariantKey)> {
    entries
        .iter()
        .flat_map(|entry| {
            classifier
                .classify(&entry.card)
                .iter()
                .filter(|variant| entry.owned.get(*variant))
                .map(|variant| (&entry.card, variant))
                .collect::<Vec<_>>()
        })
        .collect()
}
