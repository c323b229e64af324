use std::collections::BTreeMap;
use std::thread;

use chrono::{DateTime, Utc};

use crate::card::Card;
use crate::records::OwnedCardIndexEntry;
use crate::store::{DocumentStore, DocumentsExt, StoreError};
use crate::variant::{OwnedMap, VariantSet};

use super::{OwnershipError, OwnershipScope, Reconciler, ScopeEntry, UNKNOWN_SET};

/// Counts from a [`Reconciler::backfill`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub collections: usize,
    pub cards: usize,
    /// Distinct master sets that received entries.
    pub sets: usize,
}

impl<'a, S: DocumentStore + ?Sized> Reconciler<'a, S> {
    /// Set every classified variant of every entry in `scope` to `owned`.
    ///
    /// One write per card, issued concurrently. Returns the number of cards
    /// written. The first failure is returned after all writes finish.
    pub fn mark_all(&self, scope: &OwnershipScope, owned: bool) -> Result<usize, OwnershipError> {
        let span = tracing::info_span!("mark_all", %scope, owned);
        let _enter = span.enter();

        let entries = self.load_entries(scope)?;
        let now = Utc::now();
        let written = self.fan_out(&entries, |entry| {
            let map = OwnedMap::uniform(&self.classifier.classify(&entry.card), owned);
            self.write_owned(scope, &entry.card, &map, true, now)?;
            self.sync_index(&entry.card, &map, scope.source_id(), now)?;
            Ok(true)
        })?;
        self.refresh_scope_summary(scope, &entries)?;

        tracing::info!(cards = written, "marked all variants");
        Ok(written)
    }

    /// Rebuild every entry's `owned` map in `scope` from the current
    /// classification, carrying forward values and dropping stale keys. The
    /// index entry of each card loses the same stale keys.
    ///
    /// Returns the number of cards whose entry or index entry changed.
    pub fn recalculate(&self, scope: &OwnershipScope) -> Result<usize, OwnershipError> {
        let span = tracing::info_span!("recalculate", %scope);
        let _enter = span.enter();

        let entries = self.load_entries(scope)?;
        let now = Utc::now();
        let changed = self.fan_out(&entries, |entry| {
            let variants = self.classifier.classify(&entry.card);
            let rebuilt = entry.owned.restricted_to(&variants);
            let entry_changed = rebuilt != entry.owned;
            if entry_changed {
                self.write_owned(scope, &entry.card, &rebuilt, true, now)?;
            }
            let index_changed = self.repair_index(&entry.card, &variants, now)?;
            Ok(entry_changed || index_changed)
        })?;
        self.refresh_scope_summary(scope, &entries)?;

        tracing::info!(cards = entries.len(), changed, "recalculated ownership");
        Ok(changed)
    }

    /// Mirror every collection entry into the Owned Card Index and into the
    /// master set of the card's set.
    ///
    /// Index entries gain the collection id (existing ids are kept). Master
    /// set maps are overlaid, not replaced. Summaries are refreshed for
    /// every touched set whose total is known.
    pub fn backfill(&self) -> Result<BackfillReport, OwnershipError> {
        let span = tracing::info_span!("backfill", uid = self.user.uid());
        let _enter = span.enter();

        let mut report = BackfillReport::default();
        let mut set_totals: BTreeMap<String, Option<u32>> = BTreeMap::new();
        let now = Utc::now();

        let collections = self.store.list(&self.user.collections())?;
        for collection in collections.iter() {
            let collection_id = collection.id();
            let entries = self
                .store
                .list(&self.user.collection_cards(collection_id))?
                .decode_all::<ScopeEntry>();

            for entry in &entries {
                self.sync_index(&entry.card, &entry.owned, collection_id, now)?;

                let set_id = entry
                    .card
                    .set_id()
                    .filter(|id| !id.is_empty())
                    .unwrap_or(UNKNOWN_SET);
                self.mirror_to_master_set(set_id, entry, now)?;

                let total = set_totals.entry(set_id.to_string()).or_insert(None);
                if total.is_none() {
                    *total = entry.card.set_total();
                }
                report.cards += 1;
            }
            report.collections += 1;
            tracing::debug!(collection_id, cards = entries.len(), "backfilled collection");
        }

        for (set_id, total) in &set_totals {
            if let Some(total) = total {
                self.refresh_summary(set_id, *total)?;
            }
        }
        report.sets = set_totals.len();

        tracing::info!(
            collections = report.collections,
            cards = report.cards,
            sets = report.sets,
            "backfill complete"
        );
        Ok(report)
    }

    fn load_entries(&self, scope: &OwnershipScope) -> Result<Vec<ScopeEntry>, StoreError> {
        Ok(self
            .store
            .list(&scope.cards(&self.user))?
            .decode_all::<ScopeEntry>())
    }

    /// Run `write` for every entry on its own scoped thread.
    ///
    /// Returns how many calls reported a change, or the first error.
    fn fan_out<F>(&self, entries: &[ScopeEntry], write: F) -> Result<usize, OwnershipError>
    where
        F: Fn(&ScopeEntry) -> Result<bool, OwnershipError> + Sync,
    {
        let write = &write;
        thread::scope(|s| {
            let handles: Vec<_> = entries
                .iter()
                .map(|entry| (entry.card.id.as_str(), s.spawn(move || write(entry))))
                .collect();

            let mut changed = 0;
            let mut first_error = None;
            for (card_id, handle) in handles {
                match handle.join() {
                    Ok(Ok(true)) => changed += 1,
                    Ok(Ok(false)) => {}
                    Ok(Err(err)) => {
                        tracing::warn!(card_id, error = %err, "ownership write failed");
                        first_error.get_or_insert(err);
                    }
                    Err(_) => {
                        first_error.get_or_insert(OwnershipError::WorkerPanicked(card_id.to_string()));
                    }
                }
            }

            match first_error {
                Some(err) => Err(err),
                None => Ok(changed),
            }
        })
    }

    /// Drop index keys the card no longer has. Returns true if the index changed.
    fn repair_index(
        &self,
        card: &Card,
        variants: &VariantSet,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let Some(mut entry) = self.read_index(&card.id)? else {
            return Ok(false);
        };

        let was_owned = entry.owned;
        let dropped = entry.variants.retain_variants(variants);
        entry.owned = entry.variants.any_owned();
        if !dropped && entry.owned == was_owned {
            return Ok(false);
        }

        entry.updated_at = Some(now);
        self.store
            .documents::<OwnedCardIndexEntry>(self.user.owned_cards())
            .merge(&entry)?;
        Ok(true)
    }

    fn mirror_to_master_set(
        &self,
        set_id: &str,
        entry: &ScopeEntry,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let scope = OwnershipScope::master_set(set_id);
        let path = scope.cards(&self.user).doc(&entry.card.id);
        let current = self.read_owned(&path)?;
        let exists = current.is_some();
        let mut merged = current.unwrap_or_default();
        merged.overlay(&entry.owned);
        self.write_owned(&scope, &entry.card, &merged, exists, now)
    }

    fn refresh_scope_summary(
        &self,
        scope: &OwnershipScope,
        entries: &[ScopeEntry],
    ) -> Result<(), OwnershipError> {
        if let OwnershipScope::MasterSet(set_id) = scope {
            if let Some(total) = entries.iter().find_map(|entry| entry.card.set_total()) {
                self.refresh_summary(set_id, total)?;
            }
        }
        Ok(())
    }
}
