//! Ownership edits propagating across collection entries, master sets, the
//! owned card index and set summaries.

#[path = "../support/mod.rs"]
mod support;

use serde_json::json;
use support::{binder, in_set, pokemon, set};
use tcg_binder::store::{to_fields, WriteMode};
use tcg_binder::{
    DocumentStore, DocumentsExt, MasterSetEntry, MasterSetSummary, OwnedCardIndexEntry, OwnedMap, OwnershipError,
    OwnershipScope, VariantKey,
};

fn owned(pairs: &[(VariantKey, bool)]) -> OwnedMap {
    pairs.iter().copied().collect()
}

#[test]
fn toggling_twice_restores_ownership() {
    let binder = binder();
    let card = pokemon("sv3-12", "Pidgey", true, false, true);
    let collection = binder.collections().create("Binder").unwrap();
    binder.collections().add_card(&collection.id, &card).unwrap();

    let scope = OwnershipScope::collection(&collection.id);
    let reconciler = binder.reconciler();

    let first = reconciler
        .toggle_variant(&scope, &card.id, VariantKey::ReverseHolo, &card)
        .unwrap();
    assert!(first.get(VariantKey::ReverseHolo));

    let second = reconciler
        .toggle_variant(&scope, &card.id, VariantKey::ReverseHolo, &card)
        .unwrap();
    assert!(!second.get(VariantKey::ReverseHolo));
    assert!(!second.any_owned());

    let index = binder
        .store()
        .documents::<OwnedCardIndexEntry>(binder.scope().owned_cards())
        .get(&card.id)
        .unwrap()
        .unwrap()
        .data;
    assert!(!index.owned);
    assert!(index.collections.contains(&collection.id));

    // quantity is untouched by toggles
    let entries = binder.collections().entries(&collection.id).unwrap();
    assert_eq!(entries[0].quantity, Some(1));
}

#[test]
fn first_toggle_creates_entry_and_index() {
    let binder = binder();
    let card = pokemon("sv3-125", "Charizard ex", false, true, false);
    let scope = OwnershipScope::collection("favorites");

    let written = binder
        .reconciler()
        .toggle_variant(&scope, &card.id, VariantKey::Holo, &card)
        .unwrap();
    assert_eq!(written, owned(&[(VariantKey::Holo, true)]));

    let entries = binder.collections().entries("favorites").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].card.name, "Charizard ex");
    assert_eq!(entries[0].owned, owned(&[(VariantKey::Holo, true)]));

    let index = binder
        .store()
        .documents::<OwnedCardIndexEntry>(binder.scope().owned_cards())
        .get(&card.id)
        .unwrap()
        .unwrap()
        .data;
    assert!(index.owned);
    assert_eq!(index.variants, owned(&[(VariantKey::Holo, true)]));
    assert_eq!(index.name, "Charizard ex");
    assert_eq!(index.collections.iter().collect::<Vec<_>>(), vec!["favorites"]);
}

#[test]
fn toggle_rejects_variants_the_card_lacks() {
    let binder = binder();
    let card = pokemon("sv3-1", "Oddish", true, false, true);
    let scope = OwnershipScope::collection("c1");
    let reconciler = binder.reconciler();

    assert_eq!(
        reconciler.toggle_variant(&scope, &card.id, VariantKey::Holo, &card),
        Err(OwnershipError::VariantNotApplicable {
            card_id: "sv3-1".into(),
            variant: VariantKey::Holo,
        })
    );
    assert!(matches!(
        reconciler.toggle_variant(&scope, "sv3-2", VariantKey::Normal, &card),
        Err(OwnershipError::CardMismatch { .. })
    ));
    assert!(binder.store().is_empty());
}

#[test]
fn summary_completes_and_reopens() {
    let binder = binder();
    let obf = set("sv3", Some(150));
    let scope = OwnershipScope::master_set("sv3");
    let entries = binder
        .store()
        .documents::<MasterSetEntry>(binder.scope().master_set_cards("sv3"));

    for n in 1..150 {
        let card = in_set(pokemon(&format!("sv3-{}", n), "Filler", true, false, false), &obf);
        entries
            .save(&MasterSetEntry {
                card,
                owned: owned(&[(VariantKey::Normal, true)]),
                updated_at: None,
            })
            .unwrap();
    }

    let last = in_set(pokemon("sv3-150", "Lechonk", true, false, false), &obf);
    let reconciler = binder.reconciler();
    reconciler
        .toggle_variant(&scope, &last.id, VariantKey::Normal, &last)
        .unwrap();

    let summaries = binder
        .store()
        .documents::<MasterSetSummary>(binder.scope().master_set_summaries());
    let summary = summaries.get("sv3").unwrap().unwrap().data;
    assert_eq!((summary.owned, summary.total, summary.completed), (150, 150, true));
    assert_eq!(binder.dashboard().unwrap().master_sets_completed, 1);

    reconciler
        .toggle_variant(&scope, &last.id, VariantKey::Normal, &last)
        .unwrap();
    let summary = summaries.get("sv3").unwrap().unwrap().data;
    assert_eq!((summary.owned, summary.completed), (149, false));
}

#[test]
fn master_set_toggle_drops_stale_keys() {
    let binder = binder();
    let card = in_set(pokemon("sv1-5", "Sprigatito", true, false, true), &set("sv1", None));
    let entries = binder
        .store()
        .documents::<MasterSetEntry>(binder.scope().master_set_cards("sv1"));
    entries
        .save(&MasterSetEntry {
            card: card.clone(),
            owned: owned(&[(VariantKey::Holo, true), (VariantKey::Normal, true)]),
            updated_at: None,
        })
        .unwrap();

    let written = binder
        .reconciler()
        .toggle_variant(&OwnershipScope::master_set("sv1"), &card.id, VariantKey::ReverseHolo, &card)
        .unwrap();
    assert_eq!(
        written,
        owned(&[(VariantKey::Normal, true), (VariantKey::ReverseHolo, true)])
    );

    let stored = entries.get(&card.id).unwrap().unwrap().data;
    assert_eq!(stored.owned, written);
    assert!(stored.updated_at.is_some());
    // no set total, so no summary
    assert!(binder
        .store()
        .documents::<MasterSetSummary>(binder.scope().master_set_summaries())
        .get("sv1")
        .unwrap()
        .is_none());
}

#[test]
fn quantity_floors_at_zero_and_ignores_missing_entries() {
    let binder = binder();
    let card = pokemon("sv2-79", "Comfey", true, false, true);
    let collection = binder.collections().create("Trade binder").unwrap();
    binder.collections().add_card(&collection.id, &card).unwrap();

    let reconciler = binder.reconciler();
    assert_eq!(reconciler.adjust_quantity(&collection.id, &card.id, 3).unwrap(), Some(4));
    assert_eq!(reconciler.adjust_quantity(&collection.id, &card.id, -10).unwrap(), Some(0));
    assert_eq!(reconciler.adjust_quantity(&collection.id, "sv2-80", 1).unwrap(), None);
    assert_eq!(binder.collections().entries(&collection.id).unwrap().len(), 1);
}

#[test]
fn backfill_unions_collections_into_index_and_master_sets() {
    let binder = binder();
    let pal = set("sv2", Some(2));
    let comfey = in_set(pokemon("sv2-79", "Comfey", true, false, true), &pal);
    let iono = in_set(pokemon("sv2-185", "Iono", true, false, false), &pal);

    let collections = binder.collections();
    let main = collections.create("Main").unwrap();
    let trade = collections.create("Trade").unwrap();
    collections.add_card(&main.id, &comfey).unwrap();
    collections.add_card(&trade.id, &comfey).unwrap();
    collections.add_card(&trade.id, &iono).unwrap();

    let reconciler = binder.reconciler();
    reconciler
        .toggle_variant(&OwnershipScope::collection(&main.id), &comfey.id, VariantKey::Normal, &comfey)
        .unwrap();
    reconciler
        .toggle_variant(&OwnershipScope::collection(&trade.id), &comfey.id, VariantKey::ReverseHolo, &comfey)
        .unwrap();

    let report = reconciler.backfill().unwrap();
    assert_eq!((report.collections, report.cards, report.sets), (2, 3, 1));

    let index = binder
        .store()
        .documents::<OwnedCardIndexEntry>(binder.scope().owned_cards());
    let comfey_index = index.get(&comfey.id).unwrap().unwrap().data;
    assert!(comfey_index.collections.contains(&main.id));
    assert!(comfey_index.collections.contains(&trade.id));
    assert!(comfey_index.variants.get(VariantKey::Normal));
    assert!(comfey_index.variants.get(VariantKey::ReverseHolo));

    let iono_index = index.get(&iono.id).unwrap().unwrap().data;
    assert!(!iono_index.owned);

    let master = binder
        .store()
        .documents::<MasterSetEntry>(binder.scope().master_set_cards("sv2"))
        .get(&comfey.id)
        .unwrap()
        .unwrap()
        .data;
    assert!(master.owned.get(VariantKey::Normal));
    assert!(master.owned.get(VariantKey::ReverseHolo));

    let summary = binder
        .store()
        .documents::<MasterSetSummary>(binder.scope().master_set_summaries())
        .get("sv2")
        .unwrap()
        .unwrap()
        .data;
    assert_eq!((summary.owned, summary.total, summary.completed), (1, 2, false));
}

#[test]
fn backfill_files_setless_cards_under_unknown() {
    let binder = binder();
    let promo = pokemon("promo-1", "Pikachu", true, false, false);
    let collection = binder.collections().create("Promos").unwrap();
    binder.collections().add_card(&collection.id, &promo).unwrap();

    let report = binder.reconciler().backfill().unwrap();
    assert_eq!(report.sets, 1);
    let mirrored = binder
        .store()
        .documents::<MasterSetEntry>(binder.scope().master_set_cards(tcg_binder::ownership::UNKNOWN_SET))
        .get(&promo.id)
        .unwrap();
    assert!(mirrored.is_some());
}

#[test]
fn recalculate_drops_stale_keys_from_entries_and_index() {
    let binder = binder();
    let card = in_set(pokemon("sv4-10", "Tarountula", true, false, true), &set("sv4", Some(1)));
    let user = binder.scope();
    binder
        .store()
        .documents::<MasterSetEntry>(user.master_set_cards("sv4"))
        .save(&MasterSetEntry {
            card: card.clone(),
            owned: owned(&[(VariantKey::Holo, true), (VariantKey::Normal, false)]),
            updated_at: None,
        })
        .unwrap();
    let mut index_entry = OwnedCardIndexEntry::for_card(&card);
    index_entry.variants = owned(&[(VariantKey::Holo, true)]);
    index_entry.owned = true;
    binder
        .store()
        .documents::<OwnedCardIndexEntry>(user.owned_cards())
        .save(&index_entry)
        .unwrap();

    let scope = OwnershipScope::master_set("sv4");
    assert_eq!(binder.reconciler().recalculate(&scope).unwrap(), 1);

    let entry = binder
        .store()
        .documents::<MasterSetEntry>(user.master_set_cards("sv4"))
        .get(&card.id)
        .unwrap()
        .unwrap()
        .data;
    assert_eq!(
        entry.owned,
        owned(&[(VariantKey::Normal, false), (VariantKey::ReverseHolo, false)])
    );

    let index = binder
        .store()
        .documents::<OwnedCardIndexEntry>(user.owned_cards())
        .get(&card.id)
        .unwrap()
        .unwrap()
        .data;
    assert!(index.variants.is_empty());
    assert!(!index.owned);

    // second pass finds nothing to change
    assert_eq!(binder.reconciler().recalculate(&scope).unwrap(), 0);
}

#[test]
fn mark_all_sets_every_variant_and_completes_the_set() {
    let binder = binder();
    let mini = set("mini", Some(2));
    let entries = binder
        .store()
        .documents::<MasterSetEntry>(binder.scope().master_set_cards("mini"));
    for card in [
        in_set(pokemon("mini-1", "Bulbasaur", true, false, true), &mini),
        in_set(pokemon("mini-2", "Ivysaur", false, true, true), &mini),
    ] {
        entries
            .save(&MasterSetEntry {
                card,
                owned: OwnedMap::new(),
                updated_at: None,
            })
            .unwrap();
    }

    let scope = OwnershipScope::master_set("mini");
    let reconciler = binder.reconciler();
    assert_eq!(reconciler.mark_all(&scope, true).unwrap(), 2);

    let ivysaur = entries.get("mini-2").unwrap().unwrap().data;
    assert_eq!(
        ivysaur.owned,
        owned(&[(VariantKey::ReverseHolo, true), (VariantKey::Holo, true)])
    );
    let summary = binder
        .store()
        .documents::<MasterSetSummary>(binder.scope().master_set_summaries())
        .get("mini")
        .unwrap()
        .unwrap()
        .data;
    assert!(summary.completed);

    reconciler.mark_all(&scope, false).unwrap();
    let index = binder
        .store()
        .documents::<OwnedCardIndexEntry>(binder.scope().owned_cards())
        .get("mini-1")
        .unwrap()
        .unwrap()
        .data;
    assert!(!index.owned);
}

#[test]
fn index_entries_without_id_are_adopted() {
    let binder = binder();
    let card = pokemon("sv1-4", "Charmander", false, true, true);
    let path = binder.scope().owned_cards().doc(&card.id);
    let legacy = json!({
        "owned": true,
        "variants": { "holo": true },
        "collections": ["c1"],
    });
    binder
        .store()
        .set(&path, to_fields(&legacy).unwrap(), WriteMode::Replace)
        .unwrap();

    let written = binder
        .reconciler()
        .toggle_variant(&OwnershipScope::collection("c2"), &card.id, VariantKey::ReverseHolo, &card)
        .unwrap();
    assert!(written.get(VariantKey::ReverseHolo));

    let index = binder
        .store()
        .documents::<OwnedCardIndexEntry>(binder.scope().owned_cards())
        .get(&card.id)
        .unwrap()
        .unwrap()
        .data;
    assert_eq!(index.id, "sv1-4");
    assert_eq!(index.name, "Charmander");
    assert_eq!(
        index.variants,
        owned(&[(VariantKey::Holo, true), (VariantKey::ReverseHolo, true)])
    );
    assert_eq!(index.collections.len(), 2);

    // repair passes read the same document
    let scope = OwnershipScope::collection("c2");
    binder.reconciler().recalculate(&scope).unwrap();
}

#[test]
fn null_owned_maps_decode_as_empty() {
    let binder = binder();
    let card = pokemon("sv1-7", "Charmeleon", false, true, false);
    let entries = binder.scope().collection_cards("c1");
    let mut fields = to_fields(&card).unwrap();
    fields.insert("owned".into(), serde_json::Value::Null);
    fields.insert("quantity".into(), json!(1));
    binder
        .store()
        .set(&entries.doc(&card.id), fields, WriteMode::Replace)
        .unwrap();

    let written = binder
        .reconciler()
        .toggle_variant(&OwnershipScope::collection("c1"), &card.id, VariantKey::Holo, &card)
        .unwrap();
    assert_eq!(written, owned(&[(VariantKey::Holo, true)]));

    let stored = binder.collections().entries("c1").unwrap();
    assert_eq!(stored[0].owned, written);
    assert_eq!(stored[0].quantity, Some(1));
}

#[test]
fn master_set_toggle_rejects_cards_of_other_sets() {
    let binder = binder();
    let card = in_set(pokemon("sv2-4", "Tarountula", true, false, false), &set("sv2", Some(279)));
    let err = binder
        .reconciler()
        .toggle_variant(&OwnershipScope::master_set("sv1"), &card.id, VariantKey::Normal, &card)
        .unwrap_err();
    assert!(matches!(err, OwnershipError::SetMismatch { .. }));
    assert!(binder.store().is_empty());
}
