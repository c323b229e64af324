//! Collections, live entry snapshots and collection statistics.

#[path = "../support/mod.rs"]
mod support;

use std::time::Duration;

use support::{binder, binder_for, energy, in_set, pokemon, set, trainer};
use tcg_binder::card::Supertype;
use tcg_binder::collections::NameOrder;
use tcg_binder::stats::{
    collection_variant_totals, rarity_counts, set_variant_stats, type_counts, VariantStat,
};
use tcg_binder::{
    CollectionCardEntry, CollectionError, DocumentsExt, Error, MasterSetEntry, OwnershipScope,
    ValidationError, VariantKey,
};

#[test]
fn names_are_validated_and_listed_in_order() {
    let binder = binder();
    let collections = binder.collections();

    assert!(matches!(
        collections.create(&"x".repeat(31)),
        Err(CollectionError::Validation(ValidationError::TooLong { len: 31, max: 30 }))
    ));

    let trade = collections.create("trade").unwrap();
    let main = collections.create("Main").unwrap();
    collections.add_card(&main.id, &pokemon("sv1-1", "Pineco", true, false, false)).unwrap();
    collections.add_card(&main.id, &pokemon("sv1-2", "Forretress", true, false, false)).unwrap();
    binder.reconciler().adjust_quantity(&main.id, "sv1-2", -1).unwrap();

    let listed = collections.list_with_counts(NameOrder::Ascending).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].collection, main);
    assert_eq!((listed[0].total_count, listed[0].card_count), (2, 1));
    assert_eq!(listed[1].collection.id, trade.id);

    let descending = collections.list_with_counts(NameOrder::Descending).unwrap();
    assert_eq!(descending[0].collection.name, "trade");

    let err: Error = collections.rename("missing", "Other").unwrap_err().into();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn users_do_not_see_each_others_collections() {
    let red = binder_for("red");
    let blue = binder_for("blue");
    red.collections().create("Red binder").unwrap();
    assert!(blue
        .collections()
        .list_with_counts(NameOrder::Ascending)
        .unwrap()
        .is_empty());
}

#[test]
fn subscription_delivers_snapshots_after_each_change() {
    let binder = binder();
    let collection = binder.collections().create("Live").unwrap();
    let subscription = binder.collections().subscribe_cards(&collection.id).unwrap();

    let initial = subscription.try_next().unwrap();
    assert!(initial.is_empty());

    let card = pokemon("sv3-12", "Pidgey", true, false, true);
    binder.collections().add_card(&collection.id, &card).unwrap();
    let after_add = subscription.next_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(after_add.len(), 1);

    binder
        .reconciler()
        .toggle_variant(&OwnershipScope::collection(&collection.id), &card.id, VariantKey::Normal, &card)
        .unwrap();
    let latest = subscription.latest().unwrap();
    let entries = latest.decode_all::<CollectionCardEntry>();
    assert!(entries[0].owned.get(VariantKey::Normal));
    assert_eq!(entries[0].quantity, Some(1));
}

#[test]
fn cascade_delete_removes_entries() {
    let binder = binder();
    let collections = binder.collections();
    let collection = collections.create("Bulk").unwrap();
    for n in 0..3 {
        collections
            .add_card(&collection.id, &pokemon(&format!("sv1-{}", n), "Bulk", true, false, false))
            .unwrap();
    }
    assert_eq!(collections.delete_cascade(&collection.id).unwrap(), 3);
    assert!(collections.entries(&collection.id).unwrap().is_empty());
    assert!(!collections.delete(&collection.id).unwrap());
}

#[test]
fn type_and_rarity_breakdown() {
    let mut rare = pokemon("sv1-3", "Skeledirge", false, true, false);
    rare.rarity = Some("Rare".into());
    let entries: Vec<CollectionCardEntry> = [
        (rare, 2),
        (trainer("sv1-4", "Nest Ball", &["Item"]), 1),
        (energy("sve-1", "Basic Grass Energy", true), 0),
    ]
    .into_iter()
    .map(|(card, quantity)| CollectionCardEntry {
        quantity: Some(quantity),
        ..CollectionCardEntry::new(card)
    })
    .collect();

    assert_eq!(
        type_counts(&entries),
        vec![(Supertype::Pokemon, 1), (Supertype::Trainer, 1), (Supertype::Energy, 0)]
    );
    let rarities = rarity_counts(&entries);
    assert_eq!(rarities.len(), 2);
    assert_eq!((rarities[0].label.as_str(), rarities[0].symbol), ("Rare", "★"));
    assert_eq!(rarities[1].label, "Unknown");
}

#[test]
fn variant_stats_follow_master_set_ownership() {
    let binder = binder();
    let sv1 = set("sv1", Some(2));
    let cards = vec![
        in_set(pokemon("sv1-1", "Pineco", true, false, true), &sv1),
        in_set(pokemon("sv1-2", "Forretress ex", false, true, false), &sv1),
    ];
    let reconciler = binder.reconciler();
    let scope = OwnershipScope::master_set("sv1");
    reconciler
        .toggle_variant(&scope, &cards[0].id, VariantKey::ReverseHolo, &cards[0])
        .unwrap();

    let entries: Vec<MasterSetEntry> = binder
        .store()
        .documents::<MasterSetEntry>(binder.scope().master_set_cards("sv1"))
        .list()
        .unwrap()
        .into_iter()
        .map(|record| record.data)
        .collect();

    assert_eq!(
        set_variant_stats(&cards, &entries, binder.classifier()),
        vec![
            VariantStat { variant: VariantKey::Normal, owned: 0, total: 1 },
            VariantStat { variant: VariantKey::ReverseHolo, owned: 1, total: 1 },
            VariantStat { variant: VariantKey::Holo, owned: 0, total: 1 },
        ]
    );

    let collection = binder.collections().create("Mine").unwrap();
    binder.collections().add_card(&collection.id, &cards[1]).unwrap();
    reconciler
        .toggle_variant(&OwnershipScope::collection(&collection.id), &cards[1].id, VariantKey::Holo, &cards[1])
        .unwrap();
    let owned = binder.collections().entries(&collection.id).unwrap();
    assert_eq!(collection_variant_totals(&owned), vec![(VariantKey::Holo, 1)]);
}
