//! Deck building limits, persistence and export.

#[path = "../support/mod.rs"]
mod support;

use support::{binder, energy, in_set, pokemon, set, trainer};
use tcg_binder::deck::{export_event_text, export_file_name, export_text, PlayerInfo};
use tcg_binder::{Deck, DeckError, DeckViolation, Error, ValidationError};

#[test]
fn fifth_copy_is_denied_across_printings() {
    let mut deck = Deck::new("d1", "Ralts");
    let first = pokemon("sv1-84", "Ralts", true, false, true);
    let second = pokemon("sv4-60", "Ralts", true, false, true);

    deck.add_card(&first).unwrap();
    deck.add_card(&first).unwrap();
    deck.add_card(&second).unwrap();
    assert_eq!(deck.add_card(&second), Ok(2));

    assert_eq!(
        deck.add_card(&first),
        Err(DeckViolation::CopyLimit { name: "Ralts".into(), limit: 4 })
    );
    assert_eq!(deck.copies_of("Ralts"), 4);
    assert_eq!(deck.cards.len(), 2);
}

#[test]
fn basic_energy_is_unlimited_but_special_energy_is_not() {
    let mut deck = Deck::new("d1", "Energy test");
    let psychic = energy("sve-5", "Basic Psychic Energy", true);
    for _ in 0..12 {
        deck.add_card(&psychic).unwrap();
    }
    assert_eq!(deck.total_cards(), 12);

    let jet = energy("sv2-190", "Jet Energy", false);
    for _ in 0..4 {
        deck.add_card(&jet).unwrap();
    }
    assert_eq!(
        deck.add_card(&jet),
        Err(DeckViolation::SpecialEnergyLimit { name: "Jet Energy".into(), limit: 4 })
    );
}

#[test]
fn second_ace_spec_is_denied() {
    let mut deck = Deck::new("d1", "Ace");
    deck.add_card(&trainer("sv5-154", "Prime Catcher", &["Item", "ACE SPEC"]))
        .unwrap();

    let err = deck
        .add_card(&trainer("sv4-163", "Master Ball", &["Item", "ACE SPEC"]))
        .unwrap_err();
    assert_eq!(err, DeckViolation::AceSpecLimit { limit: 1 });
    assert_eq!(err.to_string(), "only 1 ACE SPEC card allowed");

    let converted: Error = err.into();
    assert!(matches!(converted, Error::Deck(_)));
}

#[test]
fn removing_last_copy_drops_the_stack() {
    let mut deck = Deck::new("d1", "Iono");
    let iono = trainer("sv2-185", "Iono", &["Supporter"]);
    deck.add_card(&iono).unwrap();
    deck.add_card(&iono).unwrap();

    assert_eq!(deck.remove_card(&iono.id), Some(1));
    assert_eq!(deck.remove_card(&iono.id), Some(0));
    assert!(deck.cards.is_empty());
    assert_eq!(deck.remove_card(&iono.id), None);
}

#[test]
fn decks_round_trip_through_the_store() {
    let binder = binder();
    let decks = binder.decks();

    assert!(matches!(
        decks.create("  "),
        Err(DeckError::Validation(ValidationError::Empty))
    ));

    let mut deck = decks.create(" Lost Box ").unwrap();
    assert_eq!(deck.name, "Lost Box");
    deck.add_card(&pokemon("sv2-79", "Comfey", true, false, true)).unwrap();
    decks.save_cards(&deck.id, &deck.cards).unwrap();
    decks.rename(&deck.id, "Lost Zone Box").unwrap();

    let stored = decks.get(&deck.id).unwrap().unwrap();
    assert_eq!(stored.name, "Lost Zone Box");
    assert_eq!(stored.total_cards(), 1);
    assert_eq!(binder.dashboard().unwrap().decks, 1);

    assert!(matches!(
        decks.save_cards("missing", &deck.cards),
        Err(DeckError::NotFound(_))
    ));

    assert!(decks.delete(&deck.id).unwrap());
    assert!(decks.list().unwrap().is_empty());
}

#[test]
fn export_groups_by_category() {
    let pal = set("sv2", None);
    let mut deck = Deck::new("d1", "Lost Box");
    let comfey = in_set(pokemon("sv2-79", "Comfey", true, false, true), &pal);
    let mut iono = in_set(trainer("sv2-185", "Iono", &["Supporter"]), &pal);
    iono.number = "185".into();
    deck.add_card(&comfey).unwrap();
    deck.add_card(&comfey).unwrap();
    deck.add_card(&iono).unwrap();

    assert_eq!(
        export_text(&deck),
        "Deck: Lost Box\n\nPokémon (2)\n2x Comfey (sv2 #79)\n\nTrainer (1)\n1x Iono (sv2 #185)\n"
    );

    let player = PlayerInfo {
        name: "Ash".into(),
        dob: "1997-04-01".into(),
        player_id: "123456".into(),
        event_name: "League Cup".into(),
        event_date: "2026-11-01".into(),
    };
    let event = export_event_text(&deck, &player);
    assert!(event.starts_with(
        "Player Name: Ash\nDOB: 1997-04-01\nPlayer ID: 123456\nEvent: League Cup\nDate: 2026-11-01\nDeck: Lost Box\n"
    ));
    assert_eq!(export_file_name(&deck), "Lost Box.txt");
}
