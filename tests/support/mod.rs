//! Card fixtures and a signed-in binder over the in-memory store.

#![allow(dead_code)]

use tcg_binder::card::{PricePoint, Prices, TcgPlayer};
use tcg_binder::{Binder, Card, CardSet, Config, InMemoryDocumentStore, Session};

pub fn binder() -> Binder<InMemoryDocumentStore> {
    binder_for("trainer-red")
}

pub fn binder_for(uid: &str) -> Binder<InMemoryDocumentStore> {
    let session = Session::new(uid).unwrap();
    Binder::sign_in(InMemoryDocumentStore::new(), session, Config::default()).unwrap()
}

pub fn set(id: &str, total: Option<u32>) -> CardSet {
    CardSet {
        total,
        ..CardSet::new(id, id.to_uppercase())
    }
}

/// A Pokémon printed with the given finishes.
pub fn pokemon(id: &str, name: &str, normal: bool, holo: bool, reverse: bool) -> Card {
    let mut card = Card::new(id, name);
    card.supertype = "Pokémon".into();
    card.number = id.rsplit('-').next().unwrap_or_default().to_string();
    card.tcgplayer = Some(TcgPlayer {
        prices: Some(Prices {
            normal: normal.then(PricePoint::default),
            holofoil: holo.then(PricePoint::default),
            reverse_holofoil: reverse.then(PricePoint::default),
            ..Prices::default()
        }),
        ..TcgPlayer::default()
    });
    card
}

pub fn in_set(mut card: Card, set: &CardSet) -> Card {
    card.set = Some(set.clone());
    card
}

pub fn trainer(id: &str, name: &str, subtypes: &[&str]) -> Card {
    let mut card = Card::new(id, name);
    card.supertype = "Trainer".into();
    card.subtypes = subtypes.iter().map(|s| s.to_string()).collect();
    card
}

pub fn energy(id: &str, name: &str, basic: bool) -> Card {
    let mut card = Card::new(id, name);
    card.supertype = "Energy".into();
    card.subtypes = vec![if basic { "Basic" } else { "Special" }.to_string()];
    card
}
