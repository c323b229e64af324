//! Decks: card stacks under format quantity limits.
//!
//! A [`Deck`] is a named list of [`DeckCard`] stacks, one per printing.
//! [`Deck::add_card`] enforces the limits in [`rules`]; [`Decks`] persists
//! decks under the user's `decks` collection and [`export`] renders them as
//! plain text.

pub mod export;
pub mod rules;
mod service;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{Card, Supertype};
use crate::Document;

pub use export::{export_event_text, export_file_name, export_text, PlayerInfo};
pub use rules::{can_add, DeckViolation, DECK_SIZE, MAX_ACE_SPEC, MAX_COPIES, MAX_SPECIAL_ENERGY};
pub use service::{DeckError, Decks};

/// A saved deck.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Document)]
#[document(collection = "decks")]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    /// Document id. Older documents do not store it; [`Decks`] fills it in
    /// from the path.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<DeckCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One printing in a deck with its copy count. Always `quantity >= 1` in a
/// deck produced by [`Deck::add_card`] / [`Deck::remove_card`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckCard {
    #[serde(flatten)]
    pub card: Card,
    pub quantity: u32,
}

impl Deck {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cards: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }

    /// Add one copy of `card`, merging into its stack when present.
    /// Returns the stack's new quantity.
    pub fn add_card(&mut self, card: &Card) -> Result<u32, DeckViolation> {
        can_add(&self.cards, card)?;

        if let Some(stack) = self.cards.iter_mut().find(|stack| stack.card.id == card.id) {
            stack.quantity += 1;
            return Ok(stack.quantity);
        }
        self.cards.push(DeckCard {
            card: card.clone(),
            quantity: 1,
        });
        Ok(1)
    }

    /// Remove one copy of the card with `card_id`. A stack that reaches zero
    /// is dropped. Returns the remaining quantity, or `None` when the card
    /// is not in the deck.
    pub fn remove_card(&mut self, card_id: &str) -> Option<u32> {
        let stack = self.cards.iter_mut().find(|stack| stack.card.id == card_id)?;
        stack.quantity = stack.quantity.saturating_sub(1);
        let remaining = stack.quantity;
        self.cards.retain(|stack| stack.quantity > 0);
        Some(remaining)
    }

    pub fn total_cards(&self) -> u32 {
        self.cards.iter().map(|stack| stack.quantity).sum()
    }

    pub fn copies_of(&self, name: &str) -> u32 {
        rules::copies_by_name(&self.cards, name)
    }

    /// Stacks grouped by supertype in Pokémon, Trainer, Energy order. Empty
    /// groups and cards with another supertype are left out.
    pub fn by_category(&self) -> Vec<(Supertype, Vec<&DeckCard>)> {
        Supertype::ALL
            .into_iter()
            .filter_map(|supertype| {
                let stacks: Vec<&DeckCard> = self
                    .cards
                    .iter()
                    .filter(|stack| stack.card.supertype() == Some(supertype))
                    .collect();
                (!stacks.is_empty()).then_some((supertype, stacks))
            })
            .collect()
    }
}
