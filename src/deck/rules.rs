//! Format quantity limits for deck building.

use crate::card::Card;

use super::DeckCard;

/// Copies allowed per card name.
pub const MAX_COPIES: u32 = 4;

/// Copies allowed per special (non-basic) energy name.
pub const MAX_SPECIAL_ENERGY: u32 = 4;

/// ACE SPEC cards allowed per deck, across all names.
pub const MAX_ACE_SPEC: usize = 1;

/// Standard deck size, for display.
pub const DECK_SIZE: u32 = 60;

/// Why a card cannot be added to a deck.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckViolation {
    #[error("max {limit} copies of {name}")]
    CopyLimit { name: String, limit: u32 },
    #[error("max {limit} copies of special energy: {name}")]
    SpecialEnergyLimit { name: String, limit: u32 },
    #[error("only {limit} ACE SPEC card allowed")]
    AceSpecLimit { limit: usize },
}

/// Total quantity across every printing named `name`.
pub fn copies_by_name(cards: &[DeckCard], name: &str) -> u32 {
    cards
        .iter()
        .filter(|stack| stack.card.name == name)
        .map(|stack| stack.quantity)
        .sum()
}

/// Number of ACE SPEC stacks in the deck.
pub fn ace_spec_count(cards: &[DeckCard]) -> usize {
    cards.iter().filter(|stack| stack.card.is_ace_spec()).count()
}

/// Check whether one more copy of `card` may be added. The first violated
/// rule is reported. Basic energy has no copy limit.
pub fn can_add(cards: &[DeckCard], card: &Card) -> Result<(), DeckViolation> {
    let copies = copies_by_name(cards, &card.name);

    if card.is_energy() {
        if !card.is_basic_energy() && copies >= MAX_SPECIAL_ENERGY {
            return Err(DeckViolation::SpecialEnergyLimit {
                name: card.name.clone(),
                limit: MAX_SPECIAL_ENERGY,
            });
        }
    } else if copies >= MAX_COPIES {
        return Err(DeckViolation::CopyLimit {
            name: card.name.clone(),
            limit: MAX_COPIES,
        });
    }

    if card.is_ace_spec() && ace_spec_count(cards) >= MAX_ACE_SPEC {
        return Err(DeckViolation::AceSpecLimit {
            limit: MAX_ACE_SPEC,
        });
    }

    Ok(())
}
