//! Standard-format filtering for deck-builder search results.

use std::fmt;
use std::str::FromStr;

use crate::card::Card;

use super::normalize::{matches_term, normalize_term};

/// Oldest regulation mark legal in the current format.
pub const MIN_REGULATION_MARK: &str = "G";

/// Group printings by name (first-seen order) and keep every printing of a
/// group when at least one printing is legal (basic energy, or regulation
/// mark at or after [`MIN_REGULATION_MARK`]) and the group's first printing
/// is a Pokémon, Trainer or Energy card.
pub fn legal_groups(cards: Vec<Card>) -> Vec<Card> {
    let mut groups: Vec<(String, Vec<Card>)> = Vec::new();
    for card in cards {
        match groups.iter_mut().find(|(name, _)| *name == card.name) {
            Some((_, group)) => group.push(card),
            None => groups.push((card.name.clone(), vec![card])),
        }
    }

    groups
        .into_iter()
        .filter(|(_, group)| {
            let has_legal = group.iter().any(is_legal_printing);
            let known_supertype = group.first().and_then(Card::supertype).is_some();
            has_legal && known_supertype
        })
        .flat_map(|(_, group)| group)
        .collect()
}

fn is_legal_printing(card: &Card) -> bool {
    card.is_basic_energy()
        || card
            .regulation_mark
            .as_deref()
            .is_some_and(|mark| mark >= MIN_REGULATION_MARK)
}

/// Energy-type refinement applied when the search term is exactly "energy".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyFilter {
    #[default]
    All,
    Grass,
    Fire,
    Water,
    Lightning,
    Psychic,
    Fighting,
    Darkness,
    Metal,
    Fairy,
}

impl EnergyFilter {
    pub const ALL: [EnergyFilter; 10] = [
        EnergyFilter::All,
        EnergyFilter::Grass,
        EnergyFilter::Fire,
        EnergyFilter::Water,
        EnergyFilter::Lightning,
        EnergyFilter::Psychic,
        EnergyFilter::Fighting,
        EnergyFilter::Darkness,
        EnergyFilter::Metal,
        EnergyFilter::Fairy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EnergyFilter::All => "All",
            EnergyFilter::Grass => "Grass",
            EnergyFilter::Fire => "Fire",
            EnergyFilter::Water => "Water",
            EnergyFilter::Lightning => "Lightning",
            EnergyFilter::Psychic => "Psychic",
            EnergyFilter::Fighting => "Fighting",
            EnergyFilter::Darkness => "Darkness",
            EnergyFilter::Metal => "Metal",
            EnergyFilter::Fairy => "Fairy",
        }
    }

    /// A card passes when it has the energy type, or its name mentions it.
    pub fn accepts(self, card: &Card) -> bool {
        if self == EnergyFilter::All {
            return true;
        }
        let kind = self.as_str();
        card.types.iter().any(|t| t == kind) || card.name.to_lowercase().contains(&kind.to_lowercase())
    }
}

impl fmt::Display for EnergyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown energy type: {}", s))
    }
}

/// Narrow raw catalog results for the deck builder: legal groups, name
/// match, then the energy filter when the term is "energy".
pub fn filter_results(cards: Vec<Card>, raw_term: &str, energy: EnergyFilter) -> Vec<Card> {
    let term = normalize_term(raw_term.trim());
    legal_groups(cards)
        .into_iter()
        .filter(|card| matches_term(&card.name, &term))
        .filter(|card| term != "energy" || energy.accepts(card))
        .collect()
}
