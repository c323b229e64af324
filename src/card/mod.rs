//! Card and set metadata as returned by the public card catalog.
//!
//! These records mirror the catalog's JSON payloads (camelCase fields) and
//! are also copied into ownership entries and decks, so they serialize back
//! to the same shape. Only the fields the crate consumes are modelled.

mod set;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use set::{CardSet, SetImages};

/// Subtype (and name marker) carried by ACE SPEC cards.
pub const ACE_SPEC: &str = "ACE SPEC";

/// Subtype carried by basic energy cards.
pub const BASIC: &str = "Basic";

/// One printing of a card.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub supertype: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtypes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(default)]
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulation_mark: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<CardImages>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<CardSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcgplayer: Option<TcgPlayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
}

/// Market data block; only the presence of price points matters here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcgPlayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices: Option<Prices>,
}

/// Price points keyed by finish.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prices {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<PricePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holofoil: Option<PricePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_holofoil: Option<PricePoint>,
    /// Finishes the classifier does not look at (e.g. `1stEditionHolofoil`).
    #[serde(flatten)]
    pub other: BTreeMap<String, PricePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_low: Option<f64>,
}

/// Finishes with a price point the classifier inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceKind {
    Normal,
    Holofoil,
    ReverseHolofoil,
}

/// Top-level card category used for deck grouping and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Supertype {
    Pokemon,
    Trainer,
    Energy,
}

impl Supertype {
    /// Display (and grouping) order.
    pub const ALL: [Supertype; 3] = [Supertype::Pokemon, Supertype::Trainer, Supertype::Energy];

    /// The catalog's spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Supertype::Pokemon => "Pokémon",
            Supertype::Trainer => "Trainer",
            Supertype::Energy => "Energy",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

impl fmt::Display for Supertype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Card {
    /// Minimal card with id and name, used by builders and tests.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_price(&self, kind: PriceKind) -> bool {
        let Some(prices) = self.tcgplayer.as_ref().and_then(|t| t.prices.as_ref()) else {
            return false;
        };
        match kind {
            PriceKind::Normal => prices.normal.is_some(),
            PriceKind::Holofoil => prices.holofoil.is_some(),
            PriceKind::ReverseHolofoil => prices.reverse_holofoil.is_some(),
        }
    }

    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtypes.iter().any(|s| s == subtype)
    }

    pub fn supertype(&self) -> Option<Supertype> {
        Supertype::parse(&self.supertype)
    }

    pub fn is_energy(&self) -> bool {
        self.supertype() == Some(Supertype::Energy)
    }

    pub fn is_basic_energy(&self) -> bool {
        self.is_energy() && self.has_subtype(BASIC)
    }

    /// ACE SPEC cards carry the marker in their name or as a subtype.
    pub fn is_ace_spec(&self) -> bool {
        self.name.contains(ACE_SPEC) || self.has_subtype(ACE_SPEC)
    }

    pub fn rarity(&self) -> &str {
        self.rarity.as_deref().unwrap_or("")
    }

    pub fn set_id(&self) -> Option<&str> {
        self.set.as_ref().map(|s| s.id.as_str())
    }

    /// Number of cards in this card's set, when the catalog reported it.
    pub fn set_total(&self) -> Option<u32> {
        self.set.as_ref().and_then(|s| s.total)
    }

    /// Leading digits of the collector number ("TG05" and "SV001" sort last).
    pub fn number_value(&self) -> Option<u32> {
        let digits: String = self.number.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    pub fn small_image(&self) -> Option<&str> {
        self.images.as_ref().and_then(|i| i.small.as_deref())
    }
}
