//! Print variants - the finishes and rarities a collector tracks per card.
//!
//! [`VariantKey`] names a variant with a stable camelCase wire name, which is
//! also the key used in stored ownership maps. [`VariantClassifier`] derives
//! the variants a card can be owned in; [`OwnedMap`] records which of them
//! the collector has.

mod classifier;
mod owned;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use classifier::{PatternMembership, VariantClassifier, PATTERN_COLLECTION};
pub use owned::OwnedMap;

/// A distinct printing/finish of a card.
///
/// Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantKey {
    Normal,
    ReverseHolo,
    Holo,
    AceSpec,
    DoubleRare,
    UltraRare,
    IllustrationRare,
    SpecialIllustrationRare,
    HyperRare,
    ShinyRare,
    ShinyUltraRare,
    PokeBallPattern,
    MasterBallPattern,
}

impl VariantKey {
    pub const ALL: [VariantKey; 13] = [
        VariantKey::Normal,
        VariantKey::ReverseHolo,
        VariantKey::Holo,
        VariantKey::AceSpec,
        VariantKey::DoubleRare,
        VariantKey::UltraRare,
        VariantKey::IllustrationRare,
        VariantKey::SpecialIllustrationRare,
        VariantKey::HyperRare,
        VariantKey::ShinyRare,
        VariantKey::ShinyUltraRare,
        VariantKey::PokeBallPattern,
        VariantKey::MasterBallPattern,
    ];

    /// Rarity variants, each paired with the exact catalog rarity it matches.
    pub const RARITIES: [(VariantKey, &'static str); 7] = [
        (VariantKey::DoubleRare, "Double Rare"),
        (VariantKey::UltraRare, "Ultra Rare"),
        (VariantKey::IllustrationRare, "Illustration Rare"),
        (VariantKey::SpecialIllustrationRare, "Special Illustration Rare"),
        (VariantKey::HyperRare, "Hyper Rare"),
        (VariantKey::ShinyRare, "Shiny Rare"),
        (VariantKey::ShinyUltraRare, "Shiny Ultra Rare"),
    ];

    /// Wire name, as stored in ownership maps.
    pub fn as_str(self) -> &'static str {
        match self {
            VariantKey::Normal => "normal",
            VariantKey::ReverseHolo => "reverseHolo",
            VariantKey::Holo => "holo",
            VariantKey::AceSpec => "aceSpec",
            VariantKey::DoubleRare => "doubleRare",
            VariantKey::UltraRare => "ultraRare",
            VariantKey::IllustrationRare => "illustrationRare",
            VariantKey::SpecialIllustrationRare => "specialIllustrationRare",
            VariantKey::HyperRare => "hyperRare",
            VariantKey::ShinyRare => "shinyRare",
            VariantKey::ShinyUltraRare => "shinyUltraRare",
            VariantKey::PokeBallPattern => "pokeBallPattern",
            VariantKey::MasterBallPattern => "masterBallPattern",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            VariantKey::Normal => "Normal",
            VariantKey::ReverseHolo => "Reverse Holo",
            VariantKey::Holo => "Holo",
            VariantKey::AceSpec => "ACE SPEC",
            VariantKey::DoubleRare => "Double Rare",
            VariantKey::UltraRare => "Ultra Rare",
            VariantKey::IllustrationRare => "Illustration Rare",
            VariantKey::SpecialIllustrationRare => "Special Illustration Rare",
            VariantKey::HyperRare => "Hyper Rare",
            VariantKey::ShinyRare => "Shiny Rare",
            VariantKey::ShinyUltraRare => "Shiny Ultra Rare",
            VariantKey::PokeBallPattern => "Poké Ball Pattern",
            VariantKey::MasterBallPattern => "Master Ball Pattern",
        }
    }

    /// Whether `rarity` is one of the seven special rarities.
    pub fn is_special_rarity(rarity: &str) -> bool {
        Self::RARITIES.iter().any(|(_, name)| *name == rarity)
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant key: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for VariantKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// The variants a card can be owned in, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantSet(BTreeSet<VariantKey>);

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: VariantKey) -> bool {
        self.0.insert(key)
    }

    pub fn contains(&self, key: VariantKey) -> bool {
        self.0.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = VariantKey> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<VariantKey> for VariantSet {
    fn from_iter<I: IntoIterator<Item = VariantKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type Item = VariantKey;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, VariantKey>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}
