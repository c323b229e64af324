use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::{VariantKey, VariantSet};

/// Which variants of one card are owned.
///
/// Stored as a `{variantKey: bool}` object. Decoding drops keys that are no
/// longer variant keys (legacy data); the next write persists the repaired
/// map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct OwnedMap(BTreeMap<VariantKey, bool>);

impl OwnedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is marked owned; absent keys are not.
    pub fn get(&self, key: VariantKey) -> bool {
        self.0.get(&key).copied().unwrap_or(false)
    }

    pub fn contains_key(&self, key: VariantKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn set(&mut self, key: VariantKey, owned: bool) {
        self.0.insert(key, owned);
    }

    /// Flip `key` and return its new value.
    pub fn toggle(&mut self, key: VariantKey) -> bool {
        let value = !self.get(key);
        self.0.insert(key, value);
        value
    }

    /// At least one variant is owned.
    pub fn any_owned(&self) -> bool {
        self.0.values().any(|owned| *owned)
    }

    /// Keys marked owned, in display order.
    pub fn owned_keys(&self) -> impl Iterator<Item = VariantKey> + '_ {
        self.0.iter().filter(|(_, owned)| **owned).map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariantKey, bool)> + '_ {
        self.0.iter().map(|(key, owned)| (*key, *owned))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One entry per variant in `variants`, carrying forward current values.
    /// Keys outside `variants` are dropped.
    pub fn restricted_to(&self, variants: &VariantSet) -> OwnedMap {
        variants.iter().map(|key| (key, self.get(key))).collect()
    }

    /// Drop keys outside `variants`. Returns true if anything was removed.
    pub fn retain_variants(&mut self, variants: &VariantSet) -> bool {
        let before = self.0.len();
        self.0.retain(|key, _| variants.contains(*key));
        self.0.len() != before
    }

    /// Every variant in `variants` set to `owned`.
    pub fn uniform(variants: &VariantSet, owned: bool) -> OwnedMap {
        variants.iter().map(|key| (key, owned)).collect()
    }

    /// Copy every entry of `other` over this map.
    pub fn overlay(&mut self, other: &OwnedMap) {
        self.0.extend(other.iter());
    }
}

impl FromIterator<(VariantKey, bool)> for OwnedMap {
    fn from_iter<I: IntoIterator<Item = (VariantKey, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for OwnedMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older documents store `null` for a map nothing was ever marked in.
        let raw = Option::<BTreeMap<String, Option<bool>>>::deserialize(deserializer)?;
        let mut map = BTreeMap::new();
        for (name, owned) in raw.unwrap_or_default() {
            match name.parse::<VariantKey>() {
                Ok(key) => {
                    map.insert(key, owned.unwrap_or(false));
                }
                Err(_) => {
                    tracing::warn!(key = %name, "dropping unrecognized variant key");
                }
            }
        }
        Ok(Self(map))
    }
}
