//! Public card catalog access.
//!
//! [`CardCatalog`] is the seam to the external card-data API: one page of
//! cards for a query, one set, or every set. [`CatalogSearch`] builds the
//! catalog's query strings and walks pages until the reported total is
//! reached. An HTTP implementation is available behind the `http` feature.

#[cfg(feature = "http")]
mod http;
pub mod legality;
pub mod normalize;
pub mod sets;

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardSet};

#[cfg(feature = "http")]
pub use http::HttpCatalog;
pub use legality::{filter_results, legal_groups, EnergyFilter};
pub use normalize::{matches_term, normalize_term};
pub use sets::{browse_sets, series_of, CompletionFilter, SetListing, SetQuery, SetSort};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("could not decode catalog response: {0}")]
    Decode(String),
}

/// One page of a card query, in the catalog's envelope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardPage {
    pub data: Vec<Card>,
    pub page: u32,
    pub page_size: u32,
    pub count: u32,
    pub total_count: u32,
}

/// The external card-data service.
pub trait CardCatalog: Send + Sync {
    /// One page (1-based) of cards matching `query`.
    fn fetch_cards(&self, query: &str, page: u32, page_size: u32) -> Result<CardPage, CatalogError>;

    /// A set by id; `None` when the catalog does not know it.
    fn fetch_set(&self, set_id: &str) -> Result<Option<CardSet>, CatalogError>;

    /// Every set the catalog lists.
    fn fetch_sets(&self) -> Result<Vec<CardSet>, CatalogError>;
}

/// Card fields a text search can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Name,
    Artist,
    SetName,
}

impl SearchField {
    /// Field name in the catalog's query syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::Artist => "artist",
            SearchField::SetName => "set.name",
        }
    }
}

/// `field:"term"`, with quotes removed from the term.
pub fn field_query(field: SearchField, term: &str) -> String {
    format!("{}:\"{}\"", field.as_str(), term.trim().replace('"', ""))
}

/// Set detail ordering for card lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardSort {
    #[default]
    NumberAsc,
    NumberDesc,
    Name,
}

/// Keep cards whose name contains `search` (case-insensitive) and order them.
/// Cards without a numeric collector number sort after numbered ones.
pub fn sort_cards(cards: &[Card], search: &str, sort: CardSort) -> Vec<Card> {
    let search = search.trim().to_lowercase();
    let mut found: Vec<Card> = cards
        .iter()
        .filter(|card| card.name.to_lowercase().contains(&search))
        .cloned()
        .collect();

    let number = |card: &Card| card.number_value().unwrap_or(u32::MAX);
    match sort {
        CardSort::NumberAsc => found.sort_by_key(number),
        CardSort::NumberDesc => found.sort_by_key(|card| std::cmp::Reverse(card.number_value())),
        CardSort::Name => found.sort_by(|a, b| a.name.cmp(&b.name)),
    }
    found
}

/// Query helpers over a [`CardCatalog`].
pub struct CatalogSearch<'a, C: ?Sized> {
    catalog: &'a C,
    page_size: u32,
}

impl<'a, C: CardCatalog + ?Sized> CatalogSearch<'a, C> {
    pub fn new(catalog: &'a C, page_size: u32) -> Self {
        Self {
            catalog,
            page_size: page_size.max(1),
        }
    }

    /// Every card matching `query`, across pages. Stops once the
    /// accumulated count reaches the reported total, or on an empty page.
    pub fn fetch_all(&self, query: &str) -> Result<Vec<Card>, CatalogError> {
        let mut cards = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.catalog.fetch_cards(query, page, self.page_size)?;
            if batch.data.is_empty() {
                break;
            }
            let total = batch.total_count as usize;
            cards.extend(batch.data);
            if cards.len() >= total {
                break;
            }
            page += 1;
        }
        tracing::debug!(query, pages = page, cards = cards.len(), "fetched catalog cards");
        Ok(cards)
    }

    /// Cards whose `field` matches `term`.
    pub fn search(&self, term: &str, field: SearchField) -> Result<Vec<Card>, CatalogError> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_all(&field_query(field, term))
    }

    /// Every card of a set.
    pub fn set_cards(&self, set_id: &str) -> Result<Vec<Card>, CatalogError> {
        self.fetch_all(&format!("set.id:{}", set_id))
    }

    /// Deck-builder search: name prefix query, then legality, name match and
    /// energy filtering.
    pub fn deck_search(&self, term: &str, energy: EnergyFilter) -> Result<Vec<Card>, CatalogError> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        let normalized = normalize_term(trimmed);
        let raw = self.fetch_all(&format!("name:\"{}*\"", normalized.replace('"', "")))?;
        Ok(filter_results(raw, trimmed, energy))
    }
}
