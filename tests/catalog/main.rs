//! Catalog search and set browsing against a static catalog.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Mutex;

use support::{binder, energy, pokemon, set};
use tcg_binder::catalog::{
    browse_sets, sort_cards, CardPage, CardSort, CompletionFilter, SearchField, SetQuery,
};
use tcg_binder::{
    Card, CardCatalog, CardSet, CatalogError, CatalogSearch, DocumentsExt, EnergyFilter,
};

/// Serves every card for any query, recording what was asked.
struct StaticCatalog {
    cards: Vec<Card>,
    sets: Vec<CardSet>,
    queries: Mutex<Vec<(String, u32)>>,
}

impl StaticCatalog {
    fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            sets: Vec::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    fn queries(&self) -> Vec<(String, u32)> {
        self.queries.lock().unwrap().clone()
    }
}

impl CardCatalog for StaticCatalog {
    fn fetch_cards(&self, query: &str, page: u32, page_size: u32) -> Result<CardPage, CatalogError> {
        self.queries.lock().unwrap().push((query.to_string(), page));
        let start = ((page - 1) * page_size) as usize;
        let data: Vec<Card> = self
            .cards
            .iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok(CardPage {
            count: data.len() as u32,
            data,
            page,
            page_size,
            total_count: self.cards.len() as u32,
        })
    }

    fn fetch_set(&self, set_id: &str) -> Result<Option<CardSet>, CatalogError> {
        Ok(self.sets.iter().find(|set| set.id == set_id).cloned())
    }

    fn fetch_sets(&self) -> Result<Vec<CardSet>, CatalogError> {
        Ok(self.sets.clone())
    }
}

fn marked(mut card: Card, mark: &str) -> Card {
    card.regulation_mark = Some(mark.into());
    card
}

#[test]
fn deck_search_pages_and_filters_for_legality() {
    let catalog = StaticCatalog::new(vec![
        marked(pokemon("swsh1-1", "Pikachu", true, false, false), "D"),
        marked(pokemon("sv1-2", "Pikachu ex", false, true, false), "G"),
        marked(pokemon("swsh2-3", "Pikachu V", false, true, false), "E"),
        marked(pokemon("sv3-4", "Raichu", true, false, true), "G"),
        marked(pokemon("sv4-5", "Pikachu", true, false, false), "H"),
    ]);
    let search = CatalogSearch::new(&catalog, 2);

    let found: Vec<String> = search
        .deck_search(" Pika ", EnergyFilter::All)
        .unwrap()
        .into_iter()
        .map(|card| card.id)
        .collect();
    // every Pikachu printing survives because one of them is legal
    assert_eq!(found, vec!["swsh1-1", "sv4-5", "sv1-2"]);

    let queries = catalog.queries();
    assert_eq!(queries.len(), 3);
    assert_eq!(queries[0], ("name:\"pika*\"".to_string(), 1));
    assert_eq!(queries[2].1, 3);
}

#[test]
fn energy_term_applies_the_energy_filter() {
    let mut fire = energy("sve-2", "Basic Fire Energy", true);
    fire.types = vec!["Fire".into()];
    let mut water = energy("sve-3", "Basic Water Energy", true);
    water.types = vec!["Water".into()];
    let catalog = StaticCatalog::new(vec![fire, water]);

    let binder = binder();
    let search = binder.catalog_search(&catalog);
    let found = search.deck_search("energy", EnergyFilter::Water).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "sve-3");

    assert!(search.deck_search("   ", EnergyFilter::All).unwrap().is_empty());
}

#[test]
fn field_search_and_set_cards() {
    let catalog = StaticCatalog::new(vec![
        pokemon("sv2-10", "Sprigatito", true, false, true),
        pokemon("sv2-2", "Hoppip", true, false, true),
        pokemon("sv2-TG01", "Oddish", true, false, false),
    ]);
    let search = CatalogSearch::new(&catalog, 250);

    search.search("Mitsuhiro \"Arita\"", SearchField::Artist).unwrap();
    let cards = search.set_cards("sv2").unwrap();
    assert_eq!(cards.len(), 3);
    assert_eq!(
        catalog.queries().iter().map(|(q, _)| q.as_str()).collect::<Vec<_>>(),
        vec!["artist:\"Mitsuhiro Arita\"", "set.id:sv2"]
    );

    let ordered: Vec<_> = sort_cards(&cards, "", CardSort::NumberAsc)
        .into_iter()
        .map(|card| card.name)
        .collect();
    assert_eq!(ordered, vec!["Hoppip", "Sprigatito", "Oddish"]);
}

#[test]
fn browsing_sets_uses_the_users_summaries() {
    let binder = binder();
    let mut scarlet = set("sv1", Some(1));
    scarlet.name = "Scarlet & Violet".into();
    scarlet.series = "Scarlet & Violet".into();
    scarlet.release_date = Some("2023/03/31".into());
    let mut paldea = set("sv2", Some(279));
    paldea.name = "Paldea Evolved".into();
    paldea.series = "Scarlet & Violet".into();
    paldea.release_date = Some("2023/06/09".into());

    let mut catalog = StaticCatalog::new(Vec::new());
    catalog.sets = vec![scarlet.clone(), paldea];

    let card = support::in_set(pokemon("sv1-1", "Pineco", true, false, false), &scarlet);
    binder
        .reconciler()
        .toggle_variant(
            &tcg_binder::OwnershipScope::master_set("sv1"),
            &card.id,
            tcg_binder::VariantKey::Normal,
            &card,
        )
        .unwrap();

    let summaries: Vec<_> = binder
        .store()
        .documents::<tcg_binder::MasterSetSummary>(binder.scope().master_set_summaries())
        .list()
        .unwrap()
        .into_iter()
        .map(|record| record.data)
        .collect();
    let sets = catalog.fetch_sets().unwrap();

    let newest = browse_sets(&sets, &SetQuery::default(), &summaries);
    assert_eq!(newest.iter().map(|l| l.set.id.as_str()).collect::<Vec<_>>(), vec!["sv2", "sv1"]);

    let done = browse_sets(
        &sets,
        &SetQuery {
            completion: CompletionFilter::Completed,
            ..SetQuery::default()
        },
        &summaries,
    );
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].set.id, "sv1");
    assert_eq!(catalog.fetch_set("sv2").unwrap().map(|s| s.total), Some(Some(279)));
}
