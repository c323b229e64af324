//! Set browsing: filter and sort the catalog's set list against the user's
//! master set summaries.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::card::CardSet;
use crate::records::MasterSetSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetSort {
    #[default]
    Newest,
    Oldest,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

/// Criteria for [`browse_sets`]. The default shows every set, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetQuery {
    /// Case-insensitive substring of the set name or series.
    pub search: String,
    /// Exact series name; `None` for all series.
    pub series: Option<String>,
    pub completion: CompletionFilter,
    pub sort: SetSort,
}

/// A set with the user's completion state, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct SetListing<'a> {
    pub set: &'a CardSet,
    pub summary: Option<&'a MasterSetSummary>,
}

impl SetListing<'_> {
    pub fn is_completed(&self) -> bool {
        self.summary.is_some_and(|summary| summary.completed)
    }
}

/// Sets the catalog lists with both a card total and a release date.
pub fn browsable(sets: &[CardSet]) -> impl Iterator<Item = &CardSet> {
    sets.iter()
        .filter(|set| set.total.is_some_and(|total| total > 0) && set.release_date.is_some())
}

/// Filter and sort `sets`. Sets without a summary count as incomplete.
pub fn browse_sets<'a>(
    sets: &'a [CardSet],
    query: &SetQuery,
    summaries: &'a [MasterSetSummary],
) -> Vec<SetListing<'a>> {
    let by_set: HashMap<&str, &MasterSetSummary> = summaries
        .iter()
        .map(|summary| (summary.set_id.as_str(), summary))
        .collect();
    let search = query.search.trim().to_lowercase();

    let mut listings: Vec<SetListing<'a>> = browsable(sets)
        .filter(|set| {
            search.is_empty()
                || set.name.to_lowercase().contains(&search)
                || set.series.to_lowercase().contains(&search)
        })
        .filter(|set| query.series.as_ref().map_or(true, |series| set.series == *series))
        .map(|set| SetListing {
            set,
            summary: by_set.get(set.id.as_str()).copied(),
        })
        .filter(|listing| match query.completion {
            CompletionFilter::All => true,
            CompletionFilter::Completed => listing.is_completed(),
            CompletionFilter::Incomplete => !listing.is_completed(),
        })
        .collect();

    listings.sort_by(|a, b| compare(a.set, b.set, query.sort));
    listings
}

fn compare(a: &CardSet, b: &CardSet, sort: SetSort) -> Ordering {
    match sort {
        SetSort::Newest => b.released_on().cmp(&a.released_on()),
        SetSort::Oldest => a.released_on().cmp(&b.released_on()),
        SetSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    }
}

/// Distinct series of the browsable sets, in first-seen order.
pub fn series_of(sets: &[CardSet]) -> Vec<String> {
    let mut series: Vec<String> = Vec::new();
    for set in browsable(sets) {
        if !series.contains(&set.series) {
            series.push(set.series.clone());
        }
    }
    series
}
