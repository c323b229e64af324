use chrono::Utc;
use uuid::Uuid;

use crate::config::NameRules;
use crate::session::UserScope;
use crate::store::{CollectionPath, DocumentRepository, DocumentStore, DocumentsExt, StoreError};
use crate::validation::{validate_name, ValidationError};

use super::{Deck, DeckCard};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("deck not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A user's saved decks.
pub struct Decks<'a, S: ?Sized> {
    store: &'a S,
    collection: CollectionPath,
    rules: &'a NameRules,
}

impl<'a, S: DocumentStore + ?Sized> Decks<'a, S> {
    pub fn new(store: &'a S, user: &UserScope, rules: &'a NameRules) -> Self {
        Self {
            store,
            collection: user.decks(),
            rules,
        }
    }

    fn repo(&self) -> DocumentRepository<'a, S, Deck> {
        self.store.documents::<Deck>(self.collection.clone())
    }

    /// Create an empty deck. The name is trimmed and validated before
    /// anything is written.
    pub fn create(&self, name: &str) -> Result<Deck, DeckError> {
        let name = validate_name(name, self.rules)?;
        let deck = Deck::new(Uuid::new_v4().simple().to_string(), name);
        self.repo().save(&deck)?;
        tracing::info!(deck_id = %deck.id, name = %deck.name, "created deck");
        Ok(deck)
    }

    pub fn get(&self, id: &str) -> Result<Option<Deck>, DeckError> {
        Ok(self.repo().get(id)?.map(|record| with_id(record.data, id)))
    }

    /// Every saved deck, ordered by id. Documents that do not decode as a
    /// deck are skipped.
    pub fn list(&self) -> Result<Vec<Deck>, DeckError> {
        let snapshot = self.store.list(&self.collection)?;
        let decks: Vec<Deck> = snapshot
            .iter()
            .filter_map(|doc| match doc.decode::<Deck>() {
                Ok(deck) => Some(with_id(deck, doc.id())),
                Err(err) => {
                    tracing::warn!(path = %doc.path, error = %err, "skipping undecodable deck");
                    None
                }
            })
            .collect();
        tracing::debug!(collection = %self.collection, count = decks.len(), "listed decks");
        Ok(decks)
    }

    /// Replace the stored card list of an existing deck.
    pub fn save_cards(&self, id: &str, cards: &[DeckCard]) -> Result<(), DeckError> {
        #[derive(serde::Serialize)]
        struct CardsPatch<'c> {
            cards: &'c [DeckCard],
        }

        self.repo()
            .update_fields(id, &CardsPatch { cards })
            .map_err(|err| match err {
                StoreError::NotFound { .. } => DeckError::NotFound(id.to_string()),
                other => DeckError::Store(other),
            })?;
        tracing::debug!(deck_id = id, stacks = cards.len(), "saved deck cards");
        Ok(())
    }

    /// Write the whole deck, stamping `createdAt` if it has none.
    pub fn save(&self, deck: &Deck) -> Result<(), DeckError> {
        let mut deck = deck.clone();
        deck.created_at.get_or_insert_with(Utc::now);
        self.repo().save(&deck)?;
        Ok(())
    }

    /// Rename a deck after validating the new name.
    pub fn rename(&self, id: &str, name: &str) -> Result<(), DeckError> {
        #[derive(serde::Serialize)]
        struct NamePatch {
            name: String,
        }

        let name = validate_name(name, self.rules)?;
        self.repo()
            .update_fields(id, &NamePatch { name })
            .map_err(|err| match err {
                StoreError::NotFound { .. } => DeckError::NotFound(id.to_string()),
                other => DeckError::Store(other),
            })?;
        Ok(())
    }

    /// Returns true if the deck existed.
    pub fn delete(&self, id: &str) -> Result<bool, DeckError> {
        let existed = self.repo().delete(id)?;
        tracing::info!(deck_id = id, existed, "deleted deck");
        Ok(existed)
    }
}

fn with_id(mut deck: Deck, id: &str) -> Deck {
    if deck.id.is_empty() {
        deck.id = id.to_string();
    }
    deck
}
