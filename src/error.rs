use crate::catalog::CatalogError;
use crate::collections::CollectionError;
use crate::config::ConfigError;
use crate::deck::{DeckError, DeckViolation};
use crate::ownership::OwnershipError;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Any error the library reports.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Deck(#[from] DeckViolation),
    #[error(transparent)]
    Ownership(#[from] OwnershipError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0} not found")]
    NotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<DeckError> for Error {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::Validation(err) => Error::Validation(err),
            DeckError::Store(err) => Error::Store(err),
            DeckError::NotFound(id) => Error::NotFound(format!("deck {}", id)),
        }
    }
}

impl From<CollectionError> for Error {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::Validation(err) => Error::Validation(err),
            CollectionError::Store(err) => Error::Store(err),
            CollectionError::NotFound(id) => Error::NotFound(format!("collection {}", id)),
        }
    }
}
