extern crate self as tcg_binder;

pub mod binder;
pub mod card;
pub mod catalog;
pub mod collections;
pub mod config;
pub mod deck;
mod error;
pub mod ownership;
pub mod records;
pub mod session;
pub mod stats;
pub mod store;
pub mod telemetry;
pub mod validation;
pub mod variant;

pub use binder::Binder;
pub use card::{Card, CardSet, Supertype};
pub use catalog::{CardCatalog, CatalogError, CatalogSearch, EnergyFilter};
#[cfg(feature = "http")]
pub use catalog::HttpCatalog;
pub use collections::{CollectionError, Collections};
pub use config::{Config, ConfigError, NameRules};
pub use deck::{Deck, DeckCard, DeckError, DeckViolation, Decks};
pub use error::{Error, Result};
pub use ownership::{BackfillReport, OwnershipError, OwnershipScope, Reconciler};
pub use records::{Collection, CollectionCardEntry, MasterSetEntry, MasterSetSummary, OwnedCardIndexEntry};
pub use session::{Session, UserScope};
pub use store::{
    CollectionPath, DocPath, Document, DocumentRepository, DocumentStore, DocumentsExt,
    InMemoryDocumentStore, StoreError, Subscription,
};
pub use validation::{validate_name, ValidationError};
pub use variant::{OwnedMap, PatternMembership, VariantClassifier, VariantKey, VariantSet};

// Derive for `Document`; lives in the macro namespace next to the trait.
pub use tcg_binder_macros::Document;
