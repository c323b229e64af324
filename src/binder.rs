//! Library entry point for one signed-in user.

use chrono::Utc;

use crate::catalog::{CardCatalog, CatalogSearch};
use crate::card::Card;
use crate::collections::Collections;
use crate::config::Config;
use crate::deck::Decks;
use crate::error::Result;
use crate::ownership::Reconciler;
use crate::session::{Session, UserScope};
use crate::stats::{self, DashboardTotals};
use crate::store::DocumentStore;
use crate::variant::{PatternMembership, VariantClassifier, VariantSet};

/// Wires a [`Session`] to a document store, the variant classifier and the
/// configuration. Services borrow from the binder, so they cannot outlive
/// the session.
///
/// ```
/// use tcg_binder::{Binder, Config, InMemoryDocumentStore, Session};
///
/// let session = Session::new("user-42").unwrap();
/// let binder = Binder::sign_in(InMemoryDocumentStore::new(), session, Config::default()).unwrap();
/// let deck = binder.decks().create("Lost Box").unwrap();
/// assert_eq!(binder.decks().list().unwrap(), vec![deck]);
/// let _store = binder.sign_out();
/// ```
pub struct Binder<S> {
    store: S,
    session: Session,
    scope: UserScope,
    config: Config,
    classifier: VariantClassifier,
}

impl<S: DocumentStore> Binder<S> {
    /// Start a session, loading pattern membership from the store.
    pub fn sign_in(store: S, session: Session, config: Config) -> Result<Self> {
        let patterns = PatternMembership::load(&store)?;
        Ok(Self::with_classifier(
            store,
            session,
            config,
            VariantClassifier::new(patterns),
        ))
    }

    pub fn with_classifier(
        store: S,
        session: Session,
        config: Config,
        classifier: VariantClassifier,
    ) -> Self {
        tracing::info!(uid = session.uid(), "session started");
        Self {
            scope: session.scope(),
            store,
            session,
            config,
            classifier,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scope(&self) -> &UserScope {
        &self.scope
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn classifier(&self) -> &VariantClassifier {
        &self.classifier
    }

    pub fn classify(&self, card: &Card) -> VariantSet {
        self.classifier.classify(card)
    }

    /// Re-read pattern membership after it changed in the store.
    pub fn reload_patterns(&mut self) -> Result<()> {
        self.classifier = VariantClassifier::new(PatternMembership::load(&self.store)?);
        Ok(())
    }

    pub fn reconciler(&self) -> Reconciler<'_, S> {
        Reconciler::new(&self.store, self.scope.clone(), &self.classifier)
    }

    pub fn collections(&self) -> Collections<'_, S> {
        Collections::new(&self.store, self.scope.clone(), &self.config.names)
    }

    pub fn decks(&self) -> Decks<'_, S> {
        Decks::new(&self.store, &self.scope, &self.config.names)
    }

    /// Search helpers over `catalog` using the configured page size.
    pub fn catalog_search<'c, C: CardCatalog + ?Sized>(&self, catalog: &'c C) -> CatalogSearch<'c, C> {
        CatalogSearch::new(catalog, self.config.catalog.page_size)
    }

    pub fn dashboard(&self) -> Result<DashboardTotals> {
        Ok(stats::dashboard_totals(&self.store, &self.scope)?)
    }

    /// End the session and hand the store back.
    pub fn sign_out(self) -> S {
        let elapsed = Utc::now() - self.session.started_at();
        tracing::info!(
            uid = self.session.uid(),
            seconds = elapsed.num_seconds(),
            "session ended"
        );
        self.store
    }
}
