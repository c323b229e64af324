//! The signed-in collector and the document paths that belong to them.

use chrono::{DateTime, Utc};

use crate::deck::Deck;
use crate::records::{Collection, MasterSetSummary, OwnedCardIndexEntry};
use crate::store::{CollectionPath, DocPath, Document};
use crate::validation::ValidationError;

/// Root collection holding one document per user.
pub const USERS: &str = "users";

/// Collection under a user holding one document per master set.
pub const MASTER_SETS: &str = "masterSets";

/// Collection under a user holding the personal (quantity) collection.
pub const PERSONAL_COLLECTION: &str = "personalCollection";

/// Collection of card entries under a collection or master set document.
pub const CARDS: &str = "cards";

/// An authenticated user, established by the caller after sign-in.
///
/// Every store path the library touches is derived from the session's
/// [`UserScope`]; there is no ambient current-user state.
///
/// ```
/// use tcg_binder::Session;
///
/// let session = Session::new("user-42").unwrap().with_email("ash@example.com");
/// assert_eq!(session.uid(), "user-42");
/// assert_eq!(session.scope().decks().as_str(), "users/user-42/decks");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    uid: String,
    email: Option<String>,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Create a session for `uid`. The uid must be a single path segment.
    pub fn new(uid: impl Into<String>) -> Result<Self, ValidationError> {
        let uid = uid.into();
        if uid.trim().is_empty() || uid.contains('/') {
            return Err(ValidationError::InvalidUserId(uid));
        }
        Ok(Self {
            uid,
            email: None,
            started_at: Utc::now(),
        })
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Path builder for this user's documents.
    pub fn scope(&self) -> UserScope {
        UserScope::new(&self.uid)
    }
}

/// Store paths under `users/{uid}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserScope {
    user: DocPath,
}

impl UserScope {
    pub fn new(uid: &str) -> Self {
        Self {
            user: CollectionPath::root(USERS).doc(uid),
        }
    }

    pub fn uid(&self) -> &str {
        self.user.id()
    }

    /// `users/{uid}/collections`
    pub fn collections(&self) -> CollectionPath {
        self.user.collection(Collection::COLLECTION)
    }

    /// `users/{uid}/collections/{id}`
    pub fn collection(&self, collection_id: &str) -> DocPath {
        self.collections().doc(collection_id)
    }

    /// `users/{uid}/collections/{id}/cards`
    pub fn collection_cards(&self, collection_id: &str) -> CollectionPath {
        self.collection(collection_id).collection(CARDS)
    }

    /// `users/{uid}/masterSets/{setId}/cards`
    pub fn master_set_cards(&self, set_id: &str) -> CollectionPath {
        self.user.collection(MASTER_SETS).doc(set_id).collection(CARDS)
    }

    /// `users/{uid}/masterSetSummaries`
    pub fn master_set_summaries(&self) -> CollectionPath {
        self.user.collection(MasterSetSummary::COLLECTION)
    }

    /// `users/{uid}/ownedCards`
    pub fn owned_cards(&self) -> CollectionPath {
        self.user.collection(OwnedCardIndexEntry::COLLECTION)
    }

    /// `users/{uid}/decks`
    pub fn decks(&self) -> CollectionPath {
        self.user.collection(Deck::COLLECTION)
    }

    /// `users/{uid}/personalCollection`
    pub fn personal_collection(&self) -> CollectionPath {
        self.user.collection(PERSONAL_COLLECTION)
    }
}
