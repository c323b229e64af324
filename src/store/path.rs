//! Hierarchical document addresses.
//!
//! Paths alternate collection and document segments:
//! `users/{uid}/collections/{id}/cards/{cardId}`. A [`CollectionPath`] has an
//! odd number of segments, a [`DocPath`] an even number.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StoreError;

/// Address of a collection of documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectionPath(String);

/// Address of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocPath(String);

impl CollectionPath {
    /// A top-level collection, e.g. `users` or `cardVariants`.
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Parse a slash-separated collection path.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let count = validate_segments(raw)?;
        if count % 2 == 0 {
            return Err(StoreError::InvalidPath(format!(
                "{} names a document, not a collection",
                raw
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Address of the document `id` inside this collection.
    pub fn doc(&self, id: &str) -> DocPath {
        DocPath(format!("{}/{}", self.0, id))
    }

    /// Last segment of the path.
    pub fn name(&self) -> &str {
        last_segment(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `path` is a document directly inside this collection.
    pub fn contains(&self, path: &DocPath) -> bool {
        path.0
            .strip_prefix(&self.0)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(|id| !id.is_empty() && !id.contains('/'))
            .unwrap_or(false)
    }
}

impl DocPath {
    /// Parse a slash-separated document path.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let count = validate_segments(raw)?;
        if count % 2 != 0 {
            return Err(StoreError::InvalidPath(format!(
                "{} names a collection, not a document",
                raw
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Address of a sub-collection of this document.
    pub fn collection(&self, name: &str) -> CollectionPath {
        CollectionPath(format!("{}/{}", self.0, name))
    }

    /// Collection holding this document.
    pub fn parent(&self) -> CollectionPath {
        match self.0.rfind('/') {
            Some(idx) => CollectionPath(self.0[..idx].to_string()),
            None => CollectionPath(String::new()),
        }
    }

    /// Document id (last segment).
    pub fn id(&self) -> &str {
        last_segment(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check segment structure. Builders do not validate ids, stores do.
    pub fn validate(&self) -> Result<(), StoreError> {
        Self::parse(&self.0).map(|_| ())
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_segments(raw: &str) -> Result<usize, StoreError> {
    if raw.is_empty() {
        return Err(StoreError::InvalidPath("empty path".into()));
    }
    let mut count = 0;
    for segment in raw.split('/') {
        if segment.trim().is_empty() {
            return Err(StoreError::InvalidPath(format!(
                "{} contains an empty segment",
                raw
            )));
        }
        count += 1;
    }
    Ok(count)
}

fn last_segment(raw: &str) -> &str {
    raw.rsplit('/').next().unwrap_or(raw)
}
