//! AssetDatabase port - abstraction over the asset document store
//!
//! Mirrors the three operations the publishing pipeline exposes: `find`,
//! `find_one` and `update`. `insert` is used only by integration, which is
//! the one place new versions come into existence.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::entities::{Document, MalformedDocument, Patch, PatchError, Query};
use crate::domain::value_objects::DocumentId;

/// Result type for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Database operation errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Storage could not be reached; the only error a read may raise
    #[error("database unavailable: {0}")]
    Unavailable(String),

    #[error("database file {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error(transparent)]
    Malformed(#[from] MalformedDocument),

    #[error("document {0} not found")]
    NotFound(DocumentId),

    #[error("document {0} already exists")]
    Duplicate(DocumentId),

    #[error(transparent)]
    InvalidPatch(#[from] PatchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstract document store
pub trait AssetDatabase {
    /// All documents matching `query`, sorted and paged as requested.
    fn find(&self, query: &Query) -> DatabaseResult<Vec<Document>>;

    /// The first document matching `query`, if any.
    fn find_one(&self, query: &Query) -> DatabaseResult<Option<Document>> {
        let query = query.clone().limit(1);
        Ok(self.find(&query)?.into_iter().next())
    }

    /// Apply `patch` to a single document atomically.
    fn update(&self, id: &DocumentId, patch: &Patch) -> DatabaseResult<()>;

    /// Store a new document. An empty id is replaced by a generated one.
    fn insert(&self, document: Document) -> DatabaseResult<DocumentId>;
}

impl<T: AssetDatabase + ?Sized> AssetDatabase for &T {
    fn find(&self, query: &Query) -> DatabaseResult<Vec<Document>> {
        (**self).find(query)
    }

    fn find_one(&self, query: &Query) -> DatabaseResult<Option<Document>> {
        (**self).find_one(query)
    }

    fn update(&self, id: &DocumentId, patch: &Patch) -> DatabaseResult<()> {
        (**self).update(id, patch)
    }

    fn insert(&self, document: Document) -> DatabaseResult<DocumentId> {
        (**self).insert(document)
    }
}

impl<T: AssetDatabase + ?Sized> AssetDatabase for Arc<T> {
    fn find(&self, query: &Query) -> DatabaseResult<Vec<Document>> {
        (**self).find(query)
    }

    fn find_one(&self, query: &Query) -> DatabaseResult<Option<Document>> {
        (**self).find_one(query)
    }

    fn update(&self, id: &DocumentId, patch: &Patch) -> DatabaseResult<()> {
        (**self).update(id, patch)
    }

    fn insert(&self, document: Document) -> DatabaseResult<DocumentId> {
        (**self).insert(document)
    }
}
