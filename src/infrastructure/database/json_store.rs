//! JSON Document Store
//!
//! Persists the asset database as a single JSON array of documents. Writers
//! take an exclusive lock on a sibling `.lock` file, re-read the array,
//! apply the change and replace the file atomically. Readers never lock.

use std::fs;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::{insert_into, patch_in_place};
use crate::domain::entities::{Document, Patch, Query};
use crate::domain::ports::{AssetDatabase, DatabaseError, DatabaseResult};
use crate::domain::value_objects::DocumentId;
use crate::infrastructure::atomic::write_atomic;

#[derive(Debug, Clone)]
pub struct JsonDocumentStore {
    path: PathBuf,
}

impl JsonDocumentStore {
    /// Open an existing store. The file is not read until the first query.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store holding `docs`, replacing any existing file.
    pub fn create(path: impl Into<PathBuf>, docs: &[Document]) -> DatabaseResult<Self> {
        let store = Self::open(path);
        store.with_write_lock(|existing| {
            existing.clear();
            existing.extend_from_slice(docs);
            Ok(())
        })?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn load(&self) -> DatabaseResult<Vec<Document>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            DatabaseError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| DatabaseError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn save(&self, docs: &[Document]) -> DatabaseResult<()> {
        let content = serde_json::to_vec_pretty(docs).map_err(|e| DatabaseError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        write_atomic(&self.path, &content)?;
        Ok(())
    }

    fn with_write_lock<T>(
        &self,
        change: impl FnOnce(&mut Vec<Document>) -> DatabaseResult<T>,
    ) -> DatabaseResult<T> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let lock_file = fs::File::create(&lock_path)?;
        lock_file.lock_exclusive()?;

        let result = self.load_for_write().and_then(|mut docs| {
            let value = change(&mut docs)?;
            self.save(&docs)?;
            Ok(value)
        });

        let _ = lock_file.unlock();
        result
    }

    fn load_for_write(&self) -> DatabaseResult<Vec<Document>> {
        if self.path.exists() {
            self.load()
        } else {
            Ok(Vec::new())
        }
    }
}

impl AssetDatabase for JsonDocumentStore {
    fn find(&self, query: &Query) -> DatabaseResult<Vec<Document>> {
        let docs = self.load()?;
        Ok(query.run(docs.iter()))
    }

    fn update(&self, id: &DocumentId, patch: &Patch) -> DatabaseResult<()> {
        if !self.path.exists() {
            return Err(DatabaseError::Unavailable(format!(
                "{} does not exist",
                self.path.display()
            )));
        }
        self.with_write_lock(|docs| patch_in_place(docs, id, patch))
    }

    fn insert(&self, document: Document) -> DatabaseResult<DocumentId> {
        self.with_write_lock(|docs| insert_into(docs, document))
    }
}
