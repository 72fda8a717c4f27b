//! In-memory document store

use std::sync::Mutex;

use super::{insert_into, patch_in_place};
use crate::domain::entities::{Document, Patch, Query};
use crate::domain::ports::{AssetDatabase, DatabaseError, DatabaseResult};
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Default)]
pub struct MemoryDatabase {
    docs: Mutex<Vec<Document>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(docs: Vec<Document>) -> Self {
        Self {
            docs: Mutex::new(docs),
        }
    }

    /// Snapshot of every stored document, in insertion order
    pub fn documents(&self) -> Vec<Document> {
        self.lock().map(|docs| docs.clone()).unwrap_or_default()
    }

    pub fn get(&self, id: &DocumentId) -> Option<Document> {
        self.lock()
            .ok()
            .and_then(|docs| docs.iter().find(|d| &d.id == id).cloned())
    }

    fn lock(&self) -> DatabaseResult<std::sync::MutexGuard<'_, Vec<Document>>> {
        self.docs
            .lock()
            .map_err(|_| DatabaseError::Unavailable("memory store poisoned".to_string()))
    }
}

impl AssetDatabase for MemoryDatabase {
    fn find(&self, query: &Query) -> DatabaseResult<Vec<Document>> {
        let docs = self.lock()?;
        Ok(query.run(docs.iter()))
    }

    fn update(&self, id: &DocumentId, patch: &Patch) -> DatabaseResult<()> {
        let mut docs = self.lock()?;
        patch_in_place(&mut docs, id, patch)
    }

    fn insert(&self, document: Document) -> DatabaseResult<DocumentId> {
        let mut docs = self.lock()?;
        insert_into(&mut docs, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DocumentType;
    use serde_json::json;

    #[test]
    fn update_patches_one_document() {
        let db = MemoryDatabase::with_documents(vec![
            Document::new("v1", DocumentType::Version, 1u32).with_parent("s"),
            Document::new("v2", DocumentType::Version, 2u32).with_parent("s"),
        ]);

        db.update(
            &DocumentId::from("v2"),
            &Patch::new().set("data.rigAutoUpdateFailed", json!(true)),
        )
        .unwrap();

        let v2 = db.get(&DocumentId::from("v2")).unwrap();
        assert_eq!(v2.data.get("rigAutoUpdateFailed"), Some(&json!(true)));
        assert!(db.get(&DocumentId::from("v1")).unwrap().data.is_empty());
    }

    #[test]
    fn update_of_missing_document_fails() {
        let db = MemoryDatabase::new();
        let err = db
            .update(&DocumentId::from("nope"), &Patch::new().set("data.x", json!(1)))
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[test]
    fn insert_generates_missing_ids_and_rejects_duplicates() {
        let db = MemoryDatabase::new();
        let id = db
            .insert(Document::new("", DocumentType::Asset, "hero"))
            .unwrap();
        assert_eq!(id.as_str().len(), 24);

        let again = db.insert(Document::new(id.as_str(), DocumentType::Asset, "hero"));
        assert!(matches!(again, Err(DatabaseError::Duplicate(_))));
    }

    #[test]
    fn find_applies_query() {
        let db = MemoryDatabase::with_documents(vec![
            Document::new("a", DocumentType::Asset, "hero"),
            Document::new("b", DocumentType::Asset, "villain"),
        ]);
        let found = db
            .find(&Query::of_type(DocumentType::Asset).with_name("villain"))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, DocumentId::from("b"));
    }
}
