//! AssetDatabase implementations
//!
//! - `MemoryDatabase` - In-process store for tests and embedding
//! - `JsonDocumentStore` - A JSON array of documents on disk

mod json_store;
mod memory;

pub use json_store::JsonDocumentStore;
pub use memory::MemoryDatabase;

use crate::domain::entities::{Document, Patch};
use crate::domain::ports::{DatabaseError, DatabaseResult};
use crate::domain::value_objects::DocumentId;

/// Apply `patch` to the document with `id` inside `docs`.
fn patch_in_place(docs: &mut [Document], id: &DocumentId, patch: &Patch) -> DatabaseResult<()> {
    let doc = docs
        .iter_mut()
        .find(|d| &d.id == id)
        .ok_or_else(|| DatabaseError::NotFound(id.clone()))?;
    patch.apply(doc)?;
    Ok(())
}

/// Push `document`, generating an id when it has none.
fn insert_into(docs: &mut Vec<Document>, mut document: Document) -> DatabaseResult<DocumentId> {
    if document.id.is_empty() {
        document.id = DocumentId::generate();
    }
    if docs.iter().any(|d| d.id == document.id) {
        return Err(DatabaseError::Duplicate(document.id));
    }
    let id = document.id.clone();
    docs.push(document);
    Ok(id)
}
