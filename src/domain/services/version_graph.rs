//! Version graph reader
//!
//! Read-only queries over the asset/subset/version tree. Absent documents
//! come back as `None` or empty collections; only storage failures are
//! errors.

use std::collections::BTreeSet;

use crate::domain::entities::{
    Asset, Document, DocumentType, MalformedDocument, Query, SortOrder, Subset, Version,
};
use crate::domain::ports::{AssetDatabase, DatabaseError, DatabaseResult};
use crate::domain::value_objects::VersionId;

/// Typed, read-only view of the version history
pub struct VersionGraph<'a, D: AssetDatabase + ?Sized> {
    db: &'a D,
}

impl<'a, D: AssetDatabase + ?Sized> VersionGraph<'a, D> {
    pub fn new(db: &'a D) -> Self {
        Self { db }
    }

    pub fn asset(&self, name: &str) -> DatabaseResult<Option<Asset>> {
        let query = Query::of_type(DocumentType::Asset).with_name(name);
        decode_one(self.db.find_one(&query)?)
    }

    pub fn subset(&self, asset: &Asset, name: &str) -> DatabaseResult<Option<Subset>> {
        let query = Query::of_type(DocumentType::Subset)
            .with_parent(&asset.id)
            .with_name(name);
        decode_one(self.db.find_one(&query)?)
    }

    pub fn version(&self, id: &VersionId) -> DatabaseResult<Option<Version>> {
        let query = Query::by_id(id);
        match self.db.find_one(&query)? {
            Some(doc) if doc.doc_type == DocumentType::Version => decode_one(Some(doc)),
            _ => Ok(None),
        }
    }

    /// Highest-numbered version of `subset`.
    pub fn latest_version(&self, subset: &Subset) -> DatabaseResult<Option<Version>> {
        let query = Query::of_type(DocumentType::Version)
            .with_parent(&subset.id)
            .sorted(SortOrder::NameDescending);
        decode_one(self.db.find_one(&query)?)
    }

    /// Ids of every version of `subset` except the most recent one, newest
    /// first.
    pub fn versions_before(&self, subset: &Subset) -> DatabaseResult<Vec<VersionId>> {
        let query = Query::of_type(DocumentType::Version)
            .with_parent(&subset.id)
            .sorted(SortOrder::NameDescending)
            .skip(1);
        Ok(self.db.find(&query)?.into_iter().map(|d| d.id).collect())
    }

    /// Subsets of `asset` whose name starts with `prefix`, ordered by name.
    pub fn dependency_subsets(&self, asset: &Asset, prefix: &str) -> DatabaseResult<Vec<Subset>> {
        let query = Query::of_type(DocumentType::Subset)
            .with_parent(&asset.id)
            .with_name_prefix(prefix)
            .sorted(SortOrder::NameAscending);
        self.db
            .find(&query)?
            .iter()
            .map(|doc| Subset::try_from(doc).map_err(DatabaseError::from))
            .collect()
    }

    pub fn dependencies_of(&self, version: &Version) -> BTreeSet<VersionId> {
        version.dependencies.clone()
    }
}

fn decode_one<T>(doc: Option<Document>) -> DatabaseResult<Option<T>>
where
    T: for<'d> TryFrom<&'d Document, Error = MalformedDocument>,
{
    match doc {
        Some(doc) => Ok(Some(T::try_from(&doc)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DEPENDENCIES_KEY;
    use crate::domain::value_objects::DocumentId;
    use crate::infrastructure::MemoryDatabase;
    use serde_json::json;

    fn fixture() -> MemoryDatabase {
        MemoryDatabase::with_documents(vec![
            Document::new("hero", DocumentType::Asset, "hero"),
            Document::new("model", DocumentType::Subset, "modelDefault").with_parent("hero"),
            Document::new("rigB", DocumentType::Subset, "rigProxy").with_parent("hero"),
            Document::new("rigA", DocumentType::Subset, "rigDefault").with_parent("hero"),
            Document::new("m1", DocumentType::Version, 1u32).with_parent("model"),
            Document::new("m3", DocumentType::Version, 3u32).with_parent("model"),
            Document::new("m2", DocumentType::Version, 2u32).with_parent("model"),
            Document::new("r1", DocumentType::Version, 1u32)
                .with_parent("rigA")
                .with_data(DEPENDENCIES_KEY, json!({"m2": {}})),
        ])
    }

    #[test]
    fn latest_version_is_highest_number() {
        let db = fixture();
        let graph = VersionGraph::new(&db);
        let asset = graph.asset("hero").unwrap().unwrap();
        let model = graph.subset(&asset, "modelDefault").unwrap().unwrap();
        let latest = graph.latest_version(&model).unwrap().unwrap();
        assert_eq!(latest.id, DocumentId::new("m3"));
    }

    #[test]
    fn versions_before_drops_latest_and_sorts_descending() {
        let db = fixture();
        let graph = VersionGraph::new(&db);
        let asset = graph.asset("hero").unwrap().unwrap();
        let model = graph.subset(&asset, "modelDefault").unwrap().unwrap();
        assert_eq!(
            graph.versions_before(&model).unwrap(),
            vec![DocumentId::new("m2"), DocumentId::new("m1")]
        );
    }

    #[test]
    fn dependency_subsets_match_prefix_in_name_order() {
        let db = fixture();
        let graph = VersionGraph::new(&db);
        let asset = graph.asset("hero").unwrap().unwrap();
        let names: Vec<_> = graph
            .dependency_subsets(&asset, "rig")
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["rigDefault", "rigProxy"]);
    }

    #[test]
    fn missing_documents_are_absent_not_errors() {
        let db = fixture();
        let graph = VersionGraph::new(&db);
        assert!(graph.asset("villain").unwrap().is_none());
        assert!(graph.version(&DocumentId::new("nope")).unwrap().is_none());
        // an id that points at a subset is not a version
        assert!(graph.version(&DocumentId::new("rigA")).unwrap().is_none());

        let asset = graph.asset("hero").unwrap().unwrap();
        let proxy = graph.subset(&asset, "rigProxy").unwrap().unwrap();
        assert!(graph.latest_version(&proxy).unwrap().is_none());
        assert!(graph.versions_before(&proxy).unwrap().is_empty());
    }

    #[test]
    fn storage_failure_propagates() {
        struct Offline;
        impl AssetDatabase for Offline {
            fn find(&self, _query: &Query) -> DatabaseResult<Vec<Document>> {
                Err(DatabaseError::Unavailable("connection refused".to_string()))
            }
            fn update(
                &self,
                _id: &DocumentId,
                _patch: &crate::domain::entities::Patch,
            ) -> DatabaseResult<()> {
                unreachable!()
            }
            fn insert(&self, _document: Document) -> DatabaseResult<DocumentId> {
                unreachable!()
            }
        }

        let graph = VersionGraph::new(&Offline);
        assert!(matches!(
            graph.asset("hero"),
            Err(DatabaseError::Unavailable(_))
        ));
    }
}
