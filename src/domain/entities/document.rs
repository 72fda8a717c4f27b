//! Database documents, queries and patches
//!
//! The asset database is a document store. Documents of three types form a
//! tree: `asset` → `subset` → `version`, linked through `parent`. Everything
//! not structural lives in the free-form `data` map.
//!
//! Query matching and patch application are pure so that every store
//! implementation shares the same semantics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::value_objects::DocumentId;

/// Kind of a database document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Asset,
    Subset,
    Version,
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Asset => write!(f, "asset"),
            DocumentType::Subset => write!(f, "subset"),
            DocumentType::Version => write!(f, "version"),
        }
    }
}

/// Document name: versions are numbered, everything else is labelled
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentName {
    Index(u32),
    Label(String),
}

impl DocumentName {
    pub fn as_index(&self) -> Option<u32> {
        match self {
            DocumentName::Index(i) => Some(*i),
            DocumentName::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            DocumentName::Label(s) => Some(s),
            DocumentName::Index(_) => None,
        }
    }
}

impl From<u32> for DocumentName {
    fn from(index: u32) -> Self {
        DocumentName::Index(index)
    }
}

impl From<&str> for DocumentName {
    fn from(label: &str) -> Self {
        DocumentName::Label(label.to_string())
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub name: DocumentName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<DocumentId>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Document {
    pub fn new(
        id: impl Into<DocumentId>,
        doc_type: DocumentType,
        name: impl Into<DocumentName>,
    ) -> Self {
        Self {
            id: id.into(),
            doc_type,
            name: name.into(),
            parent: None,
            data: Map::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<DocumentId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_data(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    /// Look up a dotted path inside `data`, e.g. `taskOptions.rigging`.
    pub fn data_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut value = self.data.get(first)?;
        for segment in segments {
            value = value.as_object()?.get(segment)?;
        }
        Some(value)
    }
}

/// Name predicate of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
    Exact(DocumentName),
    /// Case-sensitive prefix match on labelled names
    Prefix(String),
}

impl NameFilter {
    fn matches(&self, name: &DocumentName) -> bool {
        match self {
            NameFilter::Exact(expected) => expected == name,
            NameFilter::Prefix(prefix) => name
                .as_label()
                .map(|label| label.starts_with(prefix.as_str()))
                .unwrap_or(false),
        }
    }
}

/// Sort order, always by document name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NameAscending,
    NameDescending,
}

/// A document query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub id: Option<DocumentId>,
    pub doc_type: Option<DocumentType>,
    pub parent: Option<DocumentId>,
    pub name: Option<NameFilter>,
    pub sort: Option<SortOrder>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl Query {
    pub fn of_type(doc_type: DocumentType) -> Self {
        Self {
            doc_type: Some(doc_type),
            ..Self::default()
        }
    }

    pub fn by_id(id: &DocumentId) -> Self {
        Self {
            id: Some(id.clone()),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: &DocumentId) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn with_name(mut self, name: impl Into<DocumentName>) -> Self {
        self.name = Some(NameFilter::Exact(name.into()));
        self
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name = Some(NameFilter::Prefix(prefix.into()));
        self
    }

    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    pub fn skip(mut self, count: usize) -> Self {
        self.skip = count;
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }

    /// Whether a single document satisfies the filters (ignores paging).
    pub fn matches(&self, doc: &Document) -> bool {
        self.id.as_ref().map_or(true, |id| &doc.id == id)
            && self.doc_type.map_or(true, |t| doc.doc_type == t)
            && self
                .parent
                .as_ref()
                .map_or(true, |p| doc.parent.as_ref() == Some(p))
            && self.name.as_ref().map_or(true, |n| n.matches(&doc.name))
    }

    /// Filter, sort and page a document collection.
    ///
    /// Ties in the sort key keep their storage order.
    pub fn run<'a>(&self, docs: impl IntoIterator<Item = &'a Document>) -> Vec<Document> {
        let mut matched: Vec<&Document> = docs.into_iter().filter(|d| self.matches(d)).collect();

        match self.sort {
            Some(SortOrder::NameAscending) => matched.sort_by(|a, b| a.name.cmp(&b.name)),
            Some(SortOrder::NameDescending) => matched.sort_by(|a, b| b.name.cmp(&a.name)),
            None => {}
        }

        matched
            .into_iter()
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

/// Errors raised when a patch cannot be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("patch path '{0}' must start with 'data.'")]
    OutsideData(String),

    #[error("patch path '{path}' crosses non-object value at '{segment}'")]
    NotAnObject { path: String, segment: String },
}

/// A set of `data.*` field assignments
///
/// Only the free-form `data` map may be patched; ids, names, types and
/// parents are immutable once stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    sets: Vec<(String, Value)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` at a dotted path such as `data.rigAutoUpdateFailed`.
    pub fn set(mut self, path: impl Into<String>, value: Value) -> Self {
        self.sets.push((path.into(), value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Apply every assignment, creating intermediate objects as needed.
    ///
    /// Validation happens before any write, so a failed patch leaves the
    /// document untouched.
    pub fn apply(&self, doc: &mut Document) -> Result<(), PatchError> {
        let mut staged = doc.data.clone();

        for (path, value) in &self.sets {
            let relative = path
                .strip_prefix("data.")
                .filter(|rest| !rest.is_empty())
                .ok_or_else(|| PatchError::OutsideData(path.clone()))?;

            let segments: Vec<&str> = relative.split('.').collect();
            let (last, parents) = segments
                .split_last()
                .ok_or_else(|| PatchError::OutsideData(path.clone()))?;

            let mut target = &mut staged;
            for segment in parents {
                let entry = target
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                target = entry.as_object_mut().ok_or_else(|| PatchError::NotAnObject {
                    path: path.clone(),
                    segment: segment.to_string(),
                })?;
            }
            target.insert(last.to_string(), value.clone());
        }

        doc.data = staged;
        Ok(())
    }
}

/// A document that does not decode into the expected entity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("document {id} is not a valid {expected}: {reason}")]
pub struct MalformedDocument {
    pub id: DocumentId,
    pub expected: DocumentType,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn version(id: &str, parent: &str, index: u32) -> Document {
        Document::new(id, DocumentType::Version, index).with_parent(parent)
    }

    #[test]
    fn document_round_trips_mongo_style_keys() {
        let raw = json!({
            "_id": "v1",
            "type": "version",
            "name": 3,
            "parent": "s1",
            "data": {"source": "{root}/rig.ma"}
        });
        let doc: Document = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.name, DocumentName::Index(3));
        assert_eq!(doc.parent, Some(DocumentId::new("s1")));
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn data_path_walks_nested_objects() {
        let doc = Document::new("a", DocumentType::Asset, "hero").with_data(
            "taskOptions",
            json!({"rigging": {"autoModelUpdate": {"value": true}}}),
        );
        assert_eq!(
            doc.data_path("taskOptions.rigging.autoModelUpdate.value"),
            Some(&json!(true))
        );
        assert_eq!(doc.data_path("taskOptions.lookdev"), None);
    }

    #[test]
    fn query_sorts_descending_and_skips_latest() {
        let docs = vec![
            version("v1", "s", 1),
            version("v3", "s", 3),
            version("v2", "s", 2),
            version("x9", "other", 9),
        ];
        let query = Query::of_type(DocumentType::Version)
            .with_parent(&DocumentId::new("s"))
            .sorted(SortOrder::NameDescending)
            .skip(1);

        let ids: Vec<_> = query.run(&docs).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![DocumentId::new("v2"), DocumentId::new("v1")]);
    }

    #[test]
    fn prefix_filter_is_case_sensitive() {
        let docs = vec![
            Document::new("1", DocumentType::Subset, "rigDefault"),
            Document::new("2", DocumentType::Subset, "RigProxy"),
            Document::new("3", DocumentType::Subset, "modelDefault"),
        ];
        let found = Query::of_type(DocumentType::Subset)
            .with_name_prefix("rig")
            .run(&docs);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, DocumentId::new("1"));
    }

    #[test]
    fn patch_sets_nested_data_fields() {
        let mut doc = version("v", "s", 1);
        Patch::new()
            .set("data.rigAutoUpdateFailed", json!(true))
            .set("data.audit.by", json!("rigcascade"))
            .apply(&mut doc)
            .unwrap();
        assert_eq!(doc.data["rigAutoUpdateFailed"], json!(true));
        assert_eq!(doc.data_path("audit.by"), Some(&json!("rigcascade")));
    }

    #[test]
    fn patch_rejects_structural_fields() {
        let mut doc = version("v", "s", 1);
        let err = Patch::new()
            .set("parent", json!("elsewhere"))
            .apply(&mut doc)
            .unwrap_err();
        assert_eq!(err, PatchError::OutsideData("parent".to_string()));
        assert_eq!(doc.parent, Some(DocumentId::new("s")));
    }

    #[test]
    fn failed_patch_leaves_document_untouched() {
        let mut doc = version("v", "s", 1).with_data("comment", json!("hi"));
        let err = Patch::new()
            .set("data.flag", json!(true))
            .set("data.comment.nested", json!(1))
            .apply(&mut doc)
            .unwrap_err();
        assert!(matches!(err, PatchError::NotAnObject { .. }));
        assert!(!doc.data.contains_key("flag"));
    }
}
