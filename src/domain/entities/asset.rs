//! Asset, Subset and Version entities
//!
//! Typed views over database documents. Decoding is strict about the
//! structure the orchestrator relies on and lenient about everything else:
//! a version published before dependency tracking existed simply has no
//! dependencies.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::document::{Document, DocumentType, MalformedDocument};
use crate::domain::value_objects::{DocumentId, VersionId};

/// Data key holding a version's dependency mapping
pub const DEPENDENCIES_KEY: &str = "dependencies";
/// Data key holding a version's source scene locator
pub const SOURCE_KEY: &str = "source";
/// Data key of the failure annotation set after a failed auto update
pub const FAILURE_FLAG_KEY: &str = "rigAutoUpdateFailed";

/// Data key of per-task options on an asset
pub const TASK_OPTIONS_KEY: &str = "taskOptions";

/// A named production entity (e.g. a character)
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: DocumentId,
    pub name: String,
    pub data: Map<String, Value>,
}

/// A named output lineage of an asset
#[derive(Debug, Clone, PartialEq)]
pub struct Subset {
    pub id: DocumentId,
    pub name: String,
    pub asset: DocumentId,
    pub data: Map<String, Value>,
}

/// An immutable, numbered publish of a subset
#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    pub id: VersionId,
    pub index: u32,
    pub subset: DocumentId,
    pub dependencies: BTreeSet<VersionId>,
    pub source: Option<String>,
    pub auto_update_failed: bool,
}

impl Asset {
    /// `data.taskOptions.<task>.<option>.value`, if set
    pub fn task_option(&self, task: &str, option: &str) -> Option<&Value> {
        self.data
            .get(TASK_OPTIONS_KEY)?
            .get(task)?
            .get(option)?
            .get("value")
    }
}

impl Version {
    pub fn is_first(&self) -> bool {
        self.index == 1
    }
}

fn malformed(doc: &Document, expected: DocumentType, reason: &str) -> MalformedDocument {
    MalformedDocument {
        id: doc.id.clone(),
        expected,
        reason: reason.to_string(),
    }
}

fn expect_type(doc: &Document, expected: DocumentType) -> Result<(), MalformedDocument> {
    if doc.doc_type == expected {
        Ok(())
    } else {
        Err(malformed(
            doc,
            expected,
            &format!("document type is {}", doc.doc_type),
        ))
    }
}

impl TryFrom<&Document> for Asset {
    type Error = MalformedDocument;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        expect_type(doc, DocumentType::Asset)?;
        let name = doc
            .name
            .as_label()
            .ok_or_else(|| malformed(doc, DocumentType::Asset, "name is not a string"))?;
        Ok(Self {
            id: doc.id.clone(),
            name: name.to_string(),
            data: doc.data.clone(),
        })
    }
}

impl TryFrom<&Document> for Subset {
    type Error = MalformedDocument;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        expect_type(doc, DocumentType::Subset)?;
        let name = doc
            .name
            .as_label()
            .ok_or_else(|| malformed(doc, DocumentType::Subset, "name is not a string"))?;
        let asset = doc
            .parent
            .clone()
            .ok_or_else(|| malformed(doc, DocumentType::Subset, "missing parent asset"))?;
        Ok(Self {
            id: doc.id.clone(),
            name: name.to_string(),
            asset,
            data: doc.data.clone(),
        })
    }
}

impl TryFrom<&Document> for Version {
    type Error = MalformedDocument;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        expect_type(doc, DocumentType::Version)?;
        let index = doc
            .name
            .as_index()
            .filter(|i| *i >= 1)
            .ok_or_else(|| malformed(doc, DocumentType::Version, "name is not a version number"))?;
        let subset = doc
            .parent
            .clone()
            .ok_or_else(|| malformed(doc, DocumentType::Version, "missing parent subset"))?;

        let dependencies = match doc.data.get(DEPENDENCIES_KEY) {
            None | Some(Value::Null) => BTreeSet::new(),
            Some(Value::Object(map)) => map.keys().map(|k| VersionId::new(k.as_str())).collect(),
            Some(_) => {
                return Err(malformed(
                    doc,
                    DocumentType::Version,
                    "dependencies is not an object",
                ))
            }
        };

        let source = doc
            .data
            .get(SOURCE_KEY)
            .and_then(Value::as_str)
            .map(str::to_string);

        let auto_update_failed = doc
            .data
            .get(FAILURE_FLAG_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Ok(Self {
            id: doc.id.clone(),
            index,
            subset,
            dependencies,
            source,
            auto_update_failed,
        })
    }
}
