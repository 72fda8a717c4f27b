//! Property tests for staleness resolution.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use rigcascade::domain::entities::{Document, DocumentType, DEPENDENCIES_KEY};
use rigcascade::domain::services::{Staleness, StalenessResolver, VersionGraph};
use rigcascade::domain::value_objects::VersionId;
use rigcascade::infrastructure::MemoryDatabase;

fn database(base_count: u32, rig_deps: &BTreeSet<u32>) -> MemoryDatabase {
    let mut docs = vec![
        Document::new("a1", DocumentType::Asset, "hero"),
        Document::new("sm", DocumentType::Subset, "modelDefault").with_parent("a1"),
        Document::new("sr", DocumentType::Subset, "rigDefault").with_parent("a1"),
    ];
    for index in 1..=base_count {
        docs.push(Document::new(format!("m{}", index).as_str(), DocumentType::Version, index).with_parent("sm"));
    }
    let deps: Map<String, Value> = rig_deps
        .iter()
        .map(|i| (format!("m{}", i), json!({})))
        .collect();
    docs.push(
        Document::new("r1", DocumentType::Version, 1u32)
            .with_parent("sr")
            .with_data(DEPENDENCIES_KEY, Value::Object(deps)),
    );
    MemoryDatabase::with_documents(docs)
}

fn resolve(db: &MemoryDatabase) -> Staleness {
    let graph = VersionGraph::new(db);
    let asset = graph.asset("hero").unwrap().unwrap();
    let subset = graph.subset(&asset, "modelDefault").unwrap().unwrap();
    let latest = graph.latest_version(&subset).unwrap().unwrap();
    StalenessResolver::default()
        .resolve(&graph, &asset, &subset, &latest)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a dependent is stale iff it depends on a superseded base version.
    #[test]
    fn property_stale_iff_depends_on_previous_version(
        base_count in 2u32..8,
        rig_deps in proptest::collection::btree_set(1u32..10, 0..4),
    ) {
        let db = database(base_count, &rig_deps);
        let expected = rig_deps.iter().any(|i| *i < base_count);

        let dependents = resolve(&db).into_dependents();

        prop_assert_eq!(dependents.get(&VersionId::from("r1")).is_some(), expected);
        prop_assert!(dependents.len() <= 1);
    }

    /// PROPERTY: version 1 of a subset never makes anything stale.
    #[test]
    fn property_first_version_is_never_stale(
        rig_deps in proptest::collection::btree_set(1u32..4, 0..3),
    ) {
        let db = database(1, &rig_deps);
        prop_assert_eq!(resolve(&db), Staleness::FirstVersion);
    }
}
