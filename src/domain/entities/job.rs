//! Stale dependents, update jobs and the worker job descriptor

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{SourceLocator, VersionId};
use crate::error::{CascadeError, CascadeResult};

/// Dependents whose latest version references a superseded base version,
/// keyed by that latest version id and valued by the dependent subset name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaleDependents(BTreeMap<VersionId, String>);

impl StaleDependents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: VersionId, subset: impl Into<String>) {
        self.0.insert(version, subset.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, version: &VersionId) -> Option<&str> {
        self.0.get(version).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VersionId, &str)> {
        self.0.iter().map(|(v, s)| (v, s.as_str()))
    }

    pub fn subset_names(&self) -> Vec<&str> {
        self.0.values().map(String::as_str).collect()
    }
}

impl FromIterator<(VersionId, String)> for StaleDependents {
    fn from_iter<I: IntoIterator<Item = (VersionId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One source scene and the dependent subsets to republish from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source: SourceLocator,
    /// Sorted, without duplicates
    pub subsets: Vec<String>,
}

impl Job {
    pub fn publishes(&self, subset: &str) -> bool {
        self.subsets.iter().any(|s| s == subset)
    }
}

/// Jobs of one worker run, ordered by source locator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSet {
    jobs: Vec<Job>,
}

impl JobSet {
    /// Group `(source, subset)` pairs into one job per source.
    ///
    /// The result does not depend on the order of `pairs`.
    pub fn group(pairs: impl IntoIterator<Item = (SourceLocator, String)>) -> Self {
        let mut grouped: BTreeMap<SourceLocator, BTreeSet<String>> = BTreeMap::new();
        for (source, subset) in pairs {
            grouped.entry(source).or_default().insert(subset);
        }

        Self {
            jobs: grouped
                .into_iter()
                .map(|(source, subsets)| Job {
                    source,
                    subsets: subsets.into_iter().collect(),
                })
                .collect(),
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn into_jobs(self) -> Vec<Job> {
        self.jobs
    }
}

/// Payload handed from the trigger to the worker process
///
/// The worker re-derives source scenes from the dependent version ids, so the
/// parent never needs scene-loading logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobDescriptor {
    pub asset_name: String,
    #[serde(alias = "model_subset")]
    pub base_subset: String,
    #[serde(alias = "rig_versions")]
    pub dependents: StaleDependents,
}

const KEY_ASSET: &str = "asset_name";
const KEY_BASE_SUBSET: &str = "model_subset";
const KEY_DEPENDENTS: &str = "rig_versions";

impl JobDescriptor {
    pub fn new(
        asset_name: impl Into<String>,
        base_subset: impl Into<String>,
        dependents: StaleDependents,
    ) -> Self {
        Self {
            asset_name: asset_name.into(),
            base_subset: base_subset.into(),
            dependents,
        }
    }

    pub fn to_json(&self) -> CascadeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(payload: &str) -> CascadeResult<Self> {
        serde_json::from_str(payload).map_err(|e| CascadeError::InvalidDescriptor(e.to_string()))
    }

    /// Parse the positional `key=value` form:
    /// `asset_name=hero model_subset=modelDefault rig_versions={"<id>": "rigDefault"}`.
    ///
    /// Every key must appear exactly once; unknown keys are rejected.
    pub fn from_key_values<S: AsRef<str>>(args: &[S]) -> CascadeResult<Self> {
        let mut asset_name = None;
        let mut base_subset = None;
        let mut dependents = None;

        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                CascadeError::InvalidDescriptor(format!("expected key=value, got '{}'", arg))
            })?;

            let slot = match key {
                KEY_ASSET => &mut asset_name,
                KEY_BASE_SUBSET => &mut base_subset,
                KEY_DEPENDENTS => &mut dependents,
                other => {
                    return Err(CascadeError::InvalidDescriptor(format!(
                        "unknown argument '{}'",
                        other
                    )))
                }
            };
            if slot.replace(value.to_string()).is_some() {
                return Err(CascadeError::InvalidDescriptor(format!(
                    "argument '{}' given twice",
                    key
                )));
            }
        }

        let missing = |key: &str| CascadeError::InvalidDescriptor(format!("missing '{}'", key));
        let asset_name = asset_name.ok_or_else(|| missing(KEY_ASSET))?;
        let base_subset = base_subset.ok_or_else(|| missing(KEY_BASE_SUBSET))?;
        let dependents = dependents.ok_or_else(|| missing(KEY_DEPENDENTS))?;
        let dependents: StaleDependents = serde_json::from_str(&dependents).map_err(|e| {
            CascadeError::InvalidDescriptor(format!("{} is not a JSON object: {}", KEY_DEPENDENTS, e))
        })?;

        Ok(Self {
            asset_name,
            base_subset,
            dependents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(path: &str) -> SourceLocator {
        SourceLocator::normalized(path)
    }

    #[test]
    fn group_collapses_shared_sources() {
        let jobs = JobSet::group(vec![
            (loc("/p/rig.ma"), "rigB".to_string()),
            (loc("/p/rig.ma"), "rigA".to_string()),
            (loc("/p/proxy.ma"), "rigProxy".to_string()),
        ]);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs.jobs()[0].source, loc("/p/proxy.ma"));
        assert_eq!(jobs.jobs()[1].subsets, vec!["rigA", "rigB"]);
        assert!(jobs.jobs()[1].publishes("rigB"));
    }

    #[test]
    fn group_drops_duplicate_subsets() {
        let jobs = JobSet::group(vec![
            (loc("/p/rig.ma"), "rigA".to_string()),
            (loc("/p/rig.ma"), "rigA".to_string()),
        ]);
        assert_eq!(jobs.jobs()[0].subsets, vec!["rigA"]);
    }

    #[test]
    fn descriptor_accepts_legacy_field_names() {
        let json = r#"{"asset_name":"hero","model_subset":"modelDefault","rig_versions":{"r5":"rigDefault"}}"#;
        let descriptor = JobDescriptor::from_json(json).unwrap();
        assert_eq!(descriptor.base_subset, "modelDefault");
        assert_eq!(
            descriptor.dependents.get(&VersionId::new("r5")),
            Some("rigDefault")
        );
    }

    #[test]
    fn descriptor_rejects_unknown_fields() {
        let json = r#"{"asset_name":"hero","base_subset":"m","dependents":{},"extra":1}"#;
        assert!(JobDescriptor::from_json(json).is_err());
    }

    #[test]
    fn key_values_parse_json_with_equals_signs() {
        let descriptor = JobDescriptor::from_key_values(&[
            "asset_name=hero",
            "model_subset=modelDefault",
            r#"rig_versions={"r=1":"rigDefault"}"#,
        ])
        .unwrap();
        assert_eq!(descriptor.asset_name, "hero");
        assert_eq!(
            descriptor.dependents.get(&VersionId::new("r=1")),
            Some("rigDefault")
        );
    }

    #[test]
    fn key_values_reject_missing_and_duplicate_keys() {
        let err = JobDescriptor::from_key_values(&["asset_name=hero", "model_subset=m"])
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid job descriptor: missing 'rig_versions'");

        let err = JobDescriptor::from_key_values(&["asset_name=a", "asset_name=b"]).unwrap_err();
        assert!(err.to_string().contains("given twice"));
    }

    #[test]
    fn key_values_reject_unknown_keys() {
        let err = JobDescriptor::from_key_values(&["asset=hero"]).unwrap_err();
        assert!(err.to_string().contains("unknown argument 'asset'"));
    }
}
