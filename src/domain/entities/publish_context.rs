//! Publish context entity
//!
//! A publish context is built by the collect stage of one job and carried
//! through validate and extract. After every job extracted, the whole batch
//! of contexts is handed to integration.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::value_objects::VersionId;

/// Stage of the external publish pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStage {
    Collect,
    Validate,
    Extract,
    Integrate,
}

impl std::fmt::Display for PublishStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PublishStage::Collect => "collect",
            PublishStage::Validate => "validate",
            PublishStage::Extract => "extract",
            PublishStage::Integrate => "integrate",
        };
        f.write_str(name)
    }
}

/// Where and as whom a context is collected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContext {
    pub asset: String,
    pub task: String,
    pub scene: PathBuf,
}

/// A publishable instance inside a context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishInstance {
    /// Stable instance id; may be missing on instances authored by old tools
    pub id: Option<String>,
    pub subset: String,
    pub family: String,
    pub active: bool,
    /// Versions this instance was built against
    #[serde(default)]
    pub dependencies: BTreeSet<VersionId>,
    /// Files produced by extraction
    #[serde(default)]
    pub artifacts: Vec<PathBuf>,
}

impl PublishInstance {
    pub fn new(subset: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            id: None,
            subset: subset.into(),
            family: family.into(),
            active: true,
            dependencies: BTreeSet::new(),
            artifacts: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Outcome of one stage for one instance (or for the whole context)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: PublishStage,
    pub instance: Option<String>,
    pub success: bool,
    pub message: Option<String>,
}

impl StageResult {
    pub fn passed(stage: PublishStage, instance: Option<&str>) -> Self {
        Self {
            stage,
            instance: instance.map(str::to_string),
            success: true,
            message: None,
        }
    }

    pub fn failed(stage: PublishStage, instance: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            stage,
            instance: instance.map(str::to_string),
            success: false,
            message: Some(message.into()),
        }
    }
}

impl std::fmt::Display for StageResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stage)?;
        if let Some(instance) = &self.instance {
            write!(f, " [{}]", instance)?;
        }
        match (&self.message, self.success) {
            (Some(message), _) => write!(f, ": {}", message),
            (None, true) => write!(f, ": ok"),
            (None, false) => write!(f, ": failed"),
        }
    }
}

/// Per-job aggregate of instances and stage results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishContext {
    pub source: SourceContext,
    pub comment: Option<String>,
    pub instances: Vec<PublishInstance>,
    pub results: Vec<StageResult>,
    /// Free-form data shared between stages
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl PublishContext {
    pub fn new(source: SourceContext) -> Self {
        Self {
            source,
            comment: None,
            instances: Vec::new(),
            results: Vec::new(),
            data: Map::new(),
        }
    }

    pub fn record(&mut self, result: StageResult) {
        self.results.push(result);
    }

    pub fn active_instances(&self) -> impl Iterator<Item = &PublishInstance> {
        self.instances.iter().filter(|i| i.active)
    }

    /// True when no recorded result reports a failure.
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StageResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PublishContext {
        PublishContext::new(SourceContext {
            asset: "hero".to_string(),
            task: "rigging".to_string(),
            scene: PathBuf::from("/p/rig.ma"),
        })
    }

    #[test]
    fn empty_context_counts_as_success() {
        assert!(context().all_succeeded());
    }

    #[test]
    fn one_failed_result_fails_the_context() {
        let mut ctx = context();
        ctx.record(StageResult::passed(PublishStage::Validate, Some("rigA")));
        ctx.record(StageResult::failed(
            PublishStage::Extract,
            Some("rigB"),
            "disk full",
        ));
        assert!(!ctx.all_succeeded());
        assert_eq!(ctx.failures().count(), 1);
    }

    #[test]
    fn only_active_instances_are_listed() {
        let mut ctx = context();
        ctx.instances.push(PublishInstance::new("rigA", "rig"));
        ctx.instances.push(PublishInstance::new("rigB", "rig").inactive());
        let active: Vec<_> = ctx.active_instances().map(|i| i.subset.as_str()).collect();
        assert_eq!(active, vec!["rigA"]);
    }

    #[test]
    fn stage_result_display() {
        let result = StageResult::failed(PublishStage::Extract, Some("rigB"), "disk full");
        assert_eq!(result.to_string(), "extract [rigB]: disk full");
    }
}
