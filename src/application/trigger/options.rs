//! Trigger Options

use crate::application::republish::DEFAULT_TASK;
use crate::domain::services::DEFAULT_DEPENDENT_PREFIX;
use crate::domain::value_objects::VersionId;

/// Task option that enables automated dependent updates on an asset
pub const AUTO_UPDATE_OPTION: &str = "autoModelUpdate";

/// Options for the trigger use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerOptions {
    pub asset: String,
    /// The subset that was just published
    pub subset: String,
    /// Published version; the latest one when unset
    pub version: Option<VersionId>,
    /// Name prefix of dependent subsets
    pub dependent_prefix: String,
    /// Task whose options hold the auto-update switch
    pub task: String,
    /// Skip everything unless the asset enables auto updates for `task`
    pub require_task_option: bool,
}

impl TriggerOptions {
    pub fn new(asset: impl Into<String>, subset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            subset: subset.into(),
            version: None,
            dependent_prefix: DEFAULT_DEPENDENT_PREFIX.to_string(),
            task: DEFAULT_TASK.to_string(),
            require_task_option: true,
        }
    }

    pub fn with_version(mut self, version: impl Into<VersionId>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_dependent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dependent_prefix = prefix.into();
        self
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = task.into();
        self
    }

    pub fn with_require_task_option(mut self, required: bool) -> Self {
        self.require_task_option = required;
        self
    }
}
