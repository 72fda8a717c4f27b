//! Republish Options

use crate::domain::value_objects::{VersionId, DEFAULT_REVISION_DIR};

/// Comment attached to every automated republish
pub const DEFAULT_COMMENT: &str = "Auto update model to latest version.";

/// Task the dependents are republished under
pub const DEFAULT_TASK: &str = "rigging";

/// What every job retargets to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepublishTarget {
    pub asset: String,
    /// Subset whose references get updated
    pub base_subset: String,
    /// Latest version of the base subset
    pub base_version: VersionId,
}

/// Settings shared by every job of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepublishSettings {
    pub task: String,
    pub comment: String,
    /// Directory, next to each source scene, that receives the revisions
    pub revision_dir: String,
}

impl Default for RepublishSettings {
    fn default() -> Self {
        Self {
            task: DEFAULT_TASK.to_string(),
            comment: DEFAULT_COMMENT.to_string(),
            revision_dir: DEFAULT_REVISION_DIR.to_string(),
        }
    }
}

impl RepublishSettings {
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = task.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_revision_dir(mut self, dir: impl Into<String>) -> Self {
        self.revision_dir = dir.into();
        self
    }
}
