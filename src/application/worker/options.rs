//! Worker Options

use std::path::PathBuf;

use crate::application::republish::RepublishSettings;
use crate::domain::policies::INSTANCE_ID_REPAIR;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOptions {
    /// Substituted for `{root}` in version sources
    pub project_root: PathBuf,
    pub republish: RepublishSettings,
    /// Repair capability ids run between collect and validate
    pub repairs: Vec<String>,
}

impl WorkerOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            republish: RepublishSettings::default(),
            repairs: vec![INSTANCE_ID_REPAIR.to_string()],
        }
    }

    pub fn with_republish(mut self, settings: RepublishSettings) -> Self {
        self.republish = settings;
        self
    }

    pub fn with_repairs(mut self, repairs: Vec<String>) -> Self {
        self.repairs = repairs;
        self
    }
}
