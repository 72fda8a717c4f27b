//! Update job planning
//!
//! Several dependent subsets are often authored in one scene file. Opening
//! the same scene twice in one worker session would clobber the first set of
//! edits, so dependents are grouped into one job per source scene.

use std::path::{Path, PathBuf};

use crate::domain::entities::{JobSet, StaleDependents};
use crate::domain::ports::AssetDatabase;
use crate::domain::services::VersionGraph;
use crate::domain::value_objects::SourceLocator;
use crate::error::{CascadeError, CascadeResult};

/// Groups stale dependents by their source scene
#[derive(Debug, Clone)]
pub struct JobPlanner {
    project_root: PathBuf,
}

impl JobPlanner {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Look up every dependent version's source and group by it.
    pub fn plan<D: AssetDatabase + ?Sized>(
        &self,
        graph: &VersionGraph<'_, D>,
        dependents: &StaleDependents,
    ) -> CascadeResult<JobSet> {
        let mut pairs = Vec::with_capacity(dependents.len());

        for (version_id, subset) in dependents.iter() {
            let version = graph
                .version(version_id)?
                .ok_or_else(|| CascadeError::VersionNotFound(version_id.clone()))?;
            let template = version
                .source
                .as_deref()
                .ok_or_else(|| CascadeError::MissingSource(version_id.clone()))?;
            let source = SourceLocator::resolve(template, &self.project_root)?;

            tracing::debug!(subset, source = %source, "planned dependent");
            pairs.push((source, subset.to_string()));
        }

        Ok(JobSet::group(pairs))
    }
}
