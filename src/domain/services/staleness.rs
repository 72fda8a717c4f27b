//! Staleness resolution
//!
//! A dependent subset is stale when its latest version was built against a
//! base version that has just been superseded. Only the latest version of each
//! dependent matters: older dependent versions are history, not targets.

use crate::domain::entities::{Asset, StaleDependents, Subset, Version};
use crate::domain::ports::{AssetDatabase, DatabaseResult};
use crate::domain::services::VersionGraph;

/// Default name prefix of dependent (rig) subsets
pub const DEFAULT_DEPENDENT_PREFIX: &str = "rig";

/// Outcome of a staleness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// The base version is #1, so nothing can reference an older copy
    FirstVersion,
    /// The base subset has no earlier versions left (they were deleted)
    NoPreviousVersions,
    /// Resolution ran; the mapping may be empty
    Resolved(StaleDependents),
}

impl Staleness {
    pub fn into_dependents(self) -> StaleDependents {
        match self {
            Staleness::Resolved(dependents) => dependents,
            _ => StaleDependents::new(),
        }
    }

    pub fn dependents(&self) -> Option<&StaleDependents> {
        match self {
            Staleness::Resolved(dependents) => Some(dependents),
            _ => None,
        }
    }
}

/// Finds dependents made stale by a new base version
#[derive(Debug, Clone)]
pub struct StalenessResolver {
    prefix: String,
}

impl Default for StalenessResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DEPENDENT_PREFIX)
    }
}

impl StalenessResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve stale dependents of `base_version`, which must already be
    /// committed to the database.
    pub fn resolve<D: AssetDatabase + ?Sized>(
        &self,
        graph: &VersionGraph<'_, D>,
        asset: &Asset,
        base_subset: &Subset,
        base_version: &Version,
    ) -> DatabaseResult<Staleness> {
        if base_version.is_first() {
            tracing::debug!(
                subset = %base_subset.name,
                "first version of base subset, nothing can be stale"
            );
            return Ok(Staleness::FirstVersion);
        }

        let previous = graph.versions_before(base_subset)?;
        if previous.is_empty() {
            tracing::warn!(
                subset = %base_subset.name,
                version = base_version.index,
                "base subset has no previous versions, skip updating dependents"
            );
            return Ok(Staleness::NoPreviousVersions);
        }

        let mut stale = StaleDependents::new();
        for candidate in graph.dependency_subsets(asset, &self.prefix)? {
            if candidate.id == base_subset.id {
                continue;
            }

            let Some(latest) = graph.latest_version(&candidate)? else {
                tracing::debug!(subset = %candidate.name, "dependent has no published version");
                continue;
            };

            let dependencies = graph.dependencies_of(&latest);
            if previous.iter().any(|id| dependencies.contains(id)) {
                tracing::info!(
                    subset = %candidate.name,
                    version = latest.index,
                    "dependent references a superseded base version"
                );
                stale.insert(latest.id.clone(), candidate.name.clone());
            } else {
                tracing::debug!(subset = %candidate.name, version = latest.index, "dependent is current");
            }
        }

        Ok(Staleness::Resolved(stale))
    }
}
