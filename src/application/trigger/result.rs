//! Trigger Result

use crate::domain::entities::StaleDependents;

/// What a trigger did, as seen by the publisher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The asset does not opt in to automated updates
    Disabled,
    /// The published version is the first of its subset
    FirstVersion,
    /// Earlier versions of the base subset are gone
    NoPreviousVersions,
    /// Every dependent is already current
    NoStaleDependents,
    /// The worker republished every stale dependent
    Updated { dependents: StaleDependents },
    /// The worker failed; the triggering version carries the failure flag
    FlaggedForFollowUp {
        dependents: StaleDependents,
        message: String,
        diagnostic: Option<String>,
    },
}

impl TriggerOutcome {
    /// The publish succeeded but needs attention
    pub fn is_warning(&self) -> bool {
        matches!(self, TriggerOutcome::FlaggedForFollowUp { .. })
    }

    /// Whether the worker was launched
    pub fn launched(&self) -> bool {
        matches!(
            self,
            TriggerOutcome::Updated { .. } | TriggerOutcome::FlaggedForFollowUp { .. }
        )
    }

    pub fn summary(&self) -> String {
        match self {
            TriggerOutcome::Disabled => "auto update disabled for this asset".to_string(),
            TriggerOutcome::FirstVersion => {
                "first version published, no dependents to update".to_string()
            }
            TriggerOutcome::NoPreviousVersions => {
                "no previous versions found, skipped updating dependents".to_string()
            }
            TriggerOutcome::NoStaleDependents => "all dependents are up to date".to_string(),
            TriggerOutcome::Updated { dependents } => {
                format!("updated {} dependent(s): {}", dependents.len(), dependents.subset_names().join(", "))
            }
            TriggerOutcome::FlaggedForFollowUp { message, .. } => message.clone(),
        }
    }
}
