//! Republish stage value object
//!
//! The worker drives every job through these stages in order. `Failed` can be
//! entered from any of them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepublishStage {
    Idle,
    OpeningSource,
    RetargetingReferences,
    SelectingInstances,
    Persisting,
    Collecting,
    Validating,
    Extracting,
    IntegratingAll,
    Done,
    Failed,
}

impl RepublishStage {
    /// Per-job stages, in execution order
    pub const JOB_STAGES: [RepublishStage; 7] = [
        RepublishStage::OpeningSource,
        RepublishStage::RetargetingReferences,
        RepublishStage::SelectingInstances,
        RepublishStage::Persisting,
        RepublishStage::Collecting,
        RepublishStage::Validating,
        RepublishStage::Extracting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepublishStage::Idle => "idle",
            RepublishStage::OpeningSource => "opening source",
            RepublishStage::RetargetingReferences => "retargeting references",
            RepublishStage::SelectingInstances => "selecting instances",
            RepublishStage::Persisting => "persisting",
            RepublishStage::Collecting => "collecting",
            RepublishStage::Validating => "validating",
            RepublishStage::Extracting => "extracting",
            RepublishStage::IntegratingAll => "integrating all",
            RepublishStage::Done => "done",
            RepublishStage::Failed => "failed",
        }
    }

    /// Whether a failure in this stage aborts the whole batch.
    ///
    /// A missing base reference means the job was planned from bad data;
    /// an extraction failure would break the all-or-nothing commit.
    pub fn aborts_batch(&self) -> bool {
        matches!(
            self,
            RepublishStage::RetargetingReferences
                | RepublishStage::Collecting
                | RepublishStage::Validating
                | RepublishStage::Extracting
                | RepublishStage::IntegratingAll
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RepublishStage::Done | RepublishStage::Failed)
    }
}

impl std::fmt::Display for RepublishStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_stages_end_with_extraction() {
        assert_eq!(RepublishStage::JOB_STAGES[0], RepublishStage::OpeningSource);
        assert_eq!(RepublishStage::JOB_STAGES[6], RepublishStage::Extracting);
    }

    #[test]
    fn early_stages_only_abort_their_job() {
        assert!(!RepublishStage::OpeningSource.aborts_batch());
        assert!(!RepublishStage::SelectingInstances.aborts_batch());
        assert!(!RepublishStage::Persisting.aborts_batch());
    }

    #[test]
    fn retargeting_and_extraction_abort_the_batch() {
        assert!(RepublishStage::RetargetingReferences.aborts_batch());
        assert!(RepublishStage::Extracting.aborts_batch());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&RepublishStage::IntegratingAll).unwrap();
        assert_eq!(json, "\"integrating_all\"");
    }
}
