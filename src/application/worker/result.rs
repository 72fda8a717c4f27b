//! Worker Result

use crate::application::republish::SkippedJob;

/// What a worker run committed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub job_count: usize,
    /// Indices of integrated jobs
    pub integrated: Vec<usize>,
    /// Jobs that failed before extraction and were left out
    pub skipped: Vec<SkippedJob>,
}

impl WorkerReport {
    /// Every planned job was integrated
    pub fn is_success(&self) -> bool {
        self.skipped.is_empty() && self.integrated.len() == self.job_count
    }
}
