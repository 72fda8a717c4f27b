//! PublishPipeline port - the four-stage publish of the pipeline framework
//!
//! `collect → validate → extract` produce and enrich a [`PublishContext`];
//! `integrate` commits it to the asset database. Each stage is called at most
//! once per context.

use std::path::PathBuf;

use thiserror::Error;

use super::{DatabaseError, SpawnError};
use crate::domain::entities::{PublishContext, PublishStage, SourceContext};

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Publish pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} failed: {message}")]
    Stage { stage: PublishStage, message: String },

    /// Another publish of the subset is in flight
    #[error("subset '{subset}' is locked by another publish")]
    SubsetLocked { subset: String },

    #[error("cannot read {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for the integrate stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrateOptions {
    /// Skip the "one concurrent publish per subset" lock
    pub skip_subset_lock: bool,
}

impl IntegrateOptions {
    /// Options used by automated, known-sequential republishing
    pub fn sequential_batch() -> Self {
        Self {
            skip_subset_lock: true,
        }
    }
}

/// Abstract publish pipeline
pub trait PublishPipeline {
    fn collect(&self, source: &SourceContext) -> PipelineResult<PublishContext>;

    fn validate(&self, context: PublishContext) -> PipelineResult<PublishContext>;

    /// Extract every active instance, recording one result per instance.
    fn extract(&self, context: PublishContext) -> PipelineResult<PublishContext>;

    fn integrate(&self, context: &PublishContext, options: &IntegrateOptions)
        -> PipelineResult<()>;
}

impl<T: PublishPipeline + ?Sized> PublishPipeline for &T {
    fn collect(&self, source: &SourceContext) -> PipelineResult<PublishContext> {
        (**self).collect(source)
    }

    fn validate(&self, context: PublishContext) -> PipelineResult<PublishContext> {
        (**self).validate(context)
    }

    fn extract(&self, context: PublishContext) -> PipelineResult<PublishContext> {
        (**self).extract(context)
    }

    fn integrate(
        &self,
        context: &PublishContext,
        options: &IntegrateOptions,
    ) -> PipelineResult<()> {
        (**self).integrate(context, options)
    }
}
