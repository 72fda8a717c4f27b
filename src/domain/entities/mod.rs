//! Domain Entities
//!
//! - `Document` - Raw database document, plus `Query` and `Patch`
//! - `Asset` / `Subset` / `Version` - Typed views over documents
//! - `Job` / `JobSet` / `JobDescriptor` - Planning records for one worker run
//! - `PublishContext` - Per-job aggregate carried through the publish stages

mod asset;
mod document;
mod job;
mod publish_context;

pub use asset::{
    Asset, Subset, Version, DEPENDENCIES_KEY, FAILURE_FLAG_KEY, SOURCE_KEY, TASK_OPTIONS_KEY,
};
pub use document::{
    Document, DocumentName, DocumentType, MalformedDocument, NameFilter, Patch, PatchError, Query,
    SortOrder,
};
pub use job::{Job, JobDescriptor, JobSet, StaleDependents};
pub use publish_context::{PublishContext, PublishInstance, PublishStage, SourceContext, StageResult};
