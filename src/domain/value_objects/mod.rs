//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod ids;
pub mod revision;
mod source_locator;
mod stage;

pub use ids::{DocumentId, VersionId};
pub use revision::{
    next_free_revision_path, next_revision_path, revision_counter, DEFAULT_REVISION_DIR,
};
pub use source_locator::{LocatorError, SourceLocator};
pub use stage::RepublishStage;
