//! Domain Services
//!
//! Stateless logic over the version graph:
//! - `VersionGraph` - typed read-only queries
//! - `StalenessResolver` - which dependents reference a superseded base version
//! - `JobPlanner` - one update job per source scene

mod job_planner;
mod staleness;
mod version_graph;

pub use job_planner::JobPlanner;
pub use staleness::{Staleness, StalenessResolver, DEFAULT_DEPENDENT_PREFIX};
pub use version_graph::VersionGraph;
