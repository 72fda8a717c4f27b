//! Worker Module
//!
//! The isolated worker process: plans jobs from a descriptor and runs the
//! staged republish over them.
//!
//! ## Structure
//!
//! - `options` - Worker settings (`WorkerOptions`)
//! - `result` - Outcome of a run (`WorkerReport`)
//! - `use_case` - Core use case logic (`WorkerUseCase`)

mod options;
mod result;
mod use_case;

pub use options::WorkerOptions;
pub use result::WorkerReport;
pub use use_case::WorkerUseCase;
