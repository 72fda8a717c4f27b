//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `cli` - Argument definitions
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Output rendering
//!
//! ## Usage
//!
//! ```ignore
//! use rigcascade::presentation::factory;
//!
//! let use_case = factory::create_trigger_use_case(&config, None)?;
//! let outcome = use_case.execute(&config.trigger_options("hero", "modelDefault"))?;
//! ```

pub mod cli;
pub mod factory;
pub mod output;

pub use cli::{Cli, Commands};
pub use factory::{create_trigger_use_case, create_worker_use_case};
pub use output::OutputFormat;
