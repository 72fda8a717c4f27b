//! Trigger Module
//!
//! Runs after a base subset was published: checks the auto-update gate,
//! resolves stale dependents and launches the worker for them.
//!
//! ## Structure
//!
//! - `options` - Inputs of one trigger (`TriggerOptions`)
//! - `result` - What happened (`TriggerOutcome`)
//! - `use_case` - Core use case logic (`AutoUpdateUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use rigcascade::application::trigger::{AutoUpdateUseCase, TriggerOptions};
//!
//! let use_case = AutoUpdateUseCase::new(db, launcher);
//! let outcome = use_case.execute(&TriggerOptions::new("hero", "modelDefault"))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::{TriggerOptions, AUTO_UPDATE_OPTION};
pub use result::TriggerOutcome;
pub use use_case::AutoUpdateUseCase;
