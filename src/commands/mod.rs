//! Command handlers for the rigcascade binary

pub mod stale;
pub mod trigger;
pub mod worker;
