//! Scenario tests for rigcascade.
//!
//! Each scenario drives the real binary against a temp project: a JSON
//! document store, manifest scenes and a config file.
//!
//! Run with: cargo test --test scenarios

mod common;

#[path = "scenarios/trigger_flow.rs"]
mod trigger_flow;

#[path = "scenarios/worker_cli.rs"]
mod worker_cli;

#[path = "scenarios/stale_report.rs"]
mod stale_report;
