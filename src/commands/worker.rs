//! Worker command handler
//!
//! Exits non-zero unless every planned job was integrated. The last
//! stderr line is what the launcher reports back to the publisher.

use std::process::ExitCode;

use anyhow::{bail, Result};

use rigcascade::presentation::factory;
use rigcascade::presentation::output::render_worker;
use rigcascade::{Config, JobDescriptor};

pub fn cmd_worker(
    config: &Config,
    payload: Option<String>,
    args: &[String],
    json: bool,
) -> Result<ExitCode> {
    let descriptor = match payload {
        Some(payload) => JobDescriptor::from_json(&payload)?,
        None => JobDescriptor::from_key_values(args)?,
    };
    tracing::info!(
        asset = %descriptor.asset_name,
        subset = %descriptor.base_subset,
        dependents = descriptor.dependents.len(),
        "worker started"
    );

    let use_case = factory::create_worker_use_case(config);
    let report = use_case.execute_with_events(
        &descriptor,
        &config.worker_options(),
        factory::create_event_sink(json),
    )?;

    if !json {
        print!("{}", render_worker(&report));
    }

    if !report.is_success() {
        bail!(
            "{} of {} job(s) were not republished",
            report.job_count - report.integrated.len(),
            report.job_count
        );
    }
    Ok(ExitCode::SUCCESS)
}
