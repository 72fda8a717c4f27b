//! Output Rendering
//!
//! Renders use case results as human-readable text or a single JSON line.

use serde_json::json;

use crate::application::{TriggerOutcome, WorkerReport};
use crate::domain::entities::StaleDependents;
use crate::domain::services::Staleness;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

fn outcome_key(outcome: &TriggerOutcome) -> &'static str {
    match outcome {
        TriggerOutcome::Disabled => "disabled",
        TriggerOutcome::FirstVersion => "first_version",
        TriggerOutcome::NoPreviousVersions => "no_previous_versions",
        TriggerOutcome::NoStaleDependents => "no_stale_dependents",
        TriggerOutcome::Updated { .. } => "updated",
        TriggerOutcome::FlaggedForFollowUp { .. } => "flagged",
    }
}

/// Render the result of `trigger`
pub fn render_trigger(outcome: &TriggerOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => trigger_json(outcome).to_string(),
        OutputFormat::Text => trigger_text(outcome),
    }
}

fn trigger_json(outcome: &TriggerOutcome) -> serde_json::Value {
    let status = if outcome.is_warning() {
        "warning"
    } else {
        "success"
    };
    let mut value = json!({
        "event": "complete",
        "command": "trigger",
        "status": status,
        "outcome": outcome_key(outcome),
        "summary": outcome.summary(),
    });

    match outcome {
        TriggerOutcome::Updated { dependents } => {
            value["dependents"] = json!(dependents);
        }
        TriggerOutcome::FlaggedForFollowUp {
            dependents,
            diagnostic,
            ..
        } => {
            value["dependents"] = json!(dependents);
            value["diagnostic"] = json!(diagnostic);
        }
        _ => {}
    }
    value
}

fn trigger_text(outcome: &TriggerOutcome) -> String {
    let mut out = String::new();
    match outcome {
        TriggerOutcome::FlaggedForFollowUp {
            dependents,
            message,
            diagnostic,
        } => {
            out.push_str(&format!("warning: {}\n", message));
            if let Some(diagnostic) = diagnostic {
                out.push_str(&format!("  {}\n", diagnostic));
            }
            push_dependents(&mut out, dependents);
        }
        TriggerOutcome::Updated { dependents } => {
            out.push_str(&outcome.summary());
            out.push('\n');
            push_dependents(&mut out, dependents);
        }
        other => {
            out.push_str(&other.summary());
            out.push('\n');
        }
    }
    out
}

fn push_dependents(out: &mut String, dependents: &StaleDependents) {
    for (version, subset) in dependents.iter() {
        out.push_str(&format!("  {} {}\n", version, subset));
    }
}

/// Render the result of `stale`
pub fn render_staleness(staleness: &Staleness, format: OutputFormat) -> String {
    let (key, dependents) = match staleness {
        Staleness::FirstVersion => ("first_version", None),
        Staleness::NoPreviousVersions => ("no_previous_versions", None),
        Staleness::Resolved(dependents) => ("resolved", Some(dependents)),
    };

    match format {
        OutputFormat::Json => json!({
            "event": "complete",
            "command": "stale",
            "status": "success",
            "outcome": key,
            "dependents": dependents.cloned().unwrap_or_default(),
        })
        .to_string(),
        OutputFormat::Text => match dependents {
            None => format!("{}\n", key.replace('_', " ")),
            Some(d) if d.is_empty() => "all dependents are up to date\n".to_string(),
            Some(d) => {
                let mut out = format!("{} stale dependent(s)\n", d.len());
                push_dependents(&mut out, d);
                out
            }
        },
    }
}

/// Text summary of a worker run; JSON runs already stream their events.
pub fn render_worker(report: &WorkerReport) -> String {
    let mut out = format!(
        "republished {} of {} job(s)\n",
        report.integrated.len(),
        report.job_count
    );
    for skipped in &report.skipped {
        out.push_str(&format!(
            "  skipped job {} ({}) during {}: {}\n",
            skipped.index + 1,
            skipped.source,
            skipped.stage,
            skipped.error
        ));
    }
    out
}
