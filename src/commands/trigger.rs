//! Trigger command handler
//!
//! Runs after a publish. A flagged follow-up exits with code 2: the
//! publish itself stands, but someone has to look at the dependents.

use std::process::ExitCode;

use anyhow::{Context, Result};

use rigcascade::config::LoadedConfig;
use rigcascade::presentation::factory;
use rigcascade::presentation::output::{render_trigger, OutputFormat};

const FOLLOW_UP_EXIT: u8 = 2;

pub fn cmd_trigger(
    loaded: &LoadedConfig,
    asset: &str,
    subset: &str,
    version: Option<String>,
    json: bool,
) -> Result<ExitCode> {
    let config = &loaded.config;
    let use_case = factory::create_trigger_use_case(config, loaded.source.as_deref())?;

    let mut options = config.trigger_options(asset, subset);
    if let Some(version) = version {
        options = options.with_version(version);
    }

    let outcome = use_case
        .execute(&options)
        .with_context(|| format!("auto update after publishing {}/{}", asset, subset))?;

    let rendered = render_trigger(&outcome, OutputFormat::from_json_flag(json));
    if outcome.is_warning() && !json {
        eprint!("{}", rendered);
    } else {
        print!("{}", rendered);
        if json {
            println!();
        }
    }

    if outcome.is_warning() {
        Ok(ExitCode::from(FOLLOW_UP_EXIT))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
