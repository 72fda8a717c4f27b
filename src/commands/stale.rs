//! Stale command handler

use std::process::ExitCode;

use anyhow::Result;

use rigcascade::config::LoadedConfig;
use rigcascade::presentation::factory;
use rigcascade::presentation::output::{render_staleness, OutputFormat};

pub fn cmd_stale(
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

    let staleness = use_case.resolve(&options)?;
    let format = OutputFormat::from_json_flag(json);
    print!("{}", render_staleness(&staleness, format));
    if json {
        println!();
    }
    Ok(ExitCode::SUCCESS)
}
