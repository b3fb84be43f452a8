use std::path::PathBuf;

use clap::ArgMatches;
use serde::Serialize;
use tracing::error;

use s1_launcher_core::LauncherConfig;
use s1_launcher_core::config::{ConfigOverrides, apply_overrides};
use s1_launcher_core::errors::ConfigError;

/// Load the config hierarchy plus the subcommand's `--config` file.
///
/// A config that fails to parse or validate is fatal.
pub(crate) fn load_config(matches: &ArgMatches) -> Result<LauncherConfig, ConfigError> {
    let explicit = matches.get_one::<PathBuf>("config");

    LauncherConfig::load_hierarchy(explicit.map(PathBuf::as_path)).inspect_err(|e| {
        error!(event = "cli.config.load_failed", error = %e);
    })
}

/// Collect `run` flags that override config values.
pub(crate) fn run_overrides(matches: &ArgMatches) -> ConfigOverrides {
    ConfigOverrides {
        program: matches.get_one::<PathBuf>("program").cloned(),
        project_folder: matches.get_one::<PathBuf>("project-folder").cloned(),
        // Absent flag means "use config", not "disable"
        used_auto_save: matches.get_flag("auto-save").then_some(true),
    }
}

/// Load config and apply `run` overrides on top.
pub(crate) fn load_run_config(matches: &ArgMatches) -> Result<LauncherConfig, ConfigError> {
    let config = apply_overrides(load_config(matches)?, run_overrides(matches));
    config.validate()?;
    Ok(config)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
