use clap::ArgMatches;
use tracing::info;

use s1_launcher_core::config::resolve_defaults;

use super::helpers::{load_config, print_json};

pub(crate) fn handle_config_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolved = resolve_defaults(&load_config(matches)?);

    if matches.get_flag("json") {
        print_json(&resolved)?;
    } else {
        print!("{}", toml::to_string_pretty(&resolved)?);
    }

    info!(event = "cli.config_completed");
    Ok(())
}
