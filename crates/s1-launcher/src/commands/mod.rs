use clap::ArgMatches;
use tracing::error;

use s1_launcher_core::events;

mod close_window;
mod config;
mod find_window;
mod helpers;
mod run;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    let result = match matches.subcommand() {
        Some(("run", sub_matches)) => run::handle_run_command(sub_matches),
        Some(("find-window", sub_matches)) => find_window::handle_find_window_command(sub_matches),
        Some(("close-window", sub_matches)) => {
            close_window::handle_close_window_command(sub_matches)
        }
        Some(("config", sub_matches)) => config::handle_config_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown();
    result
}
