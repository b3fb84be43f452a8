use std::time::Duration;

use clap::ArgMatches;
use tracing::{info, warn};

use s1_launcher_core::{CloseOptions, Host, NativeDesktop, SystemClock, WindowHandle, window_ops};

use super::helpers::print_json;

pub(crate) fn handle_close_window_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    let handle = *matches
        .get_one::<WindowHandle>("handle")
        .ok_or("Handle argument is required")?;
    let options = CloseOptions {
        wait_timeout: Duration::from_millis(*matches.get_one::<u64>("timeout-ms").unwrap_or(&5000)),
        kill_if_hung: matches.get_flag("kill-if-hung"),
        ..CloseOptions::default()
    };

    info!(event = "cli.close_window_started", handle = %handle);

    let desktop = NativeDesktop::new();
    let clock = SystemClock;
    let outcome = window_ops::close_safely(Host::new(&desktop, &desktop, &clock), handle, options);

    if json_output {
        print_json(&outcome)?;
    } else {
        println!("{}: {}", handle, outcome);
    }

    if outcome.is_closed() {
        info!(event = "cli.close_window_completed", handle = %handle);
        Ok(())
    } else {
        warn!(event = "cli.close_window_failed", handle = %handle, outcome = %outcome);
        Err(format!("Window {} was not closed: {}", handle, outcome).into())
    }
}
