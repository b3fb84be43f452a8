use clap::ArgMatches;
use tracing::info;

use s1_launcher_core::{NativeDesktop, Pid, WindowCriteria, window_ops};

use super::helpers::print_json;

pub(crate) fn handle_find_window_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    let title = matches
        .get_one::<String>("title")
        .ok_or("Title argument is required")?;
    let pid = *matches.get_one::<u32>("pid").ok_or("PID argument is required")?;
    let class = matches
        .get_one::<String>("class")
        .ok_or("Class argument is required")?;

    let criteria = WindowCriteria::new(title.as_str(), Pid::new(pid)?, class.as_str());
    info!(event = "cli.find_window_started", criteria = ?criteria);

    let desktop = NativeDesktop::new();
    let found = window_ops::find_window(&desktop, &criteria)
        .and_then(|handle| window_ops::window_info(&desktop, handle));

    info!(
        event = "cli.find_window_completed",
        found = found.is_some()
    );

    if json_output {
        return Ok(print_json(&found)?);
    }

    match found {
        Some(info) => println!(
            "{}  \"{}\"  class={}  pid={}{}",
            info.handle,
            info.title,
            info.class_name,
            info.pid.map(|p| p.to_string()).unwrap_or_else(|| "?".to_string()),
            if info.hung { "  (not responding)" } else { "" }
        ),
        None => println!("No matching window."),
    }

    Ok(())
}
