use clap::ArgMatches;
use tracing::{error, info, warn};

use s1_launcher_core::config::require_program_path;
use s1_launcher_core::{
    Host, NativeDesktop, SupervisionOutcome, Supervisor, SystemClock, TargetSpec, events,
    project_ops,
};

use super::helpers::{load_run_config, print_json};

pub(crate) fn handle_run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    let config = load_run_config(matches)?;
    let target = TargetSpec::new(require_program_path(&config)?)?;

    info!(
        event = "cli.run_started",
        program = %target.program_path().display(),
        process_name = target.process_name()
    );

    // A project that cannot be restored should not block the launch
    match project_ops::prepare_project(&config) {
        Ok(Some(prepared)) => info!(
            event = "cli.run.project_prepared",
            project_file = ?prepared.project_file,
            autosave = ?prepared.autosave
        ),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Warning: {}", e);
            warn!(event = "cli.run.project_prepare_failed", error = %e);
        }
    }

    let desktop = NativeDesktop::new();
    let clock = SystemClock;
    let mut supervisor = Supervisor::new(
        Host::new(&desktop, &desktop, &clock),
        config.supervision_policy(),
    );

    let outcome = match supervisor.run(&target) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("❌ Launch failed: {}", e);
            error!(event = "cli.run_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    if json_output {
        print_json(&outcome)?;
    } else if outcome_succeeded(&outcome) {
        println!("{}", format_outcome(&outcome));
    } else {
        eprintln!("{}", format_outcome(&outcome));
    }

    info!(
        event = "cli.run_completed",
        pid = outcome.pid().as_u32(),
        states = ?supervisor.history()
    );

    if !outcome_succeeded(&outcome) {
        return Err("Studio One did not show its main window in time".into());
    }

    Ok(())
}

/// Whether Studio One ended up with a main window.
fn outcome_succeeded(outcome: &SupervisionOutcome) -> bool {
    !matches!(
        outcome,
        SupervisionOutcome::TimedOutWaitingForMainWindow { .. }
    )
}

fn format_outcome(outcome: &SupervisionOutcome) -> String {
    if outcome_succeeded(outcome) {
        format!("✅ {}", outcome)
    } else {
        format!("❌ {}", outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s1_launcher_core::{Pid, WindowHandle};

    #[test]
    fn test_main_window_outcome_reported_as_success() {
        let outcome = SupervisionOutcome::MainWindowAppeared {
            pid: Pid::from_raw(4242),
            main_window: WindowHandle::from_raw(0x1a2b),
        };
        assert!(outcome_succeeded(&outcome));
        assert!(format_outcome(&outcome).starts_with("✅"));
    }

    #[test]
    fn test_timeout_outcome_reported_as_failure() {
        let outcome = SupervisionOutcome::TimedOutWaitingForMainWindow {
            pid: Pid::from_raw(4242),
            relaunched: true,
        };
        assert!(!outcome_succeeded(&outcome));
        let line = format_outcome(&outcome);
        assert!(line.starts_with("❌"), "got: {}", line);
        assert!(line.contains("4242"));
    }
}
