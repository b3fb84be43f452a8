use sysinfo::{Pid as SysinfoPid, ProcessesToUpdate, System};
use tracing::debug;

use crate::process::errors::ProcessError;
use crate::process::types::{Pid, ProcessInfo};

/// Check if a process with the given PID is currently running
pub fn is_process_running(pid: u32) -> Result<bool, ProcessError> {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);
    Ok(system.process(pid_obj).is_some())
}

/// Extract the base name from a path, handling both Unix (/) and Windows (\) separators
pub fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Process name as the OS query APIs see it: base name without a trailing `.exe`.
///
/// `"C:\\Program Files\\PreSonus\\Studio One 6\\Studio One.exe"` becomes `"Studio One"`.
pub fn process_stem(name: &str) -> &str {
    let base = base_name(name);
    match base.len().checked_sub(4) {
        Some(split)
            if base.is_char_boundary(split) && base[split..].eq_ignore_ascii_case(".exe") =>
        {
            &base[..split]
        }
        _ => base,
    }
}

/// Check if a process name refers to the executable stem `stem`.
///
/// Comparison is exact on the stem, ignoring ASCII case the way Windows
/// process lookup does. No prefix or substring matching: stale-instance
/// cleanup kills whatever this accepts.
fn process_name_matches(actual_name: &str, stem: &str) -> bool {
    let actual = process_stem(actual_name);
    let expected = process_stem(stem);
    !expected.is_empty() && actual.eq_ignore_ascii_case(expected)
}

/// Find every running process whose executable stem equals `stem`
pub fn find_processes_by_name(stem: &str) -> Result<Vec<ProcessInfo>, ProcessError> {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let mut matches: Vec<ProcessInfo> = system
        .processes()
        .iter()
        .filter_map(|(pid, process)| {
            let name = process.name().to_string_lossy();
            if process_name_matches(&name, stem) {
                Some(ProcessInfo {
                    pid: Pid::from_raw(pid.as_u32()),
                    name: name.to_string(),
                })
            } else {
                None
            }
        })
        .collect();

    matches.sort_by_key(|info| info.pid.as_u32());

    debug!(
        event = "core.process.find_by_name_completed",
        stem = stem,
        count = matches.len()
    );

    Ok(matches)
}

/// Kill a process with the given PID, validating it still has the expected name
pub fn kill_process(pid: u32, expected_name: Option<&str>) -> Result<(), ProcessError> {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);

    match system.process(pid_obj) {
        Some(process) => {
            // Guard against the PID having been handed to another program
            if let Some(name) = expected_name {
                let actual_name = process.name().to_string_lossy().to_string();
                if !process_name_matches(&actual_name, name) {
                    return Err(ProcessError::PidReused {
                        pid,
                        expected: name.to_string(),
                        actual: actual_name,
                    });
                }
            }

            if process.kill() {
                Ok(())
            } else {
                Err(ProcessError::KillFailed {
                    pid,
                    message: "Process kill signal failed".to_string(),
                })
            }
        }
        None => Err(ProcessError::NotFound { pid }),
    }
}
