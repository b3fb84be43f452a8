use std::time::Duration;

use tracing::{debug, info, warn};

use crate::host::Host;
use crate::process::Pid;
use crate::window::errors::WindowError;
use crate::window::traits::WindowQuery;
use crate::window::types::{CloseOptions, CloseOutcome, WindowCriteria, WindowHandle, WindowInfo};

/// Find the first top-level window matching `criteria`.
///
/// Enumeration order is whatever the OS reports. Windows destroyed during
/// the scan read back empty and simply fail the match. An enumeration
/// failure is logged and treated as "not found" so callers keep polling.
pub fn find_window(windows: &dyn WindowQuery, criteria: &WindowCriteria) -> Option<WindowHandle> {
    let handles = match windows.enumerate() {
        Ok(handles) => handles,
        Err(e) => {
            warn!(
                event = "core.window.enumeration_failed",
                error = %e,
                "Treating failed enumeration as not found"
            );
            return None;
        }
    };

    let found = handles.into_iter().find(|&handle| {
        let title = windows.title(handle);
        let class_name = windows.class_name(handle);
        let pid = windows.owner_pid(handle);
        criteria.matches(&title, pid, &class_name)
    });

    debug!(
        event = "core.window.find_completed",
        title = %criteria.title_substring,
        class_name = %criteria.class_name,
        pid = criteria.pid.as_u32(),
        found = found.is_some()
    );

    found
}

/// Poll [`find_window`] until it matches or `timeout` elapses.
///
/// Checks immediately, then every `interval`. The final check happens at or
/// after `timeout`, so a window appearing exactly at the deadline is found.
pub fn poll_until_found(
    host: Host<'_>,
    criteria: &WindowCriteria,
    timeout: Duration,
    interval: Duration,
) -> Option<WindowHandle> {
    let start = host.clock.now();

    loop {
        if let Some(handle) = find_window(host.windows, criteria) {
            return Some(handle);
        }

        if host.clock.elapsed_since(start) >= timeout {
            return None;
        }

        host.clock.sleep(interval);
    }
}

/// Read a window's identifying properties, or `None` if it no longer exists.
pub fn window_info(windows: &dyn WindowQuery, handle: WindowHandle) -> Option<WindowInfo> {
    if !windows.is_valid(handle) {
        return None;
    }

    Some(WindowInfo {
        handle,
        title: windows.title(handle),
        class_name: windows.class_name(handle),
        pid: windows.owner_pid(handle),
        hung: windows.is_hung(handle),
    })
}

/// Close a window politely, escalating to process termination if allowed.
///
/// 1. Invalid handle: no-op.
/// 2. Hung window with `kill_if_hung`: terminate the owner immediately.
/// 3. Otherwise post a close request and poll validity until `wait_timeout`.
/// 4. Still open after the wait: terminate the owner if `kill_if_hung`,
///    otherwise leave it and report [`CloseOutcome::StillOpen`].
///
/// Never returns an error; every failure is logged and reflected in the
/// outcome.
pub fn close_safely(host: Host<'_>, handle: WindowHandle, options: CloseOptions) -> CloseOutcome {
    if !host.windows.is_valid(handle) {
        warn!(
            event = "core.window.close_invalid_handle",
            handle = %handle
        );
        return CloseOutcome::InvalidHandle;
    }

    info!(
        event = "core.window.close_started",
        handle = %handle,
        timeout_ms = options.wait_timeout.as_millis() as u64,
        kill_if_hung = options.kill_if_hung
    );

    if host.windows.is_hung(handle) {
        warn!(event = "core.window.close_window_hung", handle = %handle);
        if options.kill_if_hung {
            return escalate(host, handle);
        }
    }

    if let Err(e) = host.windows.post_close(handle) {
        // The validity poll below still decides the outcome
        warn!(
            event = "core.window.close_post_failed",
            handle = %handle,
            error = %e
        );
    }

    let start = host.clock.now();
    while host.windows.is_valid(handle) && host.clock.elapsed_since(start) < options.wait_timeout {
        host.clock.sleep(options.poll_interval);
    }

    if !host.windows.is_valid(handle) {
        info!(
            event = "core.window.close_completed",
            handle = %handle,
            elapsed_ms = host.clock.elapsed_since(start).as_millis() as u64
        );
        return CloseOutcome::Closed;
    }

    warn!(
        event = "core.window.close_timed_out",
        handle = %handle,
        timeout_ms = options.wait_timeout.as_millis() as u64
    );

    if options.kill_if_hung {
        escalate(host, handle)
    } else {
        CloseOutcome::StillOpen
    }
}

fn escalate(host: Host<'_>, handle: WindowHandle) -> CloseOutcome {
    match force_terminate_owner(host, handle) {
        Ok(pid) => CloseOutcome::ForceTerminated { pid },
        Err(e) => {
            warn!(
                event = "core.window.force_terminate_failed",
                handle = %handle,
                error = %e
            );
            CloseOutcome::TerminateFailed {
                message: e.to_string(),
            }
        }
    }
}

/// Terminate the process that owns `handle`, unconditionally.
pub fn force_terminate_owner(host: Host<'_>, handle: WindowHandle) -> Result<Pid, WindowError> {
    let pid = host
        .windows
        .owner_pid(handle)
        .ok_or(WindowError::OwnerNotFound { handle })?;

    info!(
        event = "core.window.force_terminate_started",
        handle = %handle,
        pid = pid.as_u32()
    );

    host.processes
        .kill(pid)
        .map_err(|source| WindowError::TerminateFailed { handle, source })?;

    info!(
        event = "core.window.force_terminate_completed",
        handle = %handle,
        pid = pid.as_u32()
    );

    Ok(pid)
}
