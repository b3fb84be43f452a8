//! Real OS backend for [`WindowQuery`] and [`ProcessControl`].
//!
//! Process lookup and termination go through sysinfo on every platform.
//! Window queries and the minimized spawn need Win32; elsewhere window
//! operations report [`WindowError::Unsupported`] and reads come back empty.

#[cfg(windows)]
mod win32;

use std::path::Path;

use tracing::{debug, info};

use crate::process::{self, Pid, ProcessControl, ProcessError, ProcessInfo};
use crate::window::{WindowError, WindowHandle, WindowQuery};

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDesktop;

impl NativeDesktop {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessControl for NativeDesktop {
    fn find_by_name(&self, stem: &str) -> Result<Vec<ProcessInfo>, ProcessError> {
        process::find_processes_by_name(stem)
    }

    fn kill(&self, pid: Pid) -> Result<(), ProcessError> {
        process::kill_process(pid.as_u32(), None)
    }

    fn kill_named(&self, pid: Pid, stem: &str) -> Result<(), ProcessError> {
        process::kill_process(pid.as_u32(), Some(stem))
    }

    fn spawn_minimized(&self, program: &Path) -> Result<Pid, ProcessError> {
        info!(
            event = "core.native.spawn_started",
            program = %program.display()
        );

        #[cfg(windows)]
        let pid = win32::spawn_minimized(program)?;

        #[cfg(not(windows))]
        let pid = {
            debug!(
                event = "core.native.spawn_minimize_unsupported",
                "Minimized window hint is only applied on Windows"
            );
            let child = std::process::Command::new(program).spawn().map_err(|e| {
                ProcessError::SpawnFailed {
                    program: program.display().to_string(),
                    message: e.to_string(),
                }
            })?;
            Pid::from_raw(child.id())
        };

        info!(event = "core.native.spawn_completed", pid = pid.as_u32());
        Ok(pid)
    }

    fn main_window(&self, pid: Pid) -> Result<Option<WindowHandle>, ProcessError> {
        if !process::is_process_running(pid.as_u32())? {
            return Err(ProcessError::NotFound { pid: pid.as_u32() });
        }

        #[cfg(windows)]
        let handle = win32::main_window(pid);

        #[cfg(not(windows))]
        let handle = None;

        debug!(
            event = "core.native.main_window_checked",
            pid = pid.as_u32(),
            found = handle.is_some()
        );
        Ok(handle)
    }
}

#[cfg(windows)]
impl WindowQuery for NativeDesktop {
    fn enumerate(&self) -> Result<Vec<WindowHandle>, WindowError> {
        win32::enumerate()
    }

    fn title(&self, handle: WindowHandle) -> String {
        win32::title(handle)
    }

    fn class_name(&self, handle: WindowHandle) -> String {
        win32::class_name(handle)
    }

    fn owner_pid(&self, handle: WindowHandle) -> Option<Pid> {
        win32::owner_pid(handle)
    }

    fn is_valid(&self, handle: WindowHandle) -> bool {
        win32::is_valid(handle)
    }

    fn is_hung(&self, handle: WindowHandle) -> bool {
        win32::is_hung(handle)
    }

    fn post_close(&self, handle: WindowHandle) -> Result<(), WindowError> {
        win32::post_close(handle)
    }
}

#[cfg(not(windows))]
impl WindowQuery for NativeDesktop {
    fn enumerate(&self) -> Result<Vec<WindowHandle>, WindowError> {
        Err(WindowError::Unsupported {
            operation: "enumerate",
        })
    }

    fn title(&self, _handle: WindowHandle) -> String {
        String::new()
    }

    fn class_name(&self, _handle: WindowHandle) -> String {
        String::new()
    }

    fn owner_pid(&self, _handle: WindowHandle) -> Option<Pid> {
        None
    }

    fn is_valid(&self, _handle: WindowHandle) -> bool {
        false
    }

    fn is_hung(&self, _handle: WindowHandle) -> bool {
        false
    }

    fn post_close(&self, _handle: WindowHandle) -> Result<(), WindowError> {
        Err(WindowError::Unsupported {
            operation: "post_close",
        })
    }
}
