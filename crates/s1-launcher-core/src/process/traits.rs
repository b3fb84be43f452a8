//! Process capability used by the supervisor and the safe-close escalation.

use std::path::Path;

use crate::process::{errors::ProcessError, types::{Pid, ProcessInfo}};
use crate::window::types::WindowHandle;

/// OS process operations the launcher needs.
///
/// [`crate::native::NativeDesktop`] implements this against the real OS;
/// tests substitute an in-memory process table.
pub trait ProcessControl {
    /// All running processes whose executable stem equals `stem`.
    fn find_by_name(&self, stem: &str) -> Result<Vec<ProcessInfo>, ProcessError>;

    /// Request immediate, unconditional termination.
    fn kill(&self, pid: Pid) -> Result<(), ProcessError>;

    /// Terminate `pid` only while it still runs the executable `stem`.
    ///
    /// Returns [`ProcessError::PidReused`] when the PID now belongs to a
    /// different program.
    fn kill_named(&self, pid: Pid, stem: &str) -> Result<(), ProcessError>;

    /// Launch `program` with a "start minimized" window hint.
    ///
    /// Returns as soon as the process is created; it does not wait for
    /// any window.
    fn spawn_minimized(&self, program: &Path) -> Result<Pid, ProcessError>;

    /// Main window of a running process.
    ///
    /// # Returns
    /// * `Ok(Some(handle))` - The process exposes a main window
    /// * `Ok(None)` - The process exists but has no main window yet
    /// * `Err(ProcessError::NotFound)` - The OS does not (or no longer) know the process
    fn main_window(&self, pid: Pid) -> Result<Option<WindowHandle>, ProcessError>;
}
