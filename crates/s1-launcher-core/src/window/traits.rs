//! Window query capability.

use crate::process::Pid;
use crate::window::{errors::WindowError, types::WindowHandle};

/// OS window-manager operations the launcher needs.
///
/// Reads on a window that vanished mid-scan return empty values
/// (`""`, `None`, `false`) instead of errors, because windows can be
/// destroyed at any point between enumeration and use.
pub trait WindowQuery {
    /// All top-level windows, in OS-defined order.
    fn enumerate(&self) -> Result<Vec<WindowHandle>, WindowError>;

    fn title(&self, handle: WindowHandle) -> String;

    fn class_name(&self, handle: WindowHandle) -> String;

    fn owner_pid(&self, handle: WindowHandle) -> Option<Pid>;

    /// Whether the handle still refers to an existing window.
    fn is_valid(&self, handle: WindowHandle) -> bool;

    /// Whether the OS considers the window "not responding".
    fn is_hung(&self, handle: WindowHandle) -> bool;

    /// Queue a close request, as if the user clicked the close button.
    ///
    /// Must not wait for the window to act on it.
    fn post_close(&self, handle: WindowHandle) -> Result<(), WindowError>;
}
