use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::process::Pid;

/// Opaque identifier of a top-level window.
///
/// The launcher never owns the window behind it. A handle is only a
/// reference that stays meaningful while the window exists, so it must be
/// re-validated through [`crate::window::WindowQuery::is_valid`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(u64);

impl WindowHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }

    /// Parse `0x1a2b` (hex) or `6699` (decimal).
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let raw = match input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16).ok()?,
            None => input.parse().ok()?,
        };
        Some(Self(raw))
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Match rule for [`crate::window::find_window`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowCriteria {
    /// Case-sensitive substring of the window title
    pub title_substring: String,
    /// Owning process id, compared exactly
    pub pid: Pid,
    /// Window class name, compared exactly
    pub class_name: String,
}

impl WindowCriteria {
    pub fn new(
        title_substring: impl Into<String>,
        pid: Pid,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            title_substring: title_substring.into(),
            pid,
            class_name: class_name.into(),
        }
    }

    pub fn matches(&self, title: &str, pid: Option<Pid>, class_name: &str) -> bool {
        pid == Some(self.pid)
            && class_name == self.class_name
            && title.contains(&self.title_substring)
    }
}

/// Snapshot of a window's identifying properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
    pub class_name: String,
    pub pid: Option<Pid>,
    pub hung: bool,
}

/// Parameters of [`crate::window::close_safely`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseOptions {
    /// How long to wait for the window to disappear after the close request.
    /// Default: 5000ms.
    pub wait_timeout: Duration,
    /// Interval between validity checks while waiting. Default: 100ms.
    pub poll_interval: Duration,
    /// Escalate to terminating the owning process when the window is hung
    /// or outlives `wait_timeout`. Default: false.
    pub kill_if_hung: bool,
}

impl Default for CloseOptions {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_millis(5000),
            poll_interval: Duration::from_millis(100),
            kill_if_hung: false,
        }
    }
}

/// What [`crate::window::close_safely`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum CloseOutcome {
    /// Handle was already invalid; nothing was sent
    InvalidHandle,
    /// Window disappeared after the graceful close request
    Closed,
    /// Window outlived the wait and escalation was not allowed
    StillOpen,
    /// Owning process was terminated
    ForceTerminated { pid: Pid },
    /// Escalation was attempted and failed
    TerminateFailed { message: String },
}

impl CloseOutcome {
    pub fn is_closed(&self) -> bool {
        matches!(self, CloseOutcome::Closed | CloseOutcome::ForceTerminated { .. })
    }
}

impl fmt::Display for CloseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseOutcome::InvalidHandle => write!(f, "Invalid window handle"),
            CloseOutcome::Closed => write!(f, "Window closed"),
            CloseOutcome::StillOpen => write!(f, "Window did not close"),
            CloseOutcome::ForceTerminated { pid } => write!(f, "Process {} terminated", pid),
            CloseOutcome::TerminateFailed { message } => {
                write!(f, "Failed to terminate process: {}", message)
            }
        }
    }
}
