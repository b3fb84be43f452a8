use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::process::{Pid, base_name, process_stem};
use crate::supervisor::errors::SupervisionError;
use crate::window::{CloseOptions, CloseOutcome, WindowHandle};

/// The executable being supervised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    program_path: PathBuf,
    file_name: String,
}

impl TargetSpec {
    pub fn new(program_path: impl Into<PathBuf>) -> Result<Self, SupervisionError> {
        let program_path = program_path.into();
        let raw = program_path.to_string_lossy();
        let file_name = base_name(&raw);

        if matches!(file_name, "." | "..") || process_stem(file_name).is_empty() {
            return Err(SupervisionError::InvalidTarget {
                path: program_path.display().to_string(),
            });
        }
        let file_name = file_name.to_string();

        Ok(Self {
            program_path,
            file_name,
        })
    }

    pub fn program_path(&self) -> &Path {
        &self.program_path
    }

    /// File name with extension, e.g. `Studio One.exe`
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Name running instances are looked up by, e.g. `Studio One`
    pub fn process_name(&self) -> &str {
        process_stem(&self.file_name)
    }
}

/// Terminal result of one supervision run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SupervisionOutcome {
    /// Main window showed up and no trust prompt followed within the dialog window
    MainWindowAppeared {
        pid: Pid,
        main_window: WindowHandle,
    },
    /// Trust prompt was dismissed and the target started once more
    DialogDismissedAndRelaunched {
        first_pid: Pid,
        dialog: WindowHandle,
        dialog_close: CloseOutcome,
        pid: Pid,
        main_window: WindowHandle,
    },
    /// The (re)launched process never exposed a main window
    TimedOutWaitingForMainWindow { pid: Pid, relaunched: bool },
}

impl SupervisionOutcome {
    /// Process id of the instance left running
    pub fn pid(&self) -> Pid {
        match self {
            SupervisionOutcome::MainWindowAppeared { pid, .. }
            | SupervisionOutcome::DialogDismissedAndRelaunched { pid, .. }
            | SupervisionOutcome::TimedOutWaitingForMainWindow { pid, .. } => *pid,
        }
    }
}

impl fmt::Display for SupervisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupervisionOutcome::MainWindowAppeared { pid, .. } => {
                write!(f, "Main window appeared (PID {})", pid)
            }
            SupervisionOutcome::DialogDismissedAndRelaunched {
                first_pid,
                dialog_close,
                pid,
                ..
            } => write!(
                f,
                "Trust prompt of PID {} handled ({}), relaunched as PID {}",
                first_pid, dialog_close, pid
            ),
            SupervisionOutcome::TimedOutWaitingForMainWindow { pid, relaunched } => {
                let which = if *relaunched { "relaunched " } else { "" };
                write!(f, "Timed out waiting for main window of {}PID {}", which, pid)
            }
        }
    }
}

/// States the supervisor moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisorState {
    Idle,
    KillingStale,
    Starting,
    WaitingMainWindow,
    WaitingDialog,
    ClosingDialog,
    Relaunching,
    WaitingMainWindow2,
    Done,
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SupervisorState::Idle => "idle",
            SupervisorState::KillingStale => "killing_stale",
            SupervisorState::Starting => "starting",
            SupervisorState::WaitingMainWindow => "waiting_main_window",
            SupervisorState::WaitingDialog => "waiting_dialog",
            SupervisorState::ClosingDialog => "closing_dialog",
            SupervisorState::Relaunching => "relaunching",
            SupervisorState::WaitingMainWindow2 => "waiting_main_window_2",
            SupervisorState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Timing bounds and dialog identity for a supervision run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisionPolicy {
    /// Title substring of the trust prompt
    pub dialog_title: String,
    /// Exact class name of the trust prompt
    pub dialog_class: String,
    pub dialog_timeout: Duration,
    pub dialog_poll_interval: Duration,
    pub main_window_timeout: Duration,
    pub main_window_poll_interval: Duration,
    pub stale_kill_interval: Duration,
    /// Termination rounds before stale instances are reported as surviving
    pub stale_kill_max_attempts: u32,
    /// Close parameters used on the trust prompt
    pub close: CloseOptions,
}

impl Default for SupervisionPolicy {
    fn default() -> Self {
        Self {
            dialog_title: "Studio One 安全".to_string(),
            dialog_class: "CCLDialogClass".to_string(),
            dialog_timeout: Duration::from_millis(3000),
            dialog_poll_interval: Duration::from_millis(100),
            main_window_timeout: Duration::from_secs(120),
            main_window_poll_interval: Duration::from_millis(1000),
            stale_kill_interval: Duration::from_millis(1000),
            stale_kill_max_attempts: 10,
            close: CloseOptions::default(),
        }
    }
}
