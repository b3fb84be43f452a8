//! s1-launcher-core: supervised launch of Studio One
//!
//! Starts the target application minimized, waits for its main window,
//! dismisses the "Studio One 安全" trust prompt if it shows up and relaunches
//! the target once when that happens.
//!
//! # Main Entry Points
//!
//! - [`supervisor`] - The launch state machine
//! - [`window`] - Window matching and the two-stage safe close
//! - [`process`] - Process queries, termination and minimized spawn
//! - [`config`] - Configuration management
//! - [`project`] - Project file lookup and autosave restore

pub mod clock;
pub mod config;
pub mod errors;
pub mod events;
pub mod host;
pub mod logging;
pub mod native;
pub mod process;
pub mod project;
pub mod supervisor;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types at crate root for convenience
pub use clock::{Clock, SystemClock};
pub use config::LauncherConfig;
pub use errors::LauncherError;
pub use host::Host;
pub use native::NativeDesktop;
pub use process::{Pid, ProcessControl, ProcessError};
pub use supervisor::{
    SupervisionError, SupervisionOutcome, SupervisionPolicy, Supervisor, SupervisorState,
    TargetSpec,
};
pub use window::{
    CloseOptions, CloseOutcome, WindowCriteria, WindowError, WindowHandle, WindowInfo, WindowQuery,
};

// Re-export handler modules as the primary API
pub use project::handler as project_ops;
pub use window::handler as window_ops;

// Re-export logging initialization
pub use logging::init_logging;
