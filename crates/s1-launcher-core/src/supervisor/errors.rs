use crate::errors::LauncherError;
use crate::process::{Pid, ProcessError};

#[derive(Debug, thiserror::Error)]
pub enum SupervisionError {
    #[error("'{path}' does not name an executable file")]
    InvalidTarget { path: String },

    #[error(
        "{count} '{name}' process(es) still running after {attempts} termination attempts",
        count = .pids.len()
    )]
    StaleProcessesSurvived {
        name: String,
        attempts: u32,
        pids: Vec<Pid>,
    },

    #[error("Could not query running '{name}' processes: {source}")]
    ProcessQueryFailed {
        name: String,
        #[source]
        source: ProcessError,
    },

    #[error("Failed to launch target: {source}")]
    SpawnFailed {
        #[source]
        source: ProcessError,
    },
}

impl LauncherError for SupervisionError {
    fn error_code(&self) -> &'static str {
        match self {
            SupervisionError::InvalidTarget { .. } => "SUPERVISION_INVALID_TARGET",
            SupervisionError::StaleProcessesSurvived { .. } => {
                "SUPERVISION_STALE_PROCESSES_SURVIVED"
            }
            SupervisionError::ProcessQueryFailed { .. } => "SUPERVISION_PROCESS_QUERY_FAILED",
            SupervisionError::SpawnFailed { .. } => "SUPERVISION_SPAWN_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            SupervisionError::InvalidTarget { .. } | SupervisionError::SpawnFailed { .. }
        )
    }
}
