use crate::errors::LauncherError;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Invalid project search pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to restore autosave '{autosave}' over '{project}': {source}")]
    RestoreFailed {
        project: String,
        autosave: String,
        #[source]
        source: std::io::Error,
    },
}

impl LauncherError for ProjectError {
    fn error_code(&self) -> &'static str {
        match self {
            ProjectError::InvalidPattern { .. } => "PROJECT_INVALID_PATTERN",
            ProjectError::RestoreFailed { .. } => "PROJECT_RESTORE_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ProjectError::InvalidPattern { .. })
    }
}
