use crate::errors::LauncherError;
use crate::process::ProcessError;
use crate::window::types::WindowHandle;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Failed to enumerate windows: {message}")]
    EnumerationFailed { message: String },

    #[error("Failed to post close request to window {handle}: {message}")]
    PostCloseFailed {
        handle: WindowHandle,
        message: String,
    },

    #[error("Could not resolve the owning process of window {handle}")]
    OwnerNotFound { handle: WindowHandle },

    #[error("Failed to terminate owner of window {handle}: {source}")]
    TerminateFailed {
        handle: WindowHandle,
        #[source]
        source: ProcessError,
    },

    #[error("Window operation '{operation}' is not supported on this platform")]
    Unsupported { operation: &'static str },
}

impl LauncherError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::EnumerationFailed { .. } => "WINDOW_ENUMERATION_FAILED",
            WindowError::PostCloseFailed { .. } => "WINDOW_POST_CLOSE_FAILED",
            WindowError::OwnerNotFound { .. } => "WINDOW_OWNER_NOT_FOUND",
            WindowError::TerminateFailed { .. } => "WINDOW_TERMINATE_FAILED",
            WindowError::Unsupported { .. } => "WINDOW_UNSUPPORTED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, WindowError::Unsupported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminate_failed_keeps_source() {
        let error = WindowError::TerminateFailed {
            handle: WindowHandle::from_raw(0x1234),
            source: ProcessError::NotFound { pid: 9 },
        };
        assert_eq!(error.error_code(), "WINDOW_TERMINATE_FAILED");
        assert!(error.to_string().contains("0x1234"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
