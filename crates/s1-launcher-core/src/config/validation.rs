//! Configuration validation.

use std::path::Path;

use crate::config::types::LauncherConfig;
use crate::errors::ConfigError;

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidConfiguration {
        message: message.into(),
    }
}

fn check_positive(name: &str, value: Option<u64>) -> Result<(), ConfigError> {
    match value {
        Some(0) => Err(invalid(format!("supervision.{} must be greater than 0", name))),
        _ => Ok(()),
    }
}

fn check_non_empty(name: &str, value: Option<&str>) -> Result<(), ConfigError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(invalid(format!(
            "supervision.{} must not be empty",
            name
        ))),
        _ => Ok(()),
    }
}

/// Validate the configuration.
///
/// Only checks values that are set; defaults are always valid. The program
/// path is checked separately by [`require_program_path`] because commands
/// like `config` work without one.
pub fn validate_config(config: &LauncherConfig) -> Result<(), ConfigError> {
    let s = &config.supervision;

    check_non_empty("dialog_title", s.dialog_title.as_deref())?;
    check_non_empty("dialog_class", s.dialog_class.as_deref())?;

    check_positive("dialog_timeout_ms", s.dialog_timeout_ms)?;
    check_positive("dialog_poll_interval_ms", s.dialog_poll_interval_ms)?;
    check_positive("main_window_timeout_ms", s.main_window_timeout_ms)?;
    check_positive("main_window_poll_interval_ms", s.main_window_poll_interval_ms)?;
    check_positive("stale_kill_interval_ms", s.stale_kill_interval_ms)?;
    check_positive("close_timeout_ms", s.close_timeout_ms)?;

    if s.stale_kill_max_attempts == Some(0) {
        return Err(invalid("supervision.stale_kill_max_attempts must be at least 1"));
    }

    // Compare against the resolved policy so a lone override is checked
    // against the default of its partner
    let policy = config.supervision_policy();
    if policy.dialog_poll_interval > policy.dialog_timeout {
        return Err(invalid(
            "supervision.dialog_poll_interval_ms must not exceed dialog_timeout_ms",
        ));
    }
    if policy.main_window_poll_interval > policy.main_window_timeout {
        return Err(invalid(
            "supervision.main_window_poll_interval_ms must not exceed main_window_timeout_ms",
        ));
    }

    if let Some(extension) = config.project.extension.as_deref() {
        let bad = extension.is_empty()
            || extension.starts_with('.')
            || extension.contains(['/', '\\', '*', '?', '[', ']']);
        if bad {
            return Err(invalid(format!(
                "project.extension '{}' must be a bare extension like \"song\"",
                extension
            )));
        }
    }

    Ok(())
}

/// The configured program path, or [`ConfigError::MissingProgramPath`].
pub fn require_program_path(config: &LauncherConfig) -> Result<&Path, ConfigError> {
    match config.program.path.as_deref() {
        Some(path) if !path.as_os_str().is_empty() => Ok(path),
        _ => Err(ConfigError::MissingProgramPath),
    }
}
