//! Configuration loading and merging logic.
//!
//! Missing user and project files are expected; a missing explicit
//! `--config` file is an error. Parse errors always fail.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::defaults::{project_config_path, user_config_path};
use crate::config::types::{LauncherConfig, ProgramConfig, ProjectConfig, SupervisionConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use crate::supervisor::SupervisionPolicy;
use crate::window::CloseOptions;

/// Values given on the command line, applied after every config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub program: Option<PathBuf>,
    pub project_folder: Option<PathBuf>,
    pub used_auto_save: Option<bool>,
}

/// Load configuration from the hierarchy of config files.
///
/// Loads and merges configuration from:
/// 1. Default values
/// 2. User config (`~/.s1-launcher/config.toml`)
/// 3. Project config (`./.s1-launcher/config.toml`)
/// 4. `explicit`, when given
///
/// # Errors
///
/// Returns an error if a present file fails to parse, the explicit file is
/// missing, or validation fails.
pub fn load_hierarchy(explicit: Option<&Path>) -> Result<LauncherConfig, ConfigError> {
    let mut layers: Vec<PathBuf> = Vec::new();
    if let Some(user) = user_config_path() {
        layers.push(user);
    }
    layers.push(project_config_path()?);

    load_layers(&layers, explicit)
}

/// Merge optional `layers` in order, then the required `explicit` file.
pub(crate) fn load_layers(
    layers: &[PathBuf],
    explicit: Option<&Path>,
) -> Result<LauncherConfig, ConfigError> {
    let mut config = LauncherConfig::default();

    for path in layers {
        match load_config_file(path) {
            Ok(layer) => {
                debug!(event = "core.config.layer_loaded", path = %path.display());
                config = merge_configs(config, layer);
            }
            Err(ConfigError::ConfigNotFound { .. }) => {
                debug!(event = "core.config.layer_missing", path = %path.display());
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(path) = explicit {
        config = merge_configs(config, load_config_file(path)?);
        info!(event = "core.config.explicit_loaded", path = %path.display());
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<LauncherConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Merge two configurations, with override_config taking precedence.
///
/// Override values replace base values only if present.
pub fn merge_configs(base: LauncherConfig, override_config: LauncherConfig) -> LauncherConfig {
    let (b, o) = (base.supervision, override_config.supervision);

    LauncherConfig {
        program: ProgramConfig {
            path: override_config.program.path.or(base.program.path),
            project_folder: override_config
                .program
                .project_folder
                .or(base.program.project_folder),
            used_auto_save: override_config
                .program
                .used_auto_save
                .or(base.program.used_auto_save),
        },
        supervision: SupervisionConfig {
            dialog_title: o.dialog_title.or(b.dialog_title),
            dialog_class: o.dialog_class.or(b.dialog_class),
            dialog_timeout_ms: o.dialog_timeout_ms.or(b.dialog_timeout_ms),
            dialog_poll_interval_ms: o.dialog_poll_interval_ms.or(b.dialog_poll_interval_ms),
            main_window_timeout_ms: o.main_window_timeout_ms.or(b.main_window_timeout_ms),
            main_window_poll_interval_ms: o
                .main_window_poll_interval_ms
                .or(b.main_window_poll_interval_ms),
            stale_kill_interval_ms: o.stale_kill_interval_ms.or(b.stale_kill_interval_ms),
            stale_kill_max_attempts: o.stale_kill_max_attempts.or(b.stale_kill_max_attempts),
            close_timeout_ms: o.close_timeout_ms.or(b.close_timeout_ms),
            kill_if_hung: o.kill_if_hung.or(b.kill_if_hung),
        },
        project: ProjectConfig {
            extension: override_config.project.extension.or(base.project.extension),
        },
    }
}

/// Apply command-line values on top of a loaded configuration.
pub fn apply_overrides(config: LauncherConfig, overrides: ConfigOverrides) -> LauncherConfig {
    let cli = LauncherConfig {
        program: ProgramConfig {
            path: overrides.program,
            project_folder: overrides.project_folder,
            used_auto_save: overrides.used_auto_save,
        },
        ..LauncherConfig::default()
    };
    merge_configs(config, cli)
}

/// Resolve the supervision policy, filling unset values from
/// [`SupervisionPolicy::default`].
pub fn supervision_policy(config: &LauncherConfig) -> SupervisionPolicy {
    let defaults = SupervisionPolicy::default();
    let s = &config.supervision;
    let ms = |value: Option<u64>, fallback: Duration| {
        value.map(Duration::from_millis).unwrap_or(fallback)
    };

    SupervisionPolicy {
        dialog_title: s.dialog_title.clone().unwrap_or(defaults.dialog_title),
        dialog_class: s.dialog_class.clone().unwrap_or(defaults.dialog_class),
        dialog_timeout: ms(s.dialog_timeout_ms, defaults.dialog_timeout),
        dialog_poll_interval: ms(s.dialog_poll_interval_ms, defaults.dialog_poll_interval),
        main_window_timeout: ms(s.main_window_timeout_ms, defaults.main_window_timeout),
        main_window_poll_interval: ms(
            s.main_window_poll_interval_ms,
            defaults.main_window_poll_interval,
        ),
        stale_kill_interval: ms(s.stale_kill_interval_ms, defaults.stale_kill_interval),
        stale_kill_max_attempts: s
            .stale_kill_max_attempts
            .unwrap_or(defaults.stale_kill_max_attempts),
        close: CloseOptions {
            wait_timeout: ms(s.close_timeout_ms, defaults.close.wait_timeout),
            kill_if_hung: s.kill_if_hung.unwrap_or(defaults.close.kill_if_hung),
            ..defaults.close
        },
    }
}

/// Copy of `config` with every unset value replaced by its default.
pub fn resolve_defaults(config: &LauncherConfig) -> LauncherConfig {
    let policy = supervision_policy(config);
    let ms = |d: Duration| Some(u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

    LauncherConfig {
        program: ProgramConfig {
            used_auto_save: Some(config.program.used_auto_save()),
            ..config.program.clone()
        },
        supervision: SupervisionConfig {
            dialog_title: Some(policy.dialog_title),
            dialog_class: Some(policy.dialog_class),
            dialog_timeout_ms: ms(policy.dialog_timeout),
            dialog_poll_interval_ms: ms(policy.dialog_poll_interval),
            main_window_timeout_ms: ms(policy.main_window_timeout),
            main_window_poll_interval_ms: ms(policy.main_window_poll_interval),
            stale_kill_interval_ms: ms(policy.stale_kill_interval),
            stale_kill_max_attempts: Some(policy.stale_kill_max_attempts),
            close_timeout_ms: ms(policy.close.wait_timeout),
            kill_if_hung: Some(policy.close.kill_if_hung),
        },
        project: ProjectConfig {
            extension: Some(config.project.extension().to_string()),
        },
    }
}
