//! Configuration type definitions.
//!
//! Every field is optional so config layers can be merged; unset values
//! fall back to the defaults in [`super::defaults`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration loaded from TOML config files.
///
/// Only the three sections are accepted at the top level, so a flat legacy
/// file (`programPath = ...` without `[program]`) fails to parse.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LauncherConfig {
    /// What to launch and where its project lives
    #[serde(default)]
    pub program: ProgramConfig,

    /// Polling bounds and trust prompt identity
    #[serde(default)]
    pub supervision: SupervisionConfig,

    /// Project file lookup
    #[serde(default)]
    pub project: ProjectConfig,
}

/// The target application.
///
/// Accepts the camelCase keys of older launcher configs as aliases.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProgramConfig {
    /// Path to the Studio One executable.
    #[serde(default, alias = "programPath", skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Folder holding the project to restore before launch.
    #[serde(default, alias = "projectFolderPath", skip_serializing_if = "Option::is_none")]
    pub project_folder: Option<PathBuf>,

    /// Whether to move the project's autosave over the project file before launch.
    /// Default: false.
    #[serde(default, alias = "usedAutoSave", skip_serializing_if = "Option::is_none")]
    pub used_auto_save: Option<bool>,
}

impl ProgramConfig {
    pub fn used_auto_save(&self) -> bool {
        self.used_auto_save.unwrap_or(false)
    }
}

/// Supervision timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SupervisionConfig {
    /// Title substring of the trust prompt. Default: "Studio One 安全".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_title: Option<String>,

    /// Window class of the trust prompt. Default: "CCLDialogClass".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_class: Option<String>,

    /// How long to watch for the trust prompt after the main window shows.
    /// Default: 3000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_timeout_ms: Option<u64>,

    /// Default: 100ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_poll_interval_ms: Option<u64>,

    /// How long to wait for the main window. Default: 120000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_window_timeout_ms: Option<u64>,

    /// Default: 1000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_window_poll_interval_ms: Option<u64>,

    /// Pause between stale-instance termination rounds. Default: 1000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_kill_interval_ms: Option<u64>,

    /// Termination rounds before giving up on stale instances. Default: 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_kill_max_attempts: Option<u32>,

    /// How long to wait for the trust prompt to close. Default: 5000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_timeout_ms: Option<u64>,

    /// Terminate the target if the trust prompt hangs or will not close.
    /// Default: false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kill_if_hung: Option<bool>,
}

/// Project file lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Project file extension without the dot. Default: "song".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl ProjectConfig {
    pub fn extension(&self) -> &str {
        self.extension
            .as_deref()
            .unwrap_or(super::defaults::DEFAULT_PROJECT_EXTENSION)
    }
}
