use serde::Serialize;
use std::path::PathBuf;

/// Suffix Studio One appends to a project file for its autosave copy.
pub const AUTOSAVE_SUFFIX: &str = ".autosave";

/// What happened to the autosave copy of a project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "autosave", rename_all = "snake_case")]
pub enum AutosaveRestore {
    /// The autosave replaced the project file.
    Restored { from: PathBuf },
    /// No autosave sits next to the project file.
    NoAutosave,
    /// Restore is turned off in config.
    Disabled,
}

/// Result of preparing the project folder before launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedProject {
    /// First project file found, if any.
    pub project_file: Option<PathBuf>,
    pub autosave: AutosaveRestore,
}
