//! # Configuration System
//!
//! Hierarchical TOML configuration for the launcher.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.s1-launcher/config.toml`
//! 3. **Project config** - `./.s1-launcher/config.toml`
//! 4. **Explicit file** - `--config <path>`
//! 5. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! [program]
//! path = "C:/Program Files/PreSonus/Studio One 6/Studio One.exe"
//! project_folder = "D:/Music/Current Song"
//! used_auto_save = true
//!
//! [supervision]
//! dialog_timeout_ms = 3000
//! main_window_timeout_ms = 120000
//! kill_if_hung = false
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use loading::{
    ConfigOverrides, apply_overrides, load_config_file, load_hierarchy, merge_configs,
    resolve_defaults,
};
pub use types::{LauncherConfig, ProgramConfig, ProjectConfig, SupervisionConfig};
pub use validation::{require_program_path, validate_config};

impl LauncherConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy(
        explicit: Option<&std::path::Path>,
    ) -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy(explicit)
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }

    /// Resolve the supervision timings, filling unset values with defaults.
    ///
    /// See [`loading::supervision_policy`] for details.
    pub fn supervision_policy(&self) -> crate::supervisor::SupervisionPolicy {
        loading::supervision_policy(self)
    }
}
