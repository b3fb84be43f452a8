//! Default values and well-known config locations.

use std::path::PathBuf;

/// Extension of Studio One project files.
pub const DEFAULT_PROJECT_EXTENSION: &str = "song";

/// Directory holding launcher config, under the home or working directory.
pub const CONFIG_DIR_NAME: &str = ".s1-launcher";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// `~/.s1-launcher/config.toml`, if a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// `./.s1-launcher/config.toml`, relative to the working directory.
pub fn project_config_path() -> Result<PathBuf, std::io::Error> {
    Ok(std::env::current_dir()?
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_config_path_is_under_cwd() {
        let path = project_config_path().unwrap();
        assert!(path.ends_with(".s1-launcher/config.toml"));
    }
}
