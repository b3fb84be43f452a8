use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::LauncherConfig;
use crate::project::errors::ProjectError;
use crate::project::types::{AUTOSAVE_SUFFIX, AutosaveRestore, PreparedProject};

/// First file in `folder` ending in `.{extension}`, in sorted order.
///
/// Only the folder itself is searched. A missing folder yields `None`.
pub fn find_project_file(folder: &Path, extension: &str) -> Result<Option<PathBuf>, ProjectError> {
    if !folder.is_dir() {
        debug!(
            event = "core.project.folder_missing",
            folder = %folder.display()
        );
        return Ok(None);
    }

    // Folder names may hold glob metacharacters, so escape them
    let pattern = Path::new(&glob::Pattern::escape(&folder.to_string_lossy()))
        .join(format!("*.{}", glob::Pattern::escape(extension)))
        .to_string_lossy()
        .into_owned();

    let entries = glob::glob(&pattern).map_err(|e| ProjectError::InvalidPattern {
        pattern: pattern.clone(),
        message: e.to_string(),
    })?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(event = "core.project.entry_unreadable", error = %e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    matches.sort();

    let found = matches.into_iter().next();
    debug!(
        event = "core.project.search_completed",
        folder = %folder.display(),
        found = ?found
    );
    Ok(found)
}

/// Move `<project_file>.autosave` over `project_file` if it exists.
pub fn restore_autosave(project_file: &Path) -> Result<AutosaveRestore, ProjectError> {
    let mut autosave = project_file.as_os_str().to_owned();
    autosave.push(AUTOSAVE_SUFFIX);
    let autosave = PathBuf::from(autosave);

    if !autosave.is_file() {
        debug!(
            event = "core.project.autosave_missing",
            project = %project_file.display()
        );
        return Ok(AutosaveRestore::NoAutosave);
    }

    // rename replaces an existing project file in one step
    fs::rename(&autosave, project_file).map_err(|source| ProjectError::RestoreFailed {
        project: project_file.display().to_string(),
        autosave: autosave.display().to_string(),
        source,
    })?;

    info!(
        event = "core.project.autosave_restored",
        project = %project_file.display(),
        from = %autosave.display()
    );
    Ok(AutosaveRestore::Restored { from: autosave })
}

/// Locate the configured project and restore its autosave when enabled.
///
/// Returns `None` when no project folder is configured.
pub fn prepare_project(config: &LauncherConfig) -> Result<Option<PreparedProject>, ProjectError> {
    let Some(folder) = config.program.project_folder.as_deref() else {
        return Ok(None);
    };

    let project_file = find_project_file(folder, config.project.extension())?;

    let autosave = match (&project_file, config.program.used_auto_save()) {
        (Some(file), true) => restore_autosave(file)?,
        (None, true) => AutosaveRestore::NoAutosave,
        (_, false) => AutosaveRestore::Disabled,
    };

    Ok(Some(PreparedProject {
        project_file,
        autosave,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn config_for(folder: &Path, auto_save: bool) -> LauncherConfig {
        let mut config = LauncherConfig::default();
        config.program.project_folder = Some(folder.to_path_buf());
        config.program.used_auto_save = Some(auto_save);
        config
    }

    #[test]
    fn test_find_project_file_picks_first_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.song", "");
        touch(dir.path(), "a.song", "");
        touch(dir.path(), "a.song.autosave", "");
        touch(dir.path(), "notes.txt", "");

        let found = find_project_file(dir.path(), "song").unwrap();
        assert_eq!(found, Some(dir.path().join("a.song")));
    }

    #[test]
    fn test_find_project_file_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("History")).unwrap();
        touch(&dir.path().join("History"), "old.song", "");

        assert_eq!(find_project_file(dir.path(), "song").unwrap(), None);
    }

    #[test]
    fn test_find_project_file_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let found = find_project_file(&dir.path().join("gone"), "song").unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_find_project_file_folder_with_brackets() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("Demo [final]");
        fs::create_dir(&folder).unwrap();
        touch(&folder, "mix.song", "");

        let found = find_project_file(&folder, "song").unwrap();
        assert_eq!(found, Some(folder.join("mix.song")));
    }

    #[test]
    fn test_restore_autosave_replaces_project() {
        let dir = tempfile::tempdir().unwrap();
        let project = touch(dir.path(), "mix.song", "old");
        let autosave = touch(dir.path(), "mix.song.autosave", "new");

        let result = restore_autosave(&project).unwrap();
        assert_eq!(result, AutosaveRestore::Restored { from: autosave.clone() });
        assert_eq!(fs::read_to_string(&project).unwrap(), "new");
        assert!(!autosave.exists());
    }

    #[test]
    fn test_failed_restore_keeps_project() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the project path makes the rename fail
        let project = dir.path().join("mix.song");
        fs::create_dir(&project).unwrap();
        touch(&project, "keep.txt", "old");
        let autosave = touch(dir.path(), "mix.song.autosave", "new");

        let result = restore_autosave(&project);

        assert!(matches!(result, Err(ProjectError::RestoreFailed { .. })));
        assert_eq!(fs::read_to_string(project.join("keep.txt")).unwrap(), "old");
        assert_eq!(fs::read_to_string(&autosave).unwrap(), "new");
    }

    #[test]
    fn test_restore_autosave_without_autosave() {
        let dir = tempfile::tempdir().unwrap();
        let project = touch(dir.path(), "mix.song", "old");

        assert_eq!(restore_autosave(&project).unwrap(), AutosaveRestore::NoAutosave);
        assert_eq!(fs::read_to_string(&project).unwrap(), "old");
    }

    #[test]
    fn test_prepare_project_without_folder() {
        assert_eq!(prepare_project(&LauncherConfig::default()).unwrap(), None);
    }

    #[test]
    fn test_prepare_project_disabled_leaves_files() {
        let dir = tempfile::tempdir().unwrap();
        let project = touch(dir.path(), "mix.song", "old");
        touch(dir.path(), "mix.song.autosave", "new");

        let prepared = prepare_project(&config_for(dir.path(), false))
            .unwrap()
            .unwrap();
        assert_eq!(prepared.project_file, Some(project.clone()));
        assert_eq!(prepared.autosave, AutosaveRestore::Disabled);
        assert_eq!(fs::read_to_string(&project).unwrap(), "old");
    }

    #[test]
    fn test_prepare_project_restores() {
        let dir = tempfile::tempdir().unwrap();
        let project = touch(dir.path(), "mix.song", "old");
        touch(dir.path(), "mix.song.autosave", "new");

        let prepared = prepare_project(&config_for(dir.path(), true))
            .unwrap()
            .unwrap();
        assert!(matches!(prepared.autosave, AutosaveRestore::Restored { .. }));
        assert_eq!(fs::read_to_string(&project).unwrap(), "new");
    }

    #[test]
    fn test_prepare_project_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        let prepared = prepare_project(&config_for(dir.path(), true))
            .unwrap()
            .unwrap();
        assert_eq!(prepared.project_file, None);
        assert_eq!(prepared.autosave, AutosaveRestore::NoAutosave);
    }
}
