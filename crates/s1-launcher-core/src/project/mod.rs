pub mod errors;
pub mod handler;
pub mod types;

pub use errors::ProjectError;
pub use handler::{find_project_file, prepare_project, restore_autosave};
pub use types::{AUTOSAVE_SUFFIX, AutosaveRestore, PreparedProject};
