pub mod errors;
pub mod operations;
pub mod traits;
pub mod types;

pub use errors::ProcessError;
pub use operations::{
    base_name, find_processes_by_name, is_process_running, kill_process, process_stem,
};
pub use traits::ProcessControl;
pub use types::{Pid, ProcessInfo};
