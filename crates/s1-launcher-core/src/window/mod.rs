pub mod errors;
pub mod handler;
pub mod traits;
pub mod types;

pub use errors::WindowError;
pub use handler::{close_safely, find_window, force_terminate_owner, poll_until_found, window_info};
pub use traits::WindowQuery;
pub use types::{CloseOptions, CloseOutcome, WindowCriteria, WindowHandle, WindowInfo};
