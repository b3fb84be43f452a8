use crate::clock::Clock;
use crate::process::ProcessControl;
use crate::window::WindowQuery;

/// The OS capabilities one supervision run works against.
///
/// Bundles borrowed trait objects so the window handler and the supervisor
/// never touch global OS bindings directly.
#[derive(Clone, Copy)]
pub struct Host<'a> {
    pub windows: &'a dyn WindowQuery,
    pub processes: &'a dyn ProcessControl,
    pub clock: &'a dyn Clock,
}

impl<'a> Host<'a> {
    pub fn new(
        windows: &'a dyn WindowQuery,
        processes: &'a dyn ProcessControl,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            windows,
            processes,
            clock,
        }
    }
}
