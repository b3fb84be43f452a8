//! Launch supervision state machine.
//!
//! `Idle → KillingStale → Starting → WaitingMainWindow → WaitingDialog`
//! then either `Done`, or `ClosingDialog → Relaunching → WaitingMainWindow2 → Done`
//! when the trust prompt shows up.

pub mod errors;
pub mod handler;
pub mod types;

pub use errors::SupervisionError;
pub use handler::Supervisor;
pub use types::{SupervisionOutcome, SupervisionPolicy, SupervisorState, TargetSpec};
