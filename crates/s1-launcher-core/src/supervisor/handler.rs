use tracing::{debug, error, info, warn};

use crate::host::Host;
use crate::process::{Pid, ProcessError};
use crate::supervisor::errors::SupervisionError;
use crate::supervisor::types::{SupervisionOutcome, SupervisionPolicy, SupervisorState, TargetSpec};
use crate::window::{self, WindowCriteria, WindowHandle};

/// Result of one kill-stale / start / wait-for-main-window pass.
struct Launch {
    pid: Pid,
    main_window: Option<WindowHandle>,
}

/// Drives one target through the launch state machine.
///
/// Single-threaded and blocking: every wait polls through the host clock.
pub struct Supervisor<'a> {
    host: Host<'a>,
    policy: SupervisionPolicy,
    state: SupervisorState,
    history: Vec<SupervisorState>,
}

impl<'a> Supervisor<'a> {
    pub fn new(host: Host<'a>, policy: SupervisionPolicy) -> Self {
        Self {
            host,
            policy,
            state: SupervisorState::Idle,
            history: vec![SupervisorState::Idle],
        }
    }

    pub fn policy(&self) -> &SupervisionPolicy {
        &self.policy
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Every state entered during the last run, in order.
    pub fn history(&self) -> &[SupervisorState] {
        &self.history
    }

    fn transition(&mut self, next: SupervisorState) {
        info!(
            event = "core.supervisor.state_changed",
            from = %self.state,
            to = %next
        );
        self.state = next;
        self.history.push(next);
    }

    /// Launch `target` minimized and handle the trust prompt once.
    ///
    /// # Returns
    /// * `Ok(outcome)` - One of the three terminal outcomes
    /// * `Err(SupervisionError)` - Stale instances survived, process queries kept
    ///   failing, or the target could not be started
    pub fn run(&mut self, target: &TargetSpec) -> Result<SupervisionOutcome, SupervisionError> {
        self.state = SupervisorState::Idle;
        self.history = vec![SupervisorState::Idle];

        info!(
            event = "core.supervisor.run_started",
            program = %target.program_path().display(),
            process_name = target.process_name()
        );

        let result = self.run_inner(target);
        self.transition(SupervisorState::Done);

        match &result {
            Ok(outcome) => info!(
                event = "core.supervisor.run_completed",
                outcome = %outcome,
                pid = outcome.pid().as_u32()
            ),
            Err(e) => error!(event = "core.supervisor.run_failed", error = %e),
        }

        result
    }

    fn run_inner(&mut self, target: &TargetSpec) -> Result<SupervisionOutcome, SupervisionError> {
        let first = self.launch(target, false)?;
        let Some(main_window) = first.main_window else {
            return Ok(SupervisionOutcome::TimedOutWaitingForMainWindow {
                pid: first.pid,
                relaunched: false,
            });
        };

        self.transition(SupervisorState::WaitingDialog);
        let criteria = WindowCriteria::new(
            self.policy.dialog_title.clone(),
            first.pid,
            self.policy.dialog_class.clone(),
        );
        let dialog = window::poll_until_found(
            self.host,
            &criteria,
            self.policy.dialog_timeout,
            self.policy.dialog_poll_interval,
        );

        let Some(dialog) = dialog else {
            info!(
                event = "core.supervisor.dialog_absent",
                pid = first.pid.as_u32(),
                timeout_ms = self.policy.dialog_timeout.as_millis() as u64
            );
            return Ok(SupervisionOutcome::MainWindowAppeared {
                pid: first.pid,
                main_window,
            });
        };

        info!(
            event = "core.supervisor.dialog_found",
            pid = first.pid.as_u32(),
            handle = %dialog
        );

        self.transition(SupervisorState::ClosingDialog);
        let dialog_close = window::close_safely(self.host, dialog, self.policy.close);

        // One relaunch only; the relaunched instance is not checked for the dialog
        let second = self.launch(target, true)?;
        match second.main_window {
            Some(main_window) => Ok(SupervisionOutcome::DialogDismissedAndRelaunched {
                first_pid: first.pid,
                dialog,
                dialog_close,
                pid: second.pid,
                main_window,
            }),
            None => Ok(SupervisionOutcome::TimedOutWaitingForMainWindow {
                pid: second.pid,
                relaunched: true,
            }),
        }
    }

    /// Kill stale instances, start the target and wait for its main window.
    fn launch(&mut self, target: &TargetSpec, relaunch: bool) -> Result<Launch, SupervisionError> {
        if relaunch {
            self.transition(SupervisorState::Relaunching);
        } else {
            self.transition(SupervisorState::KillingStale);
        }
        self.kill_stale(target)?;

        if !relaunch {
            self.transition(SupervisorState::Starting);
        }
        let pid = self
            .host
            .processes
            .spawn_minimized(target.program_path())
            .map_err(|source| SupervisionError::SpawnFailed { source })?;

        info!(
            event = "core.supervisor.target_started",
            pid = pid.as_u32(),
            program = %target.program_path().display(),
            relaunch = relaunch
        );

        self.transition(if relaunch {
            SupervisorState::WaitingMainWindow2
        } else {
            SupervisorState::WaitingMainWindow
        });
        let main_window = self.wait_for_main_window(pid);

        Ok(Launch { pid, main_window })
    }

    /// Terminate every running instance of the target before a fresh launch.
    ///
    /// Runs at most `stale_kill_max_attempts` termination rounds. A launch never
    /// proceeds while an instance is still visible.
    fn kill_stale(&self, target: &TargetSpec) -> Result<(), SupervisionError> {
        let name = target.process_name();
        let max_attempts = self.policy.stale_kill_max_attempts;
        let mut attempts = 0;

        loop {
            let stale = match self.host.processes.find_by_name(name) {
                Ok(stale) => stale,
                Err(source) if attempts >= max_attempts => {
                    return Err(SupervisionError::ProcessQueryFailed {
                        name: name.to_string(),
                        source,
                    });
                }
                Err(e) => {
                    warn!(
                        event = "core.supervisor.stale_query_failed",
                        process_name = name,
                        attempt = attempts,
                        error = %e
                    );
                    attempts += 1;
                    self.host.clock.sleep(self.policy.stale_kill_interval);
                    continue;
                }
            };

            if stale.is_empty() {
                debug!(
                    event = "core.supervisor.stale_clear",
                    process_name = name,
                    attempts = attempts
                );
                return Ok(());
            }

            if attempts >= max_attempts {
                return Err(SupervisionError::StaleProcessesSurvived {
                    name: name.to_string(),
                    attempts,
                    pids: stale.into_iter().map(|info| info.pid).collect(),
                });
            }

            for info in &stale {
                info!(
                    event = "core.supervisor.stale_kill_started",
                    pid = info.pid.as_u32(),
                    process_name = %info.name
                );
                match self.host.processes.kill_named(info.pid, name) {
                    Ok(()) => info!(
                        event = "core.supervisor.stale_kill_completed",
                        pid = info.pid.as_u32()
                    ),
                    Err(ProcessError::NotFound { .. }) => info!(
                        event = "core.supervisor.stale_kill_already_dead",
                        pid = info.pid.as_u32()
                    ),
                    Err(e @ ProcessError::PidReused { .. }) => info!(
                        event = "core.supervisor.stale_kill_pid_reused",
                        pid = info.pid.as_u32(),
                        error = %e
                    ),
                    Err(e) => warn!(
                        event = "core.supervisor.stale_kill_failed",
                        pid = info.pid.as_u32(),
                        error = %e
                    ),
                }
            }

            attempts += 1;
            self.host.clock.sleep(self.policy.stale_kill_interval);
        }
    }

    /// Poll the process's main window until it exists or the timeout passes.
    ///
    /// A process the OS cannot resolve yet counts as "not ready", not as failure.
    fn wait_for_main_window(&self, pid: Pid) -> Option<WindowHandle> {
        let start = self.host.clock.now();

        loop {
            match self.host.processes.main_window(pid) {
                Ok(Some(handle)) => {
                    info!(
                        event = "core.supervisor.main_window_appeared",
                        pid = pid.as_u32(),
                        handle = %handle,
                        elapsed_ms = self.host.clock.elapsed_since(start).as_millis() as u64
                    );
                    return Some(handle);
                }
                Ok(None) => debug!(
                    event = "core.supervisor.main_window_pending",
                    pid = pid.as_u32()
                ),
                Err(e) => debug!(
                    event = "core.supervisor.process_not_ready",
                    pid = pid.as_u32(),
                    error = %e
                ),
            }

            if self.host.clock.elapsed_since(start) >= self.policy.main_window_timeout {
                warn!(
                    event = "core.supervisor.main_window_timed_out",
                    pid = pid.as_u32(),
                    timeout_ms = self.policy.main_window_timeout.as_millis() as u64
                );
                return None;
            }

            self.host.clock.sleep(self.policy.main_window_poll_interval);
        }
    }
}
