//! In-memory window/process table and manual clock for tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::clock::Clock;
use crate::process::{Pid, ProcessControl, ProcessError, ProcessInfo, process_stem};
use crate::window::{WindowError, WindowHandle, WindowQuery};

pub(crate) const MAIN_WINDOW_CLASS: &str = "CCLWindowClass";

/// Clock that only moves when something sleeps on it.
pub(crate) struct FakeClock {
    start: Instant,
    elapsed: Cell<Duration>,
}

impl FakeClock {
    pub(crate) fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed.get()
    }

    fn sleep(&self, duration: Duration) {
        self.elapsed.set(self.elapsed.get() + duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseBehavior {
    After(Duration),
    Ignore,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeWindow {
    title: String,
    class_name: String,
    pid: Pid,
    appears_at: Duration,
    hung: bool,
    close_behavior: CloseBehavior,
    main: bool,
}

impl FakeWindow {
    pub(crate) fn new(title: &str, class_name: &str, pid: Pid) -> Self {
        Self {
            title: title.to_string(),
            class_name: class_name.to_string(),
            pid,
            appears_at: Duration::ZERO,
            hung: false,
            close_behavior: CloseBehavior::After(Duration::ZERO),
            main: false,
        }
    }

    pub(crate) fn appearing_at(mut self, at: Duration) -> Self {
        self.appears_at = at;
        self
    }

    pub(crate) fn hung(mut self) -> Self {
        self.hung = true;
        self
    }

    pub(crate) fn ignores_close(mut self) -> Self {
        self.close_behavior = CloseBehavior::Ignore;
        self
    }

    pub(crate) fn closes_after(mut self, delay: Duration) -> Self {
        self.close_behavior = CloseBehavior::After(delay);
        self
    }

    fn main_window(mut self) -> Self {
        self.main = true;
        self
    }
}

/// What the next spawned instance does, relative to its launch time.
#[derive(Debug, Clone, Default)]
pub(crate) struct LaunchScript {
    /// Process is invisible to queries until this offset
    pub(crate) registered_after: Duration,
    /// Main window appears at this offset; `None` means never
    pub(crate) main_window_after: Option<Duration>,
    /// Dialog window appearing at an offset
    pub(crate) dialog: Option<(Duration, FakeWindowSpec)>,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeWindowSpec {
    pub(crate) title: String,
    pub(crate) class_name: String,
    pub(crate) ignores_close: bool,
    pub(crate) hung: bool,
}

impl FakeWindowSpec {
    pub(crate) fn new(title: &str, class_name: &str) -> Self {
        Self {
            title: title.to_string(),
            class_name: class_name.to_string(),
            ignores_close: false,
            hung: false,
        }
    }

    pub(crate) fn hung(mut self) -> Self {
        self.hung = true;
        self
    }
}

impl LaunchScript {
    pub(crate) fn main_window_at(after: Duration) -> Self {
        Self {
            main_window_after: Some(after),
            ..Self::default()
        }
    }

    pub(crate) fn with_dialog(mut self, after: Duration, spec: FakeWindowSpec) -> Self {
        self.dialog = Some((after, spec));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchRecord {
    pub(crate) pid: Pid,
    pub(crate) at: Duration,
    /// Same-named processes still alive when the launch happened
    pub(crate) live_namesakes: usize,
}

struct WindowState {
    handle: WindowHandle,
    window: FakeWindow,
    destroyed: bool,
    close_requested_at: Option<Duration>,
}

struct ProcessState {
    pid: Pid,
    name: String,
    alive: bool,
    registered_at: Duration,
    resist_kills: u32,
}

#[derive(Default)]
struct State {
    windows: Vec<WindowState>,
    processes: Vec<ProcessState>,
    scripts: VecDeque<LaunchScript>,
    launches: Vec<LaunchRecord>,
    kills: Vec<Pid>,
    close_requests: usize,
    next_handle: u64,
    next_pid: u32,
    reverse: bool,
    fail_enumeration: bool,
    fail_spawn: bool,
    failing_queries: u32,
    destroy_after_enumeration: HashSet<WindowHandle>,
    query_log: HashMap<String, usize>,
    renames_after_query: Vec<(Pid, String)>,
}

/// Fake OS window/process table driven by a [`FakeClock`].
pub(crate) struct FakeDesktop<'a> {
    clock: &'a FakeClock,
    state: RefCell<State>,
}

impl<'a> FakeDesktop<'a> {
    pub(crate) fn new(clock: &'a FakeClock) -> Self {
        Self {
            clock,
            state: RefCell::new(State {
                next_handle: 0x1000,
                next_pid: 1000,
                ..State::default()
            }),
        }
    }

    fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    pub(crate) fn add_process(&self, name: &str) -> Pid {
        let mut state = self.state.borrow_mut();
        let pid = Pid::from_raw(state.next_pid);
        state.next_pid += 1;
        state.processes.push(ProcessState {
            pid,
            name: name.to_string(),
            alive: true,
            registered_at: Duration::ZERO,
            resist_kills: 0,
        });
        pid
    }

    pub(crate) fn add_window(&self, window: FakeWindow) -> WindowHandle {
        let mut state = self.state.borrow_mut();
        let handle = WindowHandle::from_raw(state.next_handle);
        state.next_handle += 0x10;
        state.windows.push(WindowState {
            handle,
            window,
            destroyed: false,
            close_requested_at: None,
        });
        handle
    }

    pub(crate) fn script_launch(&self, script: LaunchScript) {
        self.state.borrow_mut().scripts.push_back(script);
    }

    /// Next `count` kill requests for `pid` fail.
    pub(crate) fn resist_kills(&self, pid: Pid, count: u32) {
        if let Some(process) = self
            .state
            .borrow_mut()
            .processes
            .iter_mut()
            .find(|p| p.pid == pid)
        {
            process.resist_kills = count;
        }
    }

    pub(crate) fn reverse_enumeration(&self) {
        self.state.borrow_mut().reverse = true;
    }

    pub(crate) fn fail_enumeration(&self, fail: bool) {
        self.state.borrow_mut().fail_enumeration = fail;
    }

    pub(crate) fn fail_spawn(&self, fail: bool) {
        self.state.borrow_mut().fail_spawn = fail;
    }

    /// After the next name query, `pid` belongs to a program called `name`.
    pub(crate) fn reuse_pid_after_query(&self, pid: Pid, name: &str) {
        self.state
            .borrow_mut()
            .renames_after_query
            .push((pid, name.to_string()));
    }

    /// Next `count` name queries fail.
    pub(crate) fn fail_queries(&self, count: u32) {
        self.state.borrow_mut().failing_queries = count;
    }

    pub(crate) fn destroy_after_enumeration(&self, handle: WindowHandle) {
        self.state
            .borrow_mut()
            .destroy_after_enumeration
            .insert(handle);
    }

    pub(crate) fn launches(&self) -> Vec<LaunchRecord> {
        self.state.borrow().launches.clone()
    }

    pub(crate) fn kills(&self) -> Vec<Pid> {
        self.state.borrow().kills.clone()
    }

    pub(crate) fn close_requests(&self) -> usize {
        self.state.borrow().close_requests
    }

    pub(crate) fn name_queries(&self, stem: &str) -> usize {
        self.state.borrow().query_log.get(stem).copied().unwrap_or(0)
    }

    pub(crate) fn is_alive(&self, pid: Pid) -> bool {
        self.state
            .borrow()
            .processes
            .iter()
            .any(|p| p.pid == pid && p.alive)
    }

    fn window_valid(&self, state: &State, window: &WindowState) -> bool {
        let now = self.now();
        if window.destroyed || window.window.appears_at > now {
            return false;
        }

        let owner_alive = state
            .processes
            .iter()
            .any(|p| p.pid == window.window.pid && p.alive);
        if !owner_alive {
            return false;
        }

        match (window.close_requested_at, window.window.close_behavior) {
            (Some(requested), CloseBehavior::After(delay)) => requested + delay > now,
            _ => true,
        }
    }

    fn with_valid_window<T>(
        &self,
        handle: WindowHandle,
        read: impl FnOnce(&WindowState) -> T,
    ) -> Option<T> {
        let state = self.state.borrow();
        state
            .windows
            .iter()
            .find(|w| w.handle == handle)
            .filter(|w| self.window_valid(&state, w))
            .map(read)
    }
}

impl WindowQuery for FakeDesktop<'_> {
    fn enumerate(&self) -> Result<Vec<WindowHandle>, WindowError> {
        let mut handles: Vec<WindowHandle> = {
            let state = self.state.borrow();
            if state.fail_enumeration {
                return Err(WindowError::EnumerationFailed {
                    message: "simulated failure".to_string(),
                });
            }
            state
                .windows
                .iter()
                .filter(|w| self.window_valid(&state, w))
                .map(|w| w.handle)
                .collect()
        };

        let mut state = self.state.borrow_mut();
        if state.reverse {
            handles.reverse();
        }

        let doomed = std::mem::take(&mut state.destroy_after_enumeration);
        for window in state.windows.iter_mut() {
            if doomed.contains(&window.handle) {
                window.destroyed = true;
            }
        }

        Ok(handles)
    }

    fn title(&self, handle: WindowHandle) -> String {
        self.with_valid_window(handle, |w| w.window.title.clone())
            .unwrap_or_default()
    }

    fn class_name(&self, handle: WindowHandle) -> String {
        self.with_valid_window(handle, |w| w.window.class_name.clone())
            .unwrap_or_default()
    }

    fn owner_pid(&self, handle: WindowHandle) -> Option<Pid> {
        self.with_valid_window(handle, |w| w.window.pid)
    }

    fn is_valid(&self, handle: WindowHandle) -> bool {
        self.with_valid_window(handle, |_| ()).is_some()
    }

    fn is_hung(&self, handle: WindowHandle) -> bool {
        self.with_valid_window(handle, |w| w.window.hung)
            .unwrap_or(false)
    }

    fn post_close(&self, handle: WindowHandle) -> Result<(), WindowError> {
        if !self.is_valid(handle) {
            return Err(WindowError::PostCloseFailed {
                handle,
                message: "invalid window handle".to_string(),
            });
        }

        let now = self.now();
        let mut state = self.state.borrow_mut();
        state.close_requests += 1;
        if let Some(window) = state.windows.iter_mut().find(|w| w.handle == handle) {
            window.close_requested_at.get_or_insert(now);
        }
        Ok(())
    }
}

impl ProcessControl for FakeDesktop<'_> {
    fn find_by_name(&self, stem: &str) -> Result<Vec<ProcessInfo>, ProcessError> {
        let now = self.now();
        let mut state = self.state.borrow_mut();
        *state.query_log.entry(stem.to_string()).or_insert(0) += 1;

        if state.failing_queries > 0 {
            state.failing_queries -= 1;
            return Err(ProcessError::SystemError {
                message: "simulated query failure".to_string(),
            });
        }

        let found: Vec<ProcessInfo> = state
            .processes
            .iter()
            .filter(|p| p.alive && p.registered_at <= now)
            .filter(|p| process_stem(&p.name).eq_ignore_ascii_case(stem))
            .map(|p| ProcessInfo {
                pid: p.pid,
                name: p.name.clone(),
            })
            .collect();

        for (pid, name) in std::mem::take(&mut state.renames_after_query) {
            if let Some(process) = state.processes.iter_mut().find(|p| p.pid == pid) {
                process.name = name;
            }
        }

        Ok(found)
    }

    fn kill(&self, pid: Pid) -> Result<(), ProcessError> {
        let mut state = self.state.borrow_mut();
        let process = state
            .processes
            .iter_mut()
            .find(|p| p.pid == pid && p.alive)
            .ok_or(ProcessError::NotFound { pid: pid.as_u32() })?;

        if process.resist_kills > 0 {
            process.resist_kills -= 1;
            return Err(ProcessError::KillFailed {
                pid: pid.as_u32(),
                message: "simulated access denied".to_string(),
            });
        }

        process.alive = false;
        state.kills.push(pid);
        Ok(())
    }

    fn kill_named(&self, pid: Pid, stem: &str) -> Result<(), ProcessError> {
        let actual = {
            let state = self.state.borrow();
            state
                .processes
                .iter()
                .find(|p| p.pid == pid && p.alive)
                .map(|p| p.name.clone())
                .ok_or(ProcessError::NotFound { pid: pid.as_u32() })?
        };

        if !process_stem(&actual).eq_ignore_ascii_case(stem) {
            return Err(ProcessError::PidReused {
                pid: pid.as_u32(),
                expected: stem.to_string(),
                actual,
            });
        }

        self.kill(pid)
    }

    fn spawn_minimized(&self, program: &Path) -> Result<Pid, ProcessError> {
        let now = self.now();
        let name = program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let script = {
            let mut state = self.state.borrow_mut();
            if state.fail_spawn {
                return Err(ProcessError::SpawnFailed {
                    program: program.display().to_string(),
                    message: "simulated spawn failure".to_string(),
                });
            }

            let live_namesakes = state
                .processes
                .iter()
                .filter(|p| {
                    p.alive && process_stem(&p.name).eq_ignore_ascii_case(process_stem(&name))
                })
                .count();

            let pid = Pid::from_raw(state.next_pid);
            state.next_pid += 1;
            let script = state.scripts.pop_front().unwrap_or_default();
            state.processes.push(ProcessState {
                pid,
                name: name.clone(),
                alive: true,
                registered_at: now + script.registered_after,
                resist_kills: 0,
            });
            state.launches.push(LaunchRecord {
                pid,
                at: now,
                live_namesakes,
            });
            (pid, script)
        };

        let (pid, script) = script;
        if let Some(after) = script.main_window_after {
            self.add_window(
                FakeWindow::new("Studio One", MAIN_WINDOW_CLASS, pid)
                    .appearing_at(now + after)
                    .main_window(),
            );
        }
        if let Some((after, spec)) = script.dialog {
            let mut dialog =
                FakeWindow::new(&spec.title, &spec.class_name, pid).appearing_at(now + after);
            if spec.ignores_close {
                dialog = dialog.ignores_close();
            }
            if spec.hung {
                dialog = dialog.hung();
            }
            self.add_window(dialog);
        }

        Ok(pid)
    }

    fn main_window(&self, pid: Pid) -> Result<Option<WindowHandle>, ProcessError> {
        let now = self.now();
        let state = self.state.borrow();
        let known = state
            .processes
            .iter()
            .any(|p| p.pid == pid && p.alive && p.registered_at <= now);
        if !known {
            return Err(ProcessError::NotFound { pid: pid.as_u32() });
        }

        Ok(state
            .windows
            .iter()
            .filter(|w| w.window.main && w.window.pid == pid)
            .find(|w| self.window_valid(&state, w))
            .map(|w| w.handle))
    }
}
