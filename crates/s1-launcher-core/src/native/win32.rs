//! Win32 bindings for window queries and the minimized spawn.

use std::ffi::c_void;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use windows::Win32::Foundation::{CloseHandle, HWND, LPARAM, WPARAM};
use windows::Win32::System::Threading::{
    CreateProcessW, PROCESS_CREATION_FLAGS, PROCESS_INFORMATION, STARTF_USESHOWWINDOW, STARTUPINFOW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GW_OWNER, GetClassNameW, GetWindow, GetWindowTextW, GetWindowThreadProcessId,
    IsHungAppWindow, IsWindow, IsWindowVisible, PostMessageW, SC_CLOSE, SW_SHOWMINNOACTIVE,
    WM_SYSCOMMAND,
};
use windows::core::{BOOL, PCWSTR, PWSTR};

use crate::process::{Pid, ProcessError};
use crate::window::{WindowError, WindowHandle};

// Titles and class names longer than this are truncated, which is fine for
// substring and exact-class matching on dialog-sized strings.
const TEXT_BUFFER_LEN: usize = 512;

fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.as_raw() as usize as *mut c_void)
}

fn handle(hwnd: HWND) -> WindowHandle {
    WindowHandle::from_raw(hwnd.0 as usize as u64)
}

unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the &mut Vec passed by `enumerate`, alive for the whole EnumWindows call
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<WindowHandle>) };
    handles.push(handle(hwnd));
    BOOL(1)
}

pub(super) fn enumerate() -> Result<Vec<WindowHandle>, WindowError> {
    let mut handles: Vec<WindowHandle> = Vec::new();
    unsafe {
        EnumWindows(
            Some(collect_window),
            LPARAM(&mut handles as *mut Vec<WindowHandle> as isize),
        )
    }
    .map_err(|e| WindowError::EnumerationFailed {
        message: e.to_string(),
    })?;
    Ok(handles)
}

fn read_utf16(read: impl FnOnce(&mut [u16]) -> i32) -> String {
    let mut buf = [0u16; TEXT_BUFFER_LEN];
    let len = read(&mut buf).clamp(0, TEXT_BUFFER_LEN as i32) as usize;
    String::from_utf16_lossy(&buf[..len])
}

pub(super) fn title(handle: WindowHandle) -> String {
    read_utf16(|buf| unsafe { GetWindowTextW(hwnd(handle), buf) })
}

pub(super) fn class_name(handle: WindowHandle) -> String {
    read_utf16(|buf| unsafe { GetClassNameW(hwnd(handle), buf) })
}

pub(super) fn owner_pid(handle: WindowHandle) -> Option<Pid> {
    let mut pid: u32 = 0;
    let thread = unsafe { GetWindowThreadProcessId(hwnd(handle), Some(&mut pid as *mut u32)) };
    if thread == 0 || pid == 0 {
        None
    } else {
        Some(Pid::from_raw(pid))
    }
}

pub(super) fn is_valid(handle: WindowHandle) -> bool {
    handle.as_raw() != 0 && unsafe { IsWindow(Some(hwnd(handle))) }.as_bool()
}

pub(super) fn is_hung(handle: WindowHandle) -> bool {
    unsafe { IsHungAppWindow(hwnd(handle)) }.as_bool()
}

pub(super) fn post_close(handle: WindowHandle) -> Result<(), WindowError> {
    // Same path as clicking the caption's close button
    unsafe {
        PostMessageW(
            Some(hwnd(handle)),
            WM_SYSCOMMAND,
            WPARAM(SC_CLOSE as usize),
            LPARAM(0),
        )
    }
    .map_err(|e| WindowError::PostCloseFailed {
        handle,
        message: e.to_string(),
    })
}

/// First visible, unowned top-level window of `pid`.
pub(super) fn main_window(pid: Pid) -> Option<WindowHandle> {
    enumerate().ok()?.into_iter().find(|&candidate| {
        let window = hwnd(candidate);
        owner_pid(candidate) == Some(pid)
            && unsafe { IsWindowVisible(window) }.as_bool()
            && unsafe { GetWindow(window, GW_OWNER) }
                .map(|owner| owner.is_invalid())
                .unwrap_or(true)
    })
}

pub(super) fn spawn_minimized(program: &Path) -> Result<Pid, ProcessError> {
    let spawn_failed = |message: String| ProcessError::SpawnFailed {
        program: program.display().to_string(),
        message,
    };

    let application: Vec<u16> = program
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    let mut command_line: Vec<u16> = format!("\"{}\"", program.display())
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect();

    let startup = STARTUPINFOW {
        cb: std::mem::size_of::<STARTUPINFOW>() as u32,
        dwFlags: STARTF_USESHOWWINDOW,
        wShowWindow: SW_SHOWMINNOACTIVE.0 as u16,
        ..Default::default()
    };
    let mut info = PROCESS_INFORMATION::default();

    unsafe {
        CreateProcessW(
            PCWSTR(application.as_ptr()),
            Some(PWSTR(command_line.as_mut_ptr())),
            None,
            None,
            false,
            PROCESS_CREATION_FLAGS(0),
            None,
            PCWSTR::null(),
            &startup,
            &mut info,
        )
    }
    .map_err(|e| spawn_failed(e.to_string()))?;

    // The launcher never waits on these handles
    unsafe {
        let _ = CloseHandle(info.hProcess);
        let _ = CloseHandle(info.hThread);
    }

    Pid::new(info.dwProcessId).map_err(|e| spawn_failed(e.to_string()))
}
