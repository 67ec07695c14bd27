//! Windows low-level hook implementation
//!
//! Installs WH_KEYBOARD_LL and WH_MOUSE_LL hooks on a dedicated Win32
//! message-loop thread. The OS removes a low-level hook whose callback
//! stalls, so the callbacks only translate the event and push it into the
//! capture channel; everything else happens downstream.
//!
//! # Safety
//!
//! `unsafe` here is confined to Win32 FFI. Hook callbacks run on the
//! message-loop thread with pointers owned by the OS for the duration of
//! the call.

#![cfg(target_os = "windows")]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::OnceLock;
use std::thread;

use tracing::{error, info};
use windows_sys::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::System::Threading::GetCurrentThreadId;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{VK_BACK, VK_SPACE};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    UnhookWindowsHookEx, HC_ACTION, KBDLLHOOKSTRUCT, MSG, MSLLHOOKSTRUCT, WH_KEYBOARD_LL,
    WH_MOUSE_LL, WM_KEYDOWN, WM_MOUSEMOVE, WM_QUIT, WM_SYSKEYDOWN,
};

use super::{CaptureError, InputSource, KeyPress, RawInputEvent};

/// Sender used by the hook callbacks; set once per process
static EVENT_SENDER: OnceLock<Sender<RawInputEvent>> = OnceLock::new();

/// Thread id of the message loop, so `stop()` can post WM_QUIT to it
static HOOK_THREAD_ID: AtomicU32 = AtomicU32::new(0);

/// Global input capture via Win32 low-level hooks
#[derive(Debug, Default)]
pub struct WindowsInputCapture;

impl WindowsInputCapture {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for WindowsInputCapture {
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel();

        EVENT_SENDER
            .set(tx)
            .map_err(|_| CaptureError::AlreadyStarted)?;

        thread::Builder::new()
            .name("input-hooks".to_string())
            .spawn(run_hook_message_loop)
            .map_err(|e| CaptureError::HookInstallFailed(e.to_string()))?;

        Ok(rx)
    }

    fn stop(&self) {
        let thread_id = HOOK_THREAD_ID.load(Ordering::SeqCst);
        if thread_id != 0 {
            // SAFETY: WM_QUIT ends the message loop on the hook thread,
            // which unhooks before exiting.
            unsafe {
                PostThreadMessageW(thread_id, WM_QUIT, 0, 0);
            }
        }
    }
}

/// Entry point for the dedicated Win32 message-loop thread
fn run_hook_message_loop() {
    // SAFETY: low-level hooks require a message pump on the installing
    // thread; both hooks are installed before the loop starts and removed
    // after it ends.
    unsafe {
        HOOK_THREAD_ID.store(GetCurrentThreadId(), Ordering::SeqCst);

        let keyboard_hook = SetWindowsHookExW(
            WH_KEYBOARD_LL,
            Some(keyboard_hook_proc),
            std::ptr::null_mut(),
            0,
        );
        let mouse_hook =
            SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), std::ptr::null_mut(), 0);

        if keyboard_hook.is_null() || mouse_hook.is_null() {
            error!("Failed to install input hooks; activity monitoring disabled");
            if !keyboard_hook.is_null() {
                UnhookWindowsHookEx(keyboard_hook);
            }
            if !mouse_hook.is_null() {
                UnhookWindowsHookEx(mouse_hook);
            }
            return;
        }

        info!("Input hooks installed");

        let mut msg: MSG = std::mem::zeroed();
        while GetMessageW(&mut msg, std::ptr::null_mut(), 0, 0) > 0 {
            DispatchMessageW(&msg);
        }

        UnhookWindowsHookEx(keyboard_hook);
        UnhookWindowsHookEx(mouse_hook);
    }

    info!("Input hooks removed");
}

fn forward(event: RawInputEvent) {
    if let Some(sender) = EVENT_SENDER.get() {
        let _ = sender.send(event);
    }
}

unsafe extern "system" fn keyboard_hook_proc(
    code: i32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if code == HC_ACTION as i32
        && (wparam == WM_KEYDOWN as usize || wparam == WM_SYSKEYDOWN as usize)
    {
        let info = &*(lparam as *const KBDLLHOOKSTRUCT);
        let key = match info.vkCode as u16 {
            VK_BACK => KeyPress::Backspace,
            VK_SPACE => KeyPress::Space,
            _ => KeyPress::Other,
        };
        forward(RawInputEvent::Key { key });
    }
    CallNextHookEx(std::ptr::null_mut(), code, wparam, lparam)
}

unsafe extern "system" fn mouse_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 && wparam == WM_MOUSEMOVE as usize {
        let info = &*(lparam as *const MSLLHOOKSTRUCT);
        forward(RawInputEvent::PointerMove {
            x: info.pt.x,
            y: info.pt.y,
        });
    }
    CallNextHookEx(std::ptr::null_mut(), code, wparam, lparam)
}
