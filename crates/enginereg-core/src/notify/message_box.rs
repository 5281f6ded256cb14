//! Blocking Windows message box.

// This module owns the user32 FFI boundary.
#![allow(unsafe_code)]

use super::Notifier;
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use windows_sys::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_OK};

/// Shows each notification in a modal `MessageBoxW` and waits for it to close.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageBoxNotifier;

impl Notifier for MessageBoxNotifier {
    fn notify(&self, title: &str, message: &str) {
        let text = to_wide(message);
        let caption = to_wide(title);

        // SAFETY: both strings are NUL-terminated and outlive the call; a null
        // owner window is allowed.
        unsafe {
            MessageBoxW(std::ptr::null_mut(), text.as_ptr(), caption.as_ptr(), MB_OK);
        }
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}
