//! Windows registry store under `HKEY_CURRENT_USER`.
//!
//! Values are stored as `REG_SZ`. Enumeration walks value indices lazily with
//! `RegEnumValueW`; indices shift when values are deleted, so a scan must be
//! drained before deleting from it.

// This module owns the registry FFI boundary.
#![allow(unsafe_code)]

use super::store::{Entries, RegistryEntry, RegistryStore};
use crate::config::RegistryConfig;
use crate::error::{EngineRegError, Result};
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use tracing::{debug, warn};
use windows_sys::Win32::Foundation::{
    ERROR_FILE_NOT_FOUND, ERROR_MORE_DATA, ERROR_NO_MORE_ITEMS, ERROR_SUCCESS, WIN32_ERROR,
};
use windows_sys::Win32::System::Registry::{
    RegCloseKey, RegCreateKeyExW, RegDeleteValueW, RegEnumValueW, RegQueryValueExW,
    RegSetValueExW, HKEY, HKEY_CURRENT_USER, KEY_ALL_ACCESS, REG_EXPAND_SZ,
    REG_OPTION_NON_VOLATILE, REG_SZ,
};

/// Longest value name the registry allows, in UTF-16 units.
const MAX_VALUE_NAME_LEN: usize = 16_383;

/// Registry key opened with full access for the current user.
pub struct WindowsRegistryStore {
    hkey: HKEY,
    key_path: String,
}

impl WindowsRegistryStore {
    /// Open (creating if absent) the engine builds key.
    pub fn open() -> Result<Self> {
        Self::open_at(RegistryConfig::KEY_PATH)
    }

    /// Open (creating if absent) a key under `HKEY_CURRENT_USER`.
    pub fn open_at(key_path: &str) -> Result<Self> {
        let subkey = to_wide(key_path);
        let mut hkey: HKEY = std::ptr::null_mut();

        // SAFETY: `subkey` is NUL-terminated and outlives the call; `hkey` is a
        // valid out pointer. Class, security attributes and disposition are optional.
        let status = unsafe {
            RegCreateKeyExW(
                HKEY_CURRENT_USER,
                subkey.as_ptr(),
                0,
                std::ptr::null(),
                REG_OPTION_NON_VOLATILE,
                KEY_ALL_ACCESS,
                std::ptr::null(),
                &mut hkey,
                std::ptr::null_mut(),
            )
        };
        if status != ERROR_SUCCESS {
            return Err(registry_error(key_path, "Failed to open registry key", status));
        }

        debug!(r"Opened registry key HKCU\{}", key_path);

        Ok(Self {
            hkey,
            key_path: key_path.to_string(),
        })
    }

    /// Read one value at `index`, or `None` once indices are exhausted.
    fn enum_value(&self, index: u32) -> Result<Option<(String, u32, Vec<u16>)>> {
        let mut data: Vec<u16> = vec![0; 260];
        loop {
            let mut name = vec![0u16; MAX_VALUE_NAME_LEN + 1];
            let mut name_len = name.len() as u32;
            let mut value_type: u32 = 0;
            let mut data_len = (data.len() * 2) as u32;

            // SAFETY: buffers are sized as reported in the length arguments and
            // live across the call.
            let status = unsafe {
                RegEnumValueW(
                    self.hkey,
                    index,
                    name.as_mut_ptr(),
                    &mut name_len,
                    std::ptr::null(),
                    &mut value_type,
                    data.as_mut_ptr() as *mut u8,
                    &mut data_len,
                )
            };

            match status {
                ERROR_SUCCESS => {
                    name.truncate(name_len as usize);
                    data.truncate((data_len as usize).div_ceil(2));
                    return Ok(Some((String::from_utf16_lossy(&name), value_type, data)));
                }
                ERROR_MORE_DATA => {
                    data = vec![0; (data_len as usize).div_ceil(2) + 1];
                }
                ERROR_NO_MORE_ITEMS => return Ok(None),
                other => {
                    return Err(registry_error(
                        &self.key_path,
                        "Failed to enumerate registry values",
                        other,
                    ))
                }
            }
        }
    }
}

impl Drop for WindowsRegistryStore {
    fn drop(&mut self) {
        // SAFETY: `hkey` came from a successful RegCreateKeyExW and is closed once.
        unsafe {
            RegCloseKey(self.hkey);
        }
    }
}

impl RegistryStore for WindowsRegistryStore {
    fn namespace(&self) -> &str {
        &self.key_path
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        let value_name = to_wide(name);
        let mut value_type: u32 = 0;
        let mut data_len: u32 = 0;

        // SAFETY: size query only; a null data pointer is allowed.
        let status = unsafe {
            RegQueryValueExW(
                self.hkey,
                value_name.as_ptr(),
                std::ptr::null(),
                &mut value_type,
                std::ptr::null_mut(),
                &mut data_len,
            )
        };
        match status {
            ERROR_SUCCESS => {}
            ERROR_FILE_NOT_FOUND => return Ok(None),
            other => {
                return Err(registry_error(&self.key_path, "Failed to query registry value", other))
            }
        }

        let mut data: Vec<u16> = vec![0; (data_len as usize).div_ceil(2) + 1];
        let mut data_len = (data.len() * 2) as u32;

        // SAFETY: `data` holds `data_len` bytes and outlives the call.
        let status = unsafe {
            RegQueryValueExW(
                self.hkey,
                value_name.as_ptr(),
                std::ptr::null(),
                &mut value_type,
                data.as_mut_ptr() as *mut u8,
                &mut data_len,
            )
        };
        match status {
            ERROR_SUCCESS => {}
            // Deleted between the two calls.
            ERROR_FILE_NOT_FOUND => return Ok(None),
            other => {
                return Err(registry_error(&self.key_path, "Failed to read registry value", other))
            }
        }

        data.truncate((data_len as usize).div_ceil(2));
        Ok(decode_string(name, value_type, &data))
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        let value_name = to_wide(name);
        let data = to_wide(value);

        // SAFETY: `data` is NUL-terminated REG_SZ payload of the given byte length.
        let status = unsafe {
            RegSetValueExW(
                self.hkey,
                value_name.as_ptr(),
                0,
                REG_SZ,
                data.as_ptr() as *const u8,
                (data.len() * 2) as u32,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(registry_error(&self.key_path, "Failed to write registry value", status));
        }

        debug!("Set {} = {}", name, value);
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let value_name = to_wide(name);

        // SAFETY: `value_name` is NUL-terminated and outlives the call.
        let status = unsafe { RegDeleteValueW(self.hkey, value_name.as_ptr()) };
        match status {
            ERROR_SUCCESS => {
                debug!("Deleted {}", name);
                Ok(true)
            }
            ERROR_FILE_NOT_FOUND => Ok(false),
            other => Err(registry_error(&self.key_path, "Failed to delete registry value", other)),
        }
    }

    fn entries(&self) -> Result<Entries<'_>> {
        let mut index = 0u32;
        let mut done = false;

        Ok(Box::new(std::iter::from_fn(move || loop {
            if done {
                return None;
            }
            match self.enum_value(index) {
                Ok(Some((name, value_type, data))) => {
                    index += 1;
                    if let Some(value) = decode_string(&name, value_type, &data) {
                        return Some(Ok(RegistryEntry { name, value }));
                    }
                }
                Ok(None) => {
                    done = true;
                    return None;
                }
                Err(e) => {
                    done = true;
                    return Some(Err(e));
                }
            }
        })))
    }
}

/// Encode a string as NUL-terminated UTF-16.
fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}

/// Decode string value data, skipping non-string values.
fn decode_string(name: &str, value_type: u32, data: &[u16]) -> Option<String> {
    if value_type != REG_SZ && value_type != REG_EXPAND_SZ {
        warn!("Skipping non-string registry value {} (type {})", name, value_type);
        return None;
    }
    let end = data.iter().position(|&c| c == 0).unwrap_or(data.len());
    Some(String::from_utf16_lossy(&data[..end]))
}

fn registry_error(key_path: &str, message: &str, status: WIN32_ERROR) -> EngineRegError {
    EngineRegError::store_access(
        key_path,
        message,
        Some(std::io::Error::from_raw_os_error(status as i32)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use windows_sys::Win32::System::Registry::RegDeleteTreeW;

    /// Scratch key removed on drop.
    struct ScratchKey(String);

    impl ScratchKey {
        fn new() -> Self {
            ScratchKey(format!(r"SOFTWARE\enginereg-tests\{}", uuid::Uuid::new_v4()))
        }
    }

    impl Drop for ScratchKey {
        fn drop(&mut self) {
            let subkey = to_wide(&self.0);
            // SAFETY: NUL-terminated subkey path under HKCU.
            unsafe {
                RegDeleteTreeW(HKEY_CURRENT_USER, subkey.as_ptr());
            }
        }
    }

    #[test]
    fn test_registry_roundtrip() {
        let scratch = ScratchKey::new();
        let store = WindowsRegistryStore::open_at(&scratch.0).unwrap();

        assert_eq!(store.get("E1").unwrap(), None);
        store.set("E1", r"c:\engines\a").unwrap();
        assert_eq!(store.get("E1").unwrap().as_deref(), Some(r"c:\engines\a"));

        assert!(store.delete("E1").unwrap());
        assert!(!store.delete("E1").unwrap());
    }

    #[test]
    fn test_registry_entries() {
        let scratch = ScratchKey::new();
        let store = WindowsRegistryStore::open_at(&scratch.0).unwrap();
        store.set("E1", r"c:\engines\a").unwrap();
        store.set("E2", r"c:\engines\b").unwrap();

        let mut entries: Vec<RegistryEntry> =
            store.entries().unwrap().map(|e| e.unwrap()).collect();
        entries.sort();
        assert_eq!(
            entries,
            vec![
                RegistryEntry::new("E1", r"c:\engines\a"),
                RegistryEntry::new("E2", r"c:\engines\b"),
            ]
        );
    }
}
