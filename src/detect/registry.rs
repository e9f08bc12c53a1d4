//! Registry lookups used by detection.
//!
//! Only Windows has a registry; elsewhere every check is false and
//! detection relies on paths alone.

/// Root hive of a registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hive {
    LocalMachine,
    CurrentUser,
}

/// Split `HKLM\SOFTWARE\Vendor` into its hive and subkey.
///
/// Returns `None` for unsupported hives or keys without a subkey.
pub fn parse_key(key: &str) -> Option<(Hive, &str)> {
    let (root, subkey) = key.split_once('\\')?;
    if subkey.is_empty() {
        return None;
    }
    let hive = match root.to_ascii_uppercase().as_str() {
        "HKLM" | "HKEY_LOCAL_MACHINE" => Hive::LocalMachine,
        "HKCU" | "HKEY_CURRENT_USER" => Hive::CurrentUser,
        _ => return None,
    };
    Some((hive, subkey))
}

/// Source of registry answers for detection.
pub trait RegistryProbe: Send + Sync {
    /// Whether registry checks mean anything on this host.
    fn is_supported(&self) -> bool;

    /// True if `key` can be opened for reading.
    fn key_exists(&self, key: &str) -> bool;
}

/// The host registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRegistry;

#[cfg(windows)]
impl RegistryProbe for SystemRegistry {
    fn is_supported(&self) -> bool {
        true
    }

    fn key_exists(&self, key: &str) -> bool {
        use windows::core::HSTRING;
        use windows::Win32::System::Registry::{
            RegCloseKey, RegOpenKeyExW, HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE,
            KEY_QUERY_VALUE,
        };

        let Some((hive, subkey)) = parse_key(key) else {
            return false;
        };
        let root = match hive {
            Hive::LocalMachine => HKEY_LOCAL_MACHINE,
            Hive::CurrentUser => HKEY_CURRENT_USER,
        };

        let subkey = HSTRING::from(subkey);
        let mut handle = HKEY::default();
        // SAFETY: `subkey` outlives the call and `handle` is a valid out pointer.
        let status = unsafe { RegOpenKeyExW(root, &subkey, 0, KEY_QUERY_VALUE, &mut handle) };
        if status.is_err() {
            return false;
        }
        // SAFETY: `handle` was opened above and is closed exactly once.
        unsafe {
            let _ = RegCloseKey(handle);
        }
        true
    }
}

#[cfg(not(windows))]
impl RegistryProbe for SystemRegistry {
    fn is_supported(&self) -> bool {
        false
    }

    fn key_exists(&self, _key: &str) -> bool {
        false
    }
}
