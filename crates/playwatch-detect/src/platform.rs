#[cfg(target_os = "windows")]
pub mod windows;

use crate::discovery::KeyValueStore;

/// The per-user registry (`HKEY_CURRENT_USER`).
///
/// Only exists on Windows; elsewhere [`KeyValueStore::is_supported`] is false
/// and every read is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryStore;

impl KeyValueStore for RegistryStore {
    fn is_supported(&self) -> bool {
        cfg!(target_os = "windows")
    }

    fn read(&self, location: &str, key: &str) -> Option<String> {
        #[cfg(target_os = "windows")]
        {
            windows::read_current_user(location, key)
        }
        #[cfg(not(target_os = "windows"))]
        {
            let _ = (location, key);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_registry_unsupported_off_windows() {
        let store = RegistryStore;
        assert!(!store.is_supported());
        assert!(store
            .read(r"Software\MPC-HC\MPC-HC\Settings", "WebServerPort")
            .is_none());
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_missing_key_is_none() {
        let store = RegistryStore;
        assert!(store.is_supported());
        assert!(store
            .read(r"Software\playwatch-test\does-not-exist", "Port")
            .is_none());
    }
}
