//! Process-wide device configuration store
//!
//! Operators may edit device settings while the driver runs. Readers always
//! get a cloned snapshot, so a request sees one consistent configuration and
//! changes take effect on the next request.

use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use lbaas_shared_types::DeviceConfig;

use crate::devices::{ConfigError, DevicesConfig};

#[derive(Clone, Default)]
pub struct DeviceConfigStore {
    devices: Arc<RwLock<HashMap<String, DeviceConfig>>>,
}

impl DeviceConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: DevicesConfig) -> Self {
        let store = Self::new();
        store.replace(config);
        store
    }

    /// Snapshot of one device's configuration
    pub fn get(&self, name: &str) -> Option<DeviceConfig> {
        let devices = self.devices.read().unwrap_or_else(|e| e.into_inner());
        devices.get(name).cloned()
    }

    /// Insert or replace a single device
    pub fn upsert(&self, device: DeviceConfig) -> Result<(), ConfigError> {
        device
            .validate()
            .map_err(|source| ConfigError::InvalidDevice {
                device: device.name.clone(),
                source,
            })?;

        let mut devices = self.devices.write().unwrap_or_else(|e| e.into_inner());
        debug!("Updated configuration of device '{}'", device.name);
        devices.insert(device.name.clone(), device);
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Option<DeviceConfig> {
        let mut devices = self.devices.write().unwrap_or_else(|e| e.into_inner());
        devices.remove(name)
    }

    /// Swap in a complete configuration
    pub fn replace(&self, config: DevicesConfig) {
        let mut devices = self.devices.write().unwrap_or_else(|e| e.into_inner());
        *devices = config.devices;
    }

    /// Re-read the configuration file; the store is untouched on error
    pub fn reload_from_file<P: AsRef<Path>>(&self, path: P) -> Result<usize, ConfigError> {
        let config = DevicesConfig::load_from_file(path.as_ref())?;
        let count = config.devices.len();
        self.replace(config);
        info!(
            "Reloaded {} device(s) from {}",
            count,
            path.as_ref().display()
        );
        Ok(count)
    }

    /// Device names in sorted order
    pub fn device_names(&self) -> Vec<String> {
        let devices = self.devices.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = devices.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.devices.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static GLOBAL_STORE: OnceLock<DeviceConfigStore> = OnceLock::new();

/// Get the global device configuration store
pub fn global_store() -> &'static DeviceConfigStore {
    GLOBAL_STORE.get_or_init(DeviceConfigStore::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn device(name: &str, version: &str) -> DeviceConfig {
        DeviceConfig::new(name.to_string(), "10.0.0.1".to_string(), version.to_string())
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = DeviceConfigStore::new();
        store.upsert(device("ax1", "2.1")).unwrap();

        let snapshot = store.get("ax1").unwrap();

        let mut changed = device("ax1", "3.0");
        changed.autosnat = true;
        store.upsert(changed).unwrap();

        assert_eq!(snapshot.api_version, "2.1");
        assert!(!snapshot.autosnat);
        assert_eq!(store.get("ax1").unwrap().api_version, "3.0");
    }

    #[test]
    fn test_upsert_rejects_invalid_device() {
        let store = DeviceConfigStore::new();
        assert!(store.upsert(device("ax1", "")).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_device_names_sorted() {
        let store = DeviceConfigStore::new();
        store.upsert(device("ax2", "3.0")).unwrap();
        store.upsert(device("ax1", "3.0")).unwrap();

        assert_eq!(store.device_names(), vec!["ax1", "ax2"]);
        assert!(store.remove("ax2").is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reload_keeps_store_on_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("devices.json");
        fs::write(
            &path,
            r#"{"devices": {"ax1": {"host": "10.0.0.1", "api_version": "3.0"}}}"#,
        )
        .unwrap();

        let store = DeviceConfigStore::new();
        assert_eq!(store.reload_from_file(&path).unwrap(), 1);

        fs::write(&path, r#"{"devices": {"ax1": {"host": "", "api_version": "3.0"}}}"#).unwrap();
        assert!(store.reload_from_file(&path).is_err());
        assert_eq!(store.get("ax1").unwrap().host, "10.0.0.1");
    }

    #[test]
    fn test_global_store() {
        let store = global_store();
        store.upsert(device("global-ax", "3.0")).unwrap();
        assert!(global_store().get("global-ax").is_some());
    }
}
