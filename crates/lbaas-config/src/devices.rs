//! Device configuration file handling
//!
//! The devices file is JSON and is read as written, so device names and
//! operator argument keys keep their case. Environment overrides are layered
//! on top through the `config` crate; their keys arrive lowercased, so the
//! device segment matches case-insensitively.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use lbaas_core::CapabilityProfile;
use lbaas_shared_types::{DeviceConfig, SharedTypeError};

/// Prefix of environment variables overriding file settings,
/// e.g. `LBAAS_A10__DEVICES__AX1__AUTOSNAT=true`
pub const ENV_PREFIX: &str = "LBAAS_A10";

/// Device configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to load environment overrides: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid override for device '{device}': {source}")]
    Override {
        device: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid device '{device}': {source}")]
    InvalidDevice {
        device: String,
        #[source]
        source: SharedTypeError,
    },
}

/// All configured appliances, keyed by device name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevicesConfig {
    #[serde(default)]
    pub devices: HashMap<String, DeviceConfig>,
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl DevicesConfig {
    /// Load configuration from file, with environment overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with_environment(path, environment())
    }

    fn load_with_environment<P: AsRef<Path>>(
        path: P,
        env: config::Environment,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut devices: DevicesConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        devices.normalize();
        devices.apply_overrides(env)?;
        devices.validate()?;

        debug!(
            "Loaded {} device(s) from {}",
            devices.devices.len(),
            path.display()
        );
        Ok(devices)
    }

    /// Overrides for devices missing from the file are ignored.
    fn apply_overrides(&mut self, env: config::Environment) -> Result<(), ConfigError> {
        let settings = config::Config::builder().add_source(env).build()?;
        let table = match settings.get_table("devices") {
            Ok(table) => table,
            Err(config::ConfigError::NotFound(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        for (env_name, fields) in table {
            let Some((name, device)) = self
                .devices
                .iter_mut()
                .find(|(name, _)| name.eq_ignore_ascii_case(&env_name))
            else {
                warn!("Ignoring environment override for unknown device '{}'", env_name);
                continue;
            };

            let fields: Value = fields.try_deserialize()?;
            let mut current = serde_json::to_value(&*device).map_err(|source| {
                ConfigError::Override {
                    device: name.clone(),
                    source,
                }
            })?;
            merge(&mut current, fields);
            *device = serde_json::from_value(current).map_err(|source| ConfigError::Override {
                device: name.clone(),
                source,
            })?;

            debug!("Applied environment overrides to device '{}'", name);
        }

        Ok(())
    }

    /// Device entries may omit `name`; the map key is authoritative then.
    fn normalize(&mut self) {
        for (key, device) in self.devices.iter_mut() {
            if device.name.is_empty() {
                device.name = key.clone();
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, device) in &self.devices {
            device
                .validate()
                .map_err(|source| ConfigError::InvalidDevice {
                    device: key.clone(),
                    source,
                })?;

            if CapabilityProfile::lookup(&device.api_version).is_none() {
                warn!(
                    "Device '{}' uses unknown API version '{}', optional features disabled",
                    key, device.api_version
                );
            }
        }

        Ok(())
    }
}

/// Recursive object merge. Parsed scalars replacing a string stay strings,
/// so `API_VERSION=3.0` does not turn into a number.
fn merge(target: &mut Value, update: Value) {
    match update {
        Value::Object(update) => {
            if let Value::Object(target) = target {
                for (key, value) in update {
                    match target.get_mut(&key) {
                        Some(existing) => merge(existing, value),
                        None => {
                            target.insert(key, value);
                        }
                    }
                }
                return;
            }
            *target = Value::Object(update);
        }
        update @ (Value::Number(_) | Value::Bool(_)) if target.is_string() => {
            *target = Value::String(update.to_string());
        }
        update => *target = update,
    }
}
