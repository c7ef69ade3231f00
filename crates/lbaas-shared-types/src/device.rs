use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{SharedResult, SharedTypeError};

/// Operator-supplied settings for a single appliance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default)]
    pub name: String,
    pub host: String,
    pub api_version: String,
    #[serde(default)]
    pub autosnat: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_virtual_server_vrid: Option<u32>,
    #[serde(default)]
    pub ipinip: bool,
    /// Extra arguments merged into every virtual-server create
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub virtual_server_defaults: Map<String, Value>,
    /// Extra arguments merged into every virtual-port create
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub virtual_port_defaults: Map<String, Value>,
}

impl DeviceConfig {
    pub fn new(name: String, host: String, api_version: String) -> Self {
        Self {
            name,
            host,
            api_version,
            autosnat: false,
            default_virtual_server_vrid: None,
            ipinip: false,
            virtual_server_defaults: Map::new(),
            virtual_port_defaults: Map::new(),
        }
    }

    pub fn validate(&self) -> SharedResult<()> {
        if self.name.is_empty() {
            return Err(SharedTypeError::MissingField("name"));
        }

        if self.host.is_empty() {
            return Err(SharedTypeError::MissingField("host"));
        }

        if self.api_version.trim().is_empty() {
            return Err(SharedTypeError::MissingField("api_version"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_config_defaults() {
        let config: DeviceConfig = serde_json::from_value(serde_json::json!({
            "name": "ax1",
            "host": "10.10.100.20",
            "api_version": "3.0"
        }))
        .unwrap();

        assert!(!config.autosnat);
        assert!(!config.ipinip);
        assert!(config.default_virtual_server_vrid.is_none());
        assert!(config.virtual_port_defaults.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_device_config_requires_version() {
        let config = DeviceConfig::new("ax1".to_string(), "10.0.0.1".to_string(), " ".to_string());
        assert!(config.validate().is_err());
    }
}
