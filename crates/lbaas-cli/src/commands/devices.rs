//! Devices command

use anyhow::Result;
use serde::Serialize;

use lbaas_config::DeviceConfigStore;
use lbaas_core::CapabilityProfile;

use super::OutputFormat;

#[derive(Debug, Serialize)]
struct DeviceSummary {
    name: String,
    host: String,
    api_version: String,
    known_version: bool,
    autosnat: Option<&'static str>,
    default_vrid: Option<u32>,
    ipinip: bool,
}

/// Lists configured devices with the features their API version offers
pub struct DevicesCommand {
    store: DeviceConfigStore,
}

impl DevicesCommand {
    pub fn new(store: DeviceConfigStore) -> Self {
        Self { store }
    }

    fn summaries(&self) -> Vec<DeviceSummary> {
        self.store
            .device_names()
            .into_iter()
            .filter_map(|name| self.store.get(&name))
            .map(|device| {
                let profile = CapabilityProfile::lookup(&device.api_version);
                DeviceSummary {
                    autosnat: profile
                        .and_then(|p| p.autosnat)
                        .filter(|_| device.autosnat)
                        .map(|f| f.key),
                    default_vrid: profile
                        .and_then(|p| p.default_vrid)
                        .and(device.default_virtual_server_vrid),
                    ipinip: profile.and_then(|p| p.ipinip).is_some() && device.ipinip,
                    known_version: profile.is_some(),
                    name: device.name,
                    host: device.host,
                    api_version: device.api_version,
                }
            })
            .collect()
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        let summaries = self.summaries();

        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&summaries)?),
            OutputFormat::Text => {
                if summaries.is_empty() {
                    return Ok("No devices configured".to_string());
                }

                let mut out = format!(
                    "{:<16} {:<18} {:<6} {:<16} {:<6} {}\n",
                    "NAME", "HOST", "API", "AUTOSNAT", "VRID", "IPINIP"
                );
                for s in &summaries {
                    let api = if s.known_version {
                        s.api_version.clone()
                    } else {
                        format!("{}?", s.api_version)
                    };
                    out.push_str(&format!(
                        "{:<16} {:<18} {:<6} {:<16} {:<6} {}\n",
                        s.name,
                        s.host,
                        api,
                        s.autosnat.unwrap_or("-"),
                        s.default_vrid
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        if s.ipinip { "yes" } else { "no" }
                    ));
                }
                Ok(out)
            }
        }
    }

    pub fn execute(&self, format: OutputFormat) -> Result<()> {
        println!("{}", self.render(format)?);
        Ok(())
    }
}
