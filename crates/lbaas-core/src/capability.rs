//! Per-API-version capability profiles
//!
//! Appliance firmware families name and encode the same feature differently.
//! Each profile maps a feature to the argument key the appliance expects and
//! a pure transform from the configured value to the argument value. Adding a
//! new API version only means adding a row to [`PROFILES`].

use serde_json::Value;

/// Feature toggled by a boolean device setting
#[derive(Debug, Clone, Copy)]
pub struct FlagFeature {
    pub key: &'static str,
    pub transform: fn(bool) -> Value,
}

impl FlagFeature {
    pub fn argument(&self, enabled: bool) -> (&'static str, Value) {
        (self.key, (self.transform)(enabled))
    }
}

/// Feature carrying a numeric identifier
#[derive(Debug, Clone, Copy)]
pub struct IdFeature {
    pub key: &'static str,
    pub transform: fn(u32) -> Value,
}

impl IdFeature {
    pub fn argument(&self, id: u32) -> (&'static str, Value) {
        (self.key, (self.transform)(id))
    }
}

/// Optional features of one appliance API version
#[derive(Debug, Clone, Copy)]
pub struct CapabilityProfile {
    pub api_version: &'static str,
    /// Applied to virtual-port creation
    pub autosnat: Option<FlagFeature>,
    /// Applied to virtual-server creation
    pub default_vrid: Option<IdFeature>,
    /// Applied to virtual-server creation
    pub ipinip: Option<FlagFeature>,
}

fn flag_as_int(enabled: bool) -> Value {
    Value::from(u8::from(enabled))
}

fn id_as_is(id: u32) -> Value {
    Value::from(id)
}

static PROFILES: &[CapabilityProfile] = &[
    CapabilityProfile {
        api_version: "2.1",
        autosnat: Some(FlagFeature {
            key: "source_nat_auto",
            transform: flag_as_int,
        }),
        default_vrid: Some(IdFeature {
            key: "vrid",
            transform: id_as_is,
        }),
        ipinip: Some(FlagFeature {
            key: "ipinip",
            transform: flag_as_int,
        }),
    },
    CapabilityProfile {
        api_version: "3.0",
        autosnat: Some(FlagFeature {
            key: "auto",
            transform: flag_as_int,
        }),
        default_vrid: Some(IdFeature {
            key: "vrid",
            transform: id_as_is,
        }),
        ipinip: Some(FlagFeature {
            key: "ipinip",
            transform: flag_as_int,
        }),
    },
];

impl CapabilityProfile {
    /// Profile for an API version string, `None` for unknown versions
    pub fn lookup(api_version: &str) -> Option<&'static CapabilityProfile> {
        let version = api_version.trim();
        PROFILES.iter().find(|p| p.api_version == version)
    }

    pub fn known_versions() -> impl Iterator<Item = &'static str> {
        PROFILES.iter().map(|p| p.api_version)
    }
}

/// Auto-SNAT argument for the virtual-port, if the setting is on and the
/// version supports it.
pub fn autosnat_argument(api_version: &str, autosnat: bool) -> Option<(&'static str, Value)> {
    if !autosnat {
        return None;
    }
    CapabilityProfile::lookup(api_version)?
        .autosnat
        .map(|f| f.argument(autosnat))
}

/// Redundancy-group argument for the virtual-server; absent when no default
/// vrid is configured.
pub fn default_vrid_argument(
    api_version: &str,
    default_vrid: Option<u32>,
) -> Option<(&'static str, Value)> {
    let vrid = default_vrid?;
    CapabilityProfile::lookup(api_version)?
        .default_vrid
        .map(|f| f.argument(vrid))
}

/// IP-in-IP encapsulation argument for the virtual-server
pub fn ipinip_argument(api_version: &str, ipinip: bool) -> Option<(&'static str, Value)> {
    if !ipinip {
        return None;
    }
    CapabilityProfile::lookup(api_version)?
        .ipinip
        .map(|f| f.argument(ipinip))
}
