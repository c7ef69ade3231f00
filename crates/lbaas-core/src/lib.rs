//! LBaaS A10 core
//!
//! Contracts for the collaborators of the VIP translator (device client,
//! pool lookup) and the static policy it consults (capability profiles,
//! persistence policy).

pub mod capability;
pub mod context;
pub mod device;
pub mod error;
pub mod persistence;
pub mod pool;

#[cfg(test)]
mod tests;

pub use capability::{
    autosnat_argument, default_vrid_argument, ipinip_argument, CapabilityProfile, FlagFeature,
    IdFeature,
};
pub use context::RequestContext;
pub use device::{DeviceArgs, DeviceClient, DeviceError};
pub use error::LbaasError;
pub use persistence::{PersistenceKind, PersistencePolicy, SessionPersistence, TemplateKind};
pub use pool::{Pool, PoolLookup, PoolLookupError, StaticPoolLookup};

pub use lbaas_shared_types::{AdminState, DeviceConfig, Protocol, Vip, VipEvent};

/// Result type for VIP translation
pub type Result<T> = std::result::Result<T, LbaasError>;
