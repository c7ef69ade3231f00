//! Error types for VIP translation

use thiserror::Error;

use lbaas_shared_types::SharedTypeError;

use crate::device::DeviceError;
use crate::pool::PoolLookupError;

/// Failure surfaced to the lifecycle dispatcher
#[derive(Debug, Error)]
pub enum LbaasError {
    #[error("unsupported feature on device {device}: {feature}")]
    UnsupportedFeature { feature: String, device: String },

    #[error("invalid VIP: {0}")]
    InvalidVip(#[from] SharedTypeError),

    #[error("precondition failed: {0}")]
    Precondition(#[from] PoolLookupError),

    #[error("device call failed: {0}")]
    Device(#[from] DeviceError),

    #[error("device {device} is not configured")]
    DeviceNotConfigured { device: String },
}

impl LbaasError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, LbaasError::UnsupportedFeature { .. })
    }
}
