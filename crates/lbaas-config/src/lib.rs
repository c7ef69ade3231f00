//! LBaaS A10 configuration
//!
//! Loading of per-device settings and the shared store the dispatcher reads
//! them from at request time.

pub mod devices;
pub mod store;

pub use devices::{ConfigError, DevicesConfig, ENV_PREFIX};
pub use store::{global_store, DeviceConfigStore};
