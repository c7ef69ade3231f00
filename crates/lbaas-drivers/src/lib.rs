//! LBaaS A10 drivers
//!
//! VIP translation onto A10 appliances, the event dispatcher in front of it,
//! and an in-memory recording device.

pub mod dispatcher;
pub mod recording;
pub mod vip;


pub use dispatcher::{ClientFactory, VipDispatcher};
pub use recording::{DeviceCall, RecordingDeviceClient};
pub use vip::VipHandler;
