pub mod device;
pub mod error;
pub mod events;
pub mod pool;
pub mod vip;

pub use device::DeviceConfig;
pub use error::{SharedResult, SharedTypeError};
pub use events::VipEvent;
pub use pool::{LbMethod, Pool};
pub use vip::{AdminState, PersistenceKind, Protocol, SessionPersistence, Vip};
