//! Lifecycle dispatcher
//!
//! Routes control-plane VIP events to the [`VipHandler`]. Device settings
//! are read from the [`DeviceConfigStore`] on every event and events for the
//! same VIP are handled one at a time.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lbaas_config::DeviceConfigStore;
use lbaas_core::{DeviceClient, DeviceConfig, LbaasError, RequestContext, Result, VipEvent};

use crate::vip::VipHandler;

/// Builds a client handle for a configured device
pub type ClientFactory = Box<dyn Fn(&DeviceConfig) -> Arc<dyn DeviceClient> + Send + Sync>;

pub struct VipDispatcher {
    store: DeviceConfigStore,
    handler: VipHandler,
    clients: ClientFactory,
    vip_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl VipDispatcher {
    pub fn new(store: DeviceConfigStore, handler: VipHandler, clients: ClientFactory) -> Self {
        Self {
            store,
            handler,
            clients,
            vip_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one lifecycle event against the named device
    pub async fn handle(
        &self,
        context: &RequestContext,
        device_name: &str,
        event: &VipEvent,
    ) -> Result<()> {
        let vip_id = event.vip_id().to_string();

        let result = {
            let lock = self.vip_lock(&vip_id);
            let _guard = lock.lock().await;
            self.dispatch(context, device_name, event).await
        };

        if matches!(event, VipEvent::Deleted { .. }) {
            self.release_vip_lock(&vip_id);
        }

        match &result {
            Ok(()) => info!(
                "[{}] {} of VIP {} on {} completed",
                context.request_id,
                event.action(),
                vip_id,
                device_name
            ),
            Err(e) => warn!(
                "[{}] {} of VIP {} on {} failed: {}",
                context.request_id,
                event.action(),
                vip_id,
                device_name,
                e
            ),
        }

        result
    }

    async fn dispatch(
        &self,
        context: &RequestContext,
        device_name: &str,
        event: &VipEvent,
    ) -> Result<()> {
        let device = self
            .store
            .get(device_name)
            .ok_or_else(|| LbaasError::DeviceNotConfigured {
                device: device_name.to_string(),
            })?;
        let client = (self.clients)(&device);

        debug!(
            "[{}] dispatching {} of VIP {} to {} (api {})",
            context.request_id,
            event.action(),
            event.vip_id(),
            device.name,
            device.api_version
        );

        match event {
            VipEvent::Created { vip } => {
                self.handler
                    .create(context, client.as_ref(), &device, vip)
                    .await
            }
            VipEvent::Updated { old, new } => {
                self.handler
                    .update(context, client.as_ref(), &device, old, new)
                    .await
            }
            VipEvent::Deleted { vip } => {
                self.handler
                    .delete(context, client.as_ref(), &device, vip)
                    .await
            }
        }
    }

    fn vip_lock(&self, vip_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.vip_locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(vip_id.to_string()).or_default())
    }

    /// Drop the lock entry of a deleted VIP unless another event holds it.
    fn release_vip_lock(&self, vip_id: &str) {
        let mut locks = self.vip_locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks
            .get(vip_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(vip_id);
        }
    }

    pub fn tracked_vips(&self) -> usize {
        self.vip_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}
