//! Device client abstraction

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::persistence::TemplateKind;

/// Keyword arguments of a single device API call
pub type DeviceArgs = Map<String, Value>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum DeviceError {
    #[error("device {device} unreachable: {message}")]
    Communication { device: String, message: String },

    #[error("device {device} rejected {operation}: {message}")]
    Rejected {
        device: String,
        operation: String,
        message: String,
    },
}

/// Session-backed handle to one appliance.
///
/// Each call maps onto one namespaced appliance operation
/// (`slb.virtual_server.*`, `slb.virtual_server.vport.*`,
/// `slb.template.<kind>_persistence.*`). Re-issuing a call for an object
/// that already exists must not fail; retry is left to the implementor.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    async fn virtual_server_create(&self, name: &str, args: &DeviceArgs) -> Result<(), DeviceError>;
    async fn virtual_server_update(&self, name: &str, args: &DeviceArgs) -> Result<(), DeviceError>;
    async fn virtual_server_delete(&self, name: &str) -> Result<(), DeviceError>;
    async fn virtual_port_create(
        &self,
        virtual_server: &str,
        name: &str,
        args: &DeviceArgs,
    ) -> Result<(), DeviceError>;
    async fn virtual_port_update(
        &self,
        virtual_server: &str,
        name: &str,
        args: &DeviceArgs,
    ) -> Result<(), DeviceError>;
    async fn persistence_template_create(
        &self,
        kind: TemplateKind,
        name: &str,
        args: &DeviceArgs,
    ) -> Result<(), DeviceError>;
    async fn persistence_template_delete(
        &self,
        kind: TemplateKind,
        name: &str,
    ) -> Result<(), DeviceError>;
}
