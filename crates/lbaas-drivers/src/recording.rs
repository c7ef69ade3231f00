//! Recording device
//!
//! In-memory [`DeviceClient`] that keeps every issued call in order. Backs
//! dry runs of the CLI and doubles as the device in tests.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

use lbaas_core::{DeviceArgs, DeviceClient, DeviceError, TemplateKind};

/// One appliance call as issued by the translator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum DeviceCall {
    VirtualServerCreate {
        name: String,
        args: DeviceArgs,
    },
    VirtualServerUpdate {
        name: String,
        args: DeviceArgs,
    },
    VirtualServerDelete {
        name: String,
    },
    VirtualPortCreate {
        virtual_server: String,
        name: String,
        args: DeviceArgs,
    },
    VirtualPortUpdate {
        virtual_server: String,
        name: String,
        args: DeviceArgs,
    },
    TemplateCreate {
        kind: TemplateKind,
        name: String,
        args: DeviceArgs,
    },
    TemplateDelete {
        kind: TemplateKind,
        name: String,
    },
}

impl DeviceCall {
    /// Namespaced appliance operation, e.g. `slb.virtual_server.create`
    pub fn operation(&self) -> String {
        match self {
            DeviceCall::VirtualServerCreate { .. } => "slb.virtual_server.create".to_string(),
            DeviceCall::VirtualServerUpdate { .. } => "slb.virtual_server.update".to_string(),
            DeviceCall::VirtualServerDelete { .. } => "slb.virtual_server.delete".to_string(),
            DeviceCall::VirtualPortCreate { .. } => "slb.virtual_server.vport.create".to_string(),
            DeviceCall::VirtualPortUpdate { .. } => "slb.virtual_server.vport.update".to_string(),
            DeviceCall::TemplateCreate { kind, .. } => format!("slb.template.{}.create", kind),
            DeviceCall::TemplateDelete { kind, .. } => format!("slb.template.{}.delete", kind),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DeviceCall::VirtualServerCreate { name, .. }
            | DeviceCall::VirtualServerUpdate { name, .. }
            | DeviceCall::VirtualServerDelete { name }
            | DeviceCall::VirtualPortCreate { name, .. }
            | DeviceCall::VirtualPortUpdate { name, .. }
            | DeviceCall::TemplateCreate { name, .. }
            | DeviceCall::TemplateDelete { name, .. } => name,
        }
    }

    pub fn args(&self) -> Option<&DeviceArgs> {
        match self {
            DeviceCall::VirtualServerCreate { args, .. }
            | DeviceCall::VirtualServerUpdate { args, .. }
            | DeviceCall::VirtualPortCreate { args, .. }
            | DeviceCall::VirtualPortUpdate { args, .. }
            | DeviceCall::TemplateCreate { args, .. } => Some(args),
            DeviceCall::VirtualServerDelete { .. } | DeviceCall::TemplateDelete { .. } => None,
        }
    }

    pub fn is_template_call(&self) -> bool {
        matches!(
            self,
            DeviceCall::TemplateCreate { .. } | DeviceCall::TemplateDelete { .. }
        )
    }
}

impl std::fmt::Display for DeviceCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let args = self
            .args()
            .map(|a| serde_json::Value::Object(a.clone()).to_string());

        match (self, args) {
            (
                DeviceCall::VirtualPortCreate { virtual_server, .. }
                | DeviceCall::VirtualPortUpdate { virtual_server, .. },
                Some(args),
            ) => write!(
                f,
                "{}({}, {}, {})",
                self.operation(),
                virtual_server,
                self.name(),
                args
            ),
            (_, Some(args)) => write!(f, "{}({}, {})", self.operation(), self.name(), args),
            (_, None) => write!(f, "{}({})", self.operation(), self.name()),
        }
    }
}

pub struct RecordingDeviceClient {
    name: String,
    calls: Mutex<Vec<DeviceCall>>,
    failures: Mutex<HashMap<String, String>>,
}

impl RecordingDeviceClient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Make every call of `operation` (as returned by
    /// [`DeviceCall::operation`]) fail with `message`.
    pub fn fail_on(&self, operation: &str, message: &str) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        failures.insert(operation.to_string(), message.to_string());
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn take_calls(&self) -> Vec<DeviceCall> {
        std::mem::take(&mut *self.calls.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Calls are recorded even when they fail; they were issued.
    fn record(&self, call: DeviceCall) -> Result<(), DeviceError> {
        let operation = call.operation();
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);

        let failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        match failures.get(&operation) {
            Some(message) => Err(DeviceError::Rejected {
                device: self.name.clone(),
                operation,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DeviceClient for RecordingDeviceClient {
    async fn virtual_server_create(&self, name: &str, args: &DeviceArgs) -> Result<(), DeviceError> {
        self.record(DeviceCall::VirtualServerCreate {
            name: name.to_string(),
            args: args.clone(),
        })
    }

    async fn virtual_server_update(&self, name: &str, args: &DeviceArgs) -> Result<(), DeviceError> {
        self.record(DeviceCall::VirtualServerUpdate {
            name: name.to_string(),
            args: args.clone(),
        })
    }

    async fn virtual_server_delete(&self, name: &str) -> Result<(), DeviceError> {
        self.record(DeviceCall::VirtualServerDelete {
            name: name.to_string(),
        })
    }

    async fn virtual_port_create(
        &self,
        virtual_server: &str,
        name: &str,
        args: &DeviceArgs,
    ) -> Result<(), DeviceError> {
        self.record(DeviceCall::VirtualPortCreate {
            virtual_server: virtual_server.to_string(),
            name: name.to_string(),
            args: args.clone(),
        })
    }

    async fn virtual_port_update(
        &self,
        virtual_server: &str,
        name: &str,
        args: &DeviceArgs,
    ) -> Result<(), DeviceError> {
        self.record(DeviceCall::VirtualPortUpdate {
            virtual_server: virtual_server.to_string(),
            name: name.to_string(),
            args: args.clone(),
        })
    }

    async fn persistence_template_create(
        &self,
        kind: TemplateKind,
        name: &str,
        args: &DeviceArgs,
    ) -> Result<(), DeviceError> {
        self.record(DeviceCall::TemplateCreate {
            kind,
            name: name.to_string(),
            args: args.clone(),
        })
    }

    async fn persistence_template_delete(
        &self,
        kind: TemplateKind,
        name: &str,
    ) -> Result<(), DeviceError> {
        self.record(DeviceCall::TemplateDelete {
            kind,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_display() {
        let mut args = DeviceArgs::new();
        args.insert("address".to_string(), "1.1.1.1".into());

        let call = DeviceCall::VirtualServerCreate {
            name: "id1".to_string(),
            args,
        };
        assert_eq!(
            call.to_string(),
            r#"slb.virtual_server.create(id1, {"address":"1.1.1.1"})"#
        );

        let call = DeviceCall::TemplateDelete {
            kind: TemplateKind::SourceIp,
            name: "id1".to_string(),
        };
        assert_eq!(call.to_string(), "slb.template.src_ip_persistence.delete(id1)");
    }

    #[tokio::test]
    async fn test_failure_injection_records_call() {
        let client = RecordingDeviceClient::new("ax1");
        client.fail_on("slb.virtual_server.delete", "busy");

        let err = client.virtual_server_delete("id1").await.unwrap_err();
        assert!(matches!(err, DeviceError::Rejected { ref message, .. } if message == "busy"));
        assert_eq!(client.calls().len(), 1);
        assert_eq!(client.take_calls()[0].name(), "id1");
        assert!(client.calls().is_empty());
    }
}
