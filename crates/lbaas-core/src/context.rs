//! Request context forwarded from the control plane

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque per-request context.
///
/// The translator never interprets it; it is handed to the pool lookup
/// unchanged and the request id shows up in log lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            tenant_id: None,
        }
    }

    pub fn for_tenant(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: Some(tenant_id.into()),
            ..Self::new()
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
