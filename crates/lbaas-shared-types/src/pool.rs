use serde::{Deserialize, Serialize};

use crate::vip::Protocol;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LbMethod {
    #[default]
    #[serde(rename = "ROUND_ROBIN")]
    RoundRobin,
    #[serde(rename = "LEAST_CONNECTIONS")]
    LeastConnections,
    #[serde(rename = "SOURCE_IP")]
    SourceIp,
}

/// Pool record returned by the control plane's pool lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pool {
    pub id: String,
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub protocol: Protocol,
    #[serde(default)]
    pub lb_method: LbMethod,
    #[serde(default = "default_admin_state_up")]
    pub admin_state_up: bool,
}

fn default_admin_state_up() -> bool {
    true
}

impl Pool {
    pub fn new(id: String, tenant_id: String, protocol: Protocol) -> Self {
        Self {
            id,
            tenant_id,
            name: None,
            protocol,
            lb_method: LbMethod::default(),
            admin_state_up: true,
        }
    }
}
