use serde::{Deserialize, Serialize};

use crate::vip::Vip;

/// VIP lifecycle event emitted by the control plane
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VipEvent {
    Created { vip: Vip },
    Updated { old: Vip, new: Vip },
    Deleted { vip: Vip },
}

impl VipEvent {
    /// Identifier of the VIP the event refers to
    pub fn vip_id(&self) -> &str {
        match self {
            VipEvent::Created { vip } | VipEvent::Deleted { vip } => &vip.id,
            VipEvent::Updated { new, .. } => &new.id,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            VipEvent::Created { .. } => "create",
            VipEvent::Updated { .. } => "update",
            VipEvent::Deleted { .. } => "delete",
        }
    }
}
