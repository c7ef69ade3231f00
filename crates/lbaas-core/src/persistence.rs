//! Session persistence policy

use serde::{Deserialize, Serialize};

pub use lbaas_shared_types::{PersistenceKind, SessionPersistence};

/// Appliance-side persistence template families
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    SourceIp,
    Cookie,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 2] = [TemplateKind::SourceIp, TemplateKind::Cookie];

    /// Appliance API namespace under `slb.template`
    pub fn namespace(&self) -> &'static str {
        match self {
            TemplateKind::SourceIp => "src_ip_persistence",
            TemplateKind::Cookie => "cookie_persistence",
        }
    }

    /// Virtual-port argument that binds a template of this kind
    pub fn binding_field(&self) -> &'static str {
        match self {
            TemplateKind::SourceIp => "s_pers_name",
            TemplateKind::Cookie => "c_pers_name",
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.namespace())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistencePolicy {
    pub kind: PersistenceKind,
    pub supported: bool,
    pub template: TemplateKind,
}

impl PersistencePolicy {
    pub fn for_kind(kind: PersistenceKind) -> Self {
        let (supported, template) = match kind {
            PersistenceKind::SourceIp => (true, TemplateKind::SourceIp),
            PersistenceKind::HttpCookie => (true, TemplateKind::Cookie),
            // Application cookies would need an aFleX script on the appliance.
            PersistenceKind::AppCookie => (false, TemplateKind::Cookie),
        };

        Self {
            kind,
            supported,
            template,
        }
    }

    pub fn binding_field(&self) -> &'static str {
        self.template.binding_field()
    }
}
