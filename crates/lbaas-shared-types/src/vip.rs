use std::net::IpAddr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{SharedResult, SharedTypeError};

/// Front-end protocol of a VIP
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Protocol {
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "HTTP")]
    Http,
    #[serde(rename = "HTTPS")]
    Https,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Http => write!(f, "HTTP"),
            Protocol::Https => write!(f, "HTTPS"),
        }
    }
}

impl std::str::FromStr for Protocol {
    type Err = SharedTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TCP" => Ok(Protocol::Tcp),
            "HTTP" => Ok(Protocol::Http),
            "HTTPS" => Ok(Protocol::Https),
            _ => Err(SharedTypeError::InvalidValue {
                field: "protocol",
                value: s.to_string(),
            }),
        }
    }
}

/// Administrative state as understood by the appliance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AdminState {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
}

impl AdminState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminState::Up => "UP",
            AdminState::Down => "DOWN",
        }
    }
}

impl From<bool> for AdminState {
    fn from(enabled: bool) -> Self {
        if enabled {
            AdminState::Up
        } else {
            AdminState::Down
        }
    }
}

impl std::fmt::Display for AdminState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session persistence kinds known to the control plane
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PersistenceKind {
    #[serde(rename = "SOURCE_IP")]
    SourceIp,
    #[serde(rename = "HTTP_COOKIE")]
    HttpCookie,
    #[serde(rename = "APP_COOKIE")]
    AppCookie,
}

impl std::fmt::Display for PersistenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceKind::SourceIp => write!(f, "SOURCE_IP"),
            PersistenceKind::HttpCookie => write!(f, "HTTP_COOKIE"),
            PersistenceKind::AppCookie => write!(f, "APP_COOKIE"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionPersistence {
    #[serde(rename = "type")]
    pub kind: PersistenceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_name: Option<String>,
}

impl SessionPersistence {
    pub fn new(kind: PersistenceKind) -> Self {
        Self {
            kind,
            cookie_name: None,
        }
    }
}

/// Virtual IP as delivered by the control plane
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vip {
    pub id: String,
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub protocol: Protocol,
    #[serde(default = "default_admin_state_up")]
    pub admin_state_up: bool,
    pub address: IpAddr,
    #[serde(deserialize_with = "deserialize_port")]
    pub protocol_port: u16,
    pub pool_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_persistence: Option<SessionPersistence>,
}

fn default_admin_state_up() -> bool {
    true
}

/// The control plane hands ports over either as numbers or numeric strings.
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortRepr {
        Number(u16),
        Text(String),
    }

    match PortRepr::deserialize(deserializer)? {
        PortRepr::Number(port) => Ok(port),
        PortRepr::Text(text) => text
            .trim()
            .parse::<u16>()
            .map_err(|_| serde::de::Error::custom(format!("invalid protocol_port: {}", text))),
    }
}

impl Vip {
    pub fn new(
        id: String,
        tenant_id: String,
        protocol: Protocol,
        address: IpAddr,
        protocol_port: u16,
        pool_id: String,
    ) -> Self {
        Self {
            id,
            tenant_id,
            name: None,
            description: None,
            protocol,
            admin_state_up: true,
            address,
            protocol_port,
            pool_id,
            session_persistence: None,
        }
    }

    pub fn with_persistence(mut self, kind: PersistenceKind) -> Self {
        self.session_persistence = Some(SessionPersistence::new(kind));
        self
    }

    pub fn admin_state(&self) -> AdminState {
        AdminState::from(self.admin_state_up)
    }

    pub fn persistence_kind(&self) -> Option<PersistenceKind> {
        self.session_persistence.as_ref().map(|p| p.kind)
    }

    pub fn validate(&self) -> SharedResult<()> {
        if self.id.is_empty() {
            return Err(SharedTypeError::MissingField("id"));
        }

        if self.pool_id.is_empty() {
            return Err(SharedTypeError::MissingField("pool_id"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vip_from_control_plane_payload() {
        let payload = serde_json::json!({
            "tenant_id": "ten1",
            "id": "id1",
            "protocol": "HTTP",
            "admin_state_up": true,
            "address": "1.1.1.1",
            "protocol_port": "80",
            "pool_id": "pool1",
            "session_persistence": {"type": "HTTP_COOKIE"}
        });

        let vip: Vip = serde_json::from_value(payload).unwrap();
        assert_eq!(vip.protocol, Protocol::Http);
        assert_eq!(vip.protocol_port, 80);
        assert_eq!(vip.admin_state(), AdminState::Up);
        assert_eq!(vip.persistence_kind(), Some(PersistenceKind::HttpCookie));
        vip.validate().unwrap();
    }

    #[test]
    fn test_numeric_port_and_missing_persistence() {
        let payload = serde_json::json!({
            "tenant_id": "ten1",
            "id": "id2",
            "protocol": "TCP",
            "admin_state_up": false,
            "address": "2001:db8::1",
            "protocol_port": 443,
            "pool_id": "pool2"
        });

        let vip: Vip = serde_json::from_value(payload).unwrap();
        assert_eq!(vip.protocol_port, 443);
        assert_eq!(vip.admin_state().as_str(), "DOWN");
        assert!(vip.persistence_kind().is_none());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let payload = serde_json::json!({
            "tenant_id": "ten1",
            "id": "id3",
            "protocol": "TCP",
            "address": "1.1.1.1",
            "protocol_port": "eighty",
            "pool_id": "pool1"
        });

        assert!(serde_json::from_value::<Vip>(payload).is_err());
    }

    #[test]
    fn test_validate_requires_pool() {
        let vip = Vip::new(
            "id1".to_string(),
            "ten1".to_string(),
            Protocol::Tcp,
            "10.0.0.1".parse().unwrap(),
            80,
            String::new(),
        );

        assert!(matches!(
            vip.validate(),
            Err(SharedTypeError::MissingField("pool_id"))
        ));
    }

    #[test]
    fn test_protocol_parsing() {
        assert_eq!("https".parse::<Protocol>().unwrap(), Protocol::Https);
        assert!("udp".parse::<Protocol>().is_err());
    }
}
