//! Shared provider-facing types.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A reserved (static) address in one region.
///
/// At most one reservation under the monitor's fixed name is expected to be
/// alive per region at any instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticIp {
    /// Reservation name.
    pub name: String,

    /// The reserved address, once assigned by the provider.
    #[serde(default)]
    pub ip_address: Option<IpAddr>,

    /// Instance the address is currently attached to, if any.
    #[serde(default)]
    pub attached_to: Option<String>,
}

impl StaticIp {
    /// Returns true if the reservation is attached to an instance.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached_to.is_some()
    }
}

/// Provider-side view of a monitored instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceInfo {
    /// Instance name.
    pub name: String,

    /// Current public address, if one is assigned.
    #[serde(default)]
    pub public_ip: Option<IpAddr>,

    /// Provider lifecycle state (e.g. "running"), informational only.
    #[serde(default)]
    pub state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_ip_attachment() {
        let mut ip = StaticIp {
            name: "lsmon".into(),
            ip_address: Some("203.0.113.7".parse().unwrap()),
            attached_to: None,
        };
        assert!(!ip.is_attached());

        ip.attached_to = Some("web-1".into());
        assert!(ip.is_attached());
    }

    #[test]
    fn instance_info_deserializes_without_address() {
        let info: InstanceInfo = serde_json::from_str(r#"{"name":"web-1"}"#).unwrap();
        assert_eq!(info.name, "web-1");
        assert!(info.public_ip.is_none());
    }
}
