//! Notification seam and event model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::IpAddr;

use crate::error::Result;

/// An event worth telling a human about.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotifyEvent {
    /// A node's public address was classified blocked.
    NodeBlocked {
        /// Node name.
        node: String,
        /// Domain that stopped answering.
        domain: String,
        /// When the classification happened.
        at: DateTime<Utc>,
    },

    /// A blocked node received a fresh public address.
    AddressRenewed {
        /// Node name.
        node: String,
        /// The new public address.
        new_addr: IpAddr,
        /// When the renewal completed.
        at: DateTime<Utc>,
    },

    /// Remediation for a node failed; the next cycle will re-attempt.
    RenewFailed {
        /// Node name.
        node: String,
        /// Why the renewal failed.
        reason: String,
        /// When the failure was observed.
        at: DateTime<Utc>,
    },
}

impl NotifyEvent {
    /// A node-blocked event stamped with the current time.
    #[must_use]
    pub fn node_blocked(node: impl Into<String>, domain: impl Into<String>) -> Self {
        Self::NodeBlocked {
            node: node.into(),
            domain: domain.into(),
            at: Utc::now(),
        }
    }

    /// An address-renewed event stamped with the current time.
    #[must_use]
    pub fn address_renewed(node: impl Into<String>, new_addr: IpAddr) -> Self {
        Self::AddressRenewed {
            node: node.into(),
            new_addr,
            at: Utc::now(),
        }
    }

    /// A renew-failed event stamped with the current time.
    #[must_use]
    pub fn renew_failed(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RenewFailed {
            node: node.into(),
            reason: reason.into(),
            at: Utc::now(),
        }
    }

    /// The node the event concerns.
    #[must_use]
    pub fn node(&self) -> &str {
        match self {
            Self::NodeBlocked { node, .. }
            | Self::AddressRenewed { node, .. }
            | Self::RenewFailed { node, .. } => node,
        }
    }
}

impl std::fmt::Display for NotifyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeBlocked { node, domain, .. } => {
                write!(f, "[{node}] blocked: {domain} is unreachable")
            }
            Self::AddressRenewed { node, new_addr, .. } => {
                write!(f, "[{node}] public address renewed to {new_addr}")
            }
            Self::RenewFailed { node, reason, .. } => {
                write!(f, "[{node}] address renewal failed: {reason}")
            }
        }
    }
}

/// Best-effort outbound notification delivery.
///
/// Never blocks the remediation path: callers log failures and move on.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one event.
    async fn notify(&self, event: NotifyEvent) -> Result<()>;
}
