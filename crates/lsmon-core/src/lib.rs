//! Core types and traits for the lsmon fleet monitor.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - **Config**: the validated, read-only configuration model
//! - **Errors**: the error taxonomy with [`LsmonError`]
//! - **Seams**: the [`RegionApi`], [`DnsProvider`] and [`Notifier`] traits the
//!   orchestrator is written against

mod config;
mod dns;
mod error;
mod notify;
mod provider;
mod types;

pub use config::{
    Config, DdnsConfig, NodeConfig, NotifyConfig, ProviderConfig, DEFAULT_CHECK_URL,
};
pub use dns::DnsProvider;
pub use error::{LsmonError, Result};
pub use notify::{Notifier, NotifyEvent};
pub use provider::{RegionApi, STATIC_IP_NAME};
pub use types::{InstanceInfo, StaticIp};
