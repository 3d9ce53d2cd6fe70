//! HTTP clients for lsmon's external collaborators.
//!
//! - [`RegionClient`]: region-scoped cloud provider API (static addresses,
//!   instances), implementing the [`lsmon_core::RegionApi`] seam
//! - [`DdnsClient`]: dynamic-DNS record updates
//! - [`WebhookNotifier`]: best-effort event delivery

mod api;
mod client;
mod ddns;
mod provider;
mod webhook;

pub use api::{InstanceApi, StaticIpApi};
pub use client::{RegionClient, RegionClientBuilder};
pub use ddns::DdnsClient;
pub use webhook::WebhookNotifier;
