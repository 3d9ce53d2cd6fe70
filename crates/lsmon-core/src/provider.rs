//! Cloud provider seam.
//!
//! One [`RegionApi`] implementor exists per region; every node in that region
//! shares it. The remediation coordinator treats the set of distinct region
//! handles among blocked nodes as the unit of address-quota management.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::error::Result;
use crate::types::StaticIp;

/// Fixed name under which the monitor reserves static addresses.
///
/// Keeping a single well-known name lets every cycle find and release stale
/// reservations left behind by earlier runs.
pub const STATIC_IP_NAME: &str = "lsmon";

/// Region-scoped provider operations the monitor depends on.
///
/// The monitor cares only about these operations succeeding or returning a
/// typed error; the wire protocol behind them is an implementation detail of
/// the client crate.
#[async_trait]
pub trait RegionApi: Send + Sync {
    /// The region this handle is scoped to.
    fn region(&self) -> &str;

    /// List the region's reserved static addresses.
    async fn list_static_ips(&self) -> Result<Vec<StaticIp>>;

    /// Reserve a new static address under `name`.
    async fn allocate_static_ip(&self, name: &str) -> Result<StaticIp>;

    /// Release the reservation named `name`, returning it to the quota pool.
    async fn release_static_ip(&self, name: &str) -> Result<()>;

    /// Force a fresh public address onto `instance` by cycling the reserved
    /// address named `static_ip` through it. Returns the new address.
    async fn renew_instance_address(&self, instance: &str, static_ip: &str) -> Result<IpAddr>;

    /// Current public address of `instance`.
    async fn instance_address(&self, instance: &str) -> Result<IpAddr>;
}
