//! Dynamic-DNS seam.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::error::Result;

/// Updates a DNS record to a node's current public address.
///
/// Invoked fire-and-forget per node per cycle; a failure is logged by the
/// caller and never affects block classification.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Point `domain` at `addr`.
    async fn update_record(&self, domain: &str, addr: IpAddr) -> Result<()>;
}
