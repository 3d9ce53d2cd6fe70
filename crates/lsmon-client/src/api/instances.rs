//! Instance endpoints.

use crate::RegionClient;
use lsmon_core::{InstanceInfo, Result};

/// Instance endpoints
pub struct InstanceApi<'a> {
    client: &'a RegionClient,
}

impl<'a> InstanceApi<'a> {
    pub(crate) fn new(client: &'a RegionClient) -> Self {
        Self { client }
    }

    /// Get the provider's view of an instance
    pub async fn get(&self, name: &str) -> Result<InstanceInfo> {
        self.client.get(&format!("/instances/{name}")).await
    }
}
