//! Dynamic-DNS client.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;
use url::Url;

use lsmon_core::{DdnsConfig, DnsProvider, LsmonError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a zone-based DNS provider.
///
/// Speaks a minimal record-update protocol:
/// `PUT {endpoint}/zones/{zone}/records/{domain}` with the new address.
pub struct DdnsClient {
    http: HttpClient,
    endpoint: String,
    api_token: String,
    zone: String,
}

#[derive(Serialize)]
struct UpdateRecordRequest<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    content: String,
}

impl DdnsClient {
    /// Create a client from validated DDNS settings
    pub fn new(config: &DdnsConfig) -> Result<Self> {
        Url::parse(&config.endpoint)
            .map_err(|e| LsmonError::InvalidUrl(format!("{}: {e}", config.endpoint)))?;

        let http = HttpClient::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| LsmonError::Http(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            zone: config.zone.clone(),
        })
    }
}

#[async_trait]
impl DnsProvider for DdnsClient {
    async fn update_record(&self, domain: &str, addr: IpAddr) -> Result<()> {
        let url = format!("{}/zones/{}/records/{domain}", self.endpoint, self.zone);
        let record_type = if addr.is_ipv4() { "A" } else { "AAAA" };
        debug!(%url, %addr, record_type, "updating DNS record");

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(&UpdateRecordRequest {
                record_type,
                content: addr.to_string(),
            })
            .send()
            .await
            .map_err(|e| LsmonError::Dns(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(LsmonError::Dns(format!("{domain}: status {status}: {body}")))
        }
    }
}
