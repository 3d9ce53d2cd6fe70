//! Region-scoped provider client.

use crate::api::{InstanceApi, StaticIpApi};
use lsmon_core::{LsmonError, Result};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-region endpoint template; `{region}` is substituted at build time.
const DEFAULT_ENDPOINT_TEMPLATE: &str = "https://compute.{region}.cloudapi.net/v1";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider API client scoped to a single region.
///
/// All nodes in a region share one clone of this client; the remediation
/// coordinator uses the set of distinct region clients as its unit of
/// address-quota management.
#[derive(Clone)]
pub struct RegionClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    region: String,
    base_url: String,
    api_token: String,
}

impl RegionClient {
    /// Create a new client for `region` using default settings
    #[must_use]
    pub fn new(region: impl Into<String>, api_token: impl Into<String>) -> Self {
        RegionClientBuilder::new(region, api_token).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(
        region: impl Into<String>,
        api_token: impl Into<String>,
    ) -> RegionClientBuilder {
        RegionClientBuilder::new(region, api_token)
    }

    /// The region this client is scoped to
    #[must_use]
    pub fn region_name(&self) -> &str {
        &self.inner.region
    }

    /// Access static-address endpoints
    #[must_use]
    pub fn static_ips(&self) -> StaticIpApi<'_> {
        StaticIpApi::new(self)
    }

    /// Access instance endpoints
    #[must_use]
    pub fn instances(&self) -> InstanceApi<'_> {
        InstanceApi::new(self)
    }

    /// Perform a GET request
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(&url)
            .bearer_auth(&self.inner.api_token)
            .send()
            .await
            .map_err(|e| LsmonError::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Perform a POST request with JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .http
            .post(&url)
            .bearer_auth(&self.inner.api_token)
            .json(body)
            .send()
            .await
            .map_err(|e| LsmonError::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Perform a POST request that returns no body
    pub(crate) async fn post_empty<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .http
            .post(&url)
            .bearer_auth(&self.inner.api_token)
            .json(body)
            .send()
            .await
            .map_err(|e| LsmonError::Http(e.to_string()))?;

        self.handle_empty_response(response).await
    }

    /// Perform a DELETE request
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!(url = %url, "DELETE request");

        let response = self
            .inner
            .http
            .delete(&url)
            .bearer_auth(&self.inner.api_token)
            .send()
            .await
            .map_err(|e| LsmonError::Http(e.to_string()))?;

        self.handle_empty_response(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// Handle an API response that returns JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| LsmonError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(LsmonError::Json)
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Handle an API response that returns no body
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to a typed error
    async fn handle_error<T>(&self, status: u16, response: reqwest::Response) -> Result<T> {
        let body = response.text().await.unwrap_or_default();

        // Try to parse error message from JSON
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);

        match status {
            401 => Err(LsmonError::Unauthorized),
            404 => Err(LsmonError::NotFound { resource: message }),
            409 => {
                warn!(region = %self.inner.region, "static address quota exhausted");
                Err(LsmonError::QuotaExceeded {
                    region: self.inner.region.clone(),
                })
            }
            _ => Err(LsmonError::Api {
                code: status,
                message,
            }),
        }
    }
}

/// Builder for configuring a [`RegionClient`]
pub struct RegionClientBuilder {
    region: String,
    api_token: String,
    base_url: Option<String>,
    timeout: Duration,
    user_agent: String,
}

impl RegionClientBuilder {
    /// Create a new builder for `region`
    #[must_use]
    pub fn new(region: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            api_token: api_token.into(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("lsmon/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    #[must_use]
    pub fn build(self) -> RegionClient {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_ENDPOINT_TEMPLATE.replace("{region}", &self.region));

        RegionClient {
            inner: Arc::new(ClientInner {
                http,
                region: self.region,
                base_url,
                api_token: self.api_token,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn default_endpoint_substitutes_region() {
        let client = RegionClient::new("eu-west-1", "token");
        assert_eq!(client.region_name(), "eu-west-1");
        assert_eq!(
            client.url("/instances/web-1"),
            "https://compute.eu-west-1.cloudapi.net/v1/instances/web-1"
        );
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instances/web-1"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "web-1",
                "public_ip": "203.0.113.10"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RegionClient::builder("eu-west-1", "secret")
            .base_url(server.uri())
            .build();
        let info = client.instances().get("web-1").await.unwrap();
        assert_eq!(info.public_ip.unwrap().to_string(), "203.0.113.10");
    }

    #[tokio::test]
    async fn maps_401_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = RegionClient::builder("eu-west-1", "bad")
            .base_url(server.uri())
            .build();
        let err = client.static_ips().list().await.unwrap_err();
        assert!(matches!(err, LsmonError::Unauthorized));
    }

    #[tokio::test]
    async fn maps_409_to_quota_exceeded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(serde_json::json!({"error": "quota exhausted"})),
            )
            .mount(&server)
            .await;

        let client = RegionClient::builder("ap-northeast-1", "token")
            .base_url(server.uri())
            .build();
        let err = client.static_ips().allocate("lsmon").await.unwrap_err();
        assert!(
            matches!(err, LsmonError::QuotaExceeded { ref region } if region == "ap-northeast-1")
        );
    }

    #[tokio::test]
    async fn extracts_error_message_from_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"error": "internal failure"})),
            )
            .mount(&server)
            .await;

        let client = RegionClient::builder("eu-west-1", "token")
            .base_url(server.uri())
            .build();
        let err = client.static_ips().list().await.unwrap_err();
        match err {
            LsmonError::Api { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, "internal failure");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
