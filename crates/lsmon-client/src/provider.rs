//! [`RegionApi`] implementation for [`RegionClient`].

use async_trait::async_trait;
use std::net::IpAddr;
use tracing::debug;

use lsmon_core::{LsmonError, RegionApi, Result, StaticIp};

use crate::RegionClient;

#[async_trait]
impl RegionApi for RegionClient {
    fn region(&self) -> &str {
        self.region_name()
    }

    async fn list_static_ips(&self) -> Result<Vec<StaticIp>> {
        self.static_ips().list().await
    }

    async fn allocate_static_ip(&self, name: &str) -> Result<StaticIp> {
        self.static_ips().allocate(name).await
    }

    async fn release_static_ip(&self, name: &str) -> Result<()> {
        self.static_ips().release(name).await
    }

    async fn renew_instance_address(&self, instance: &str, static_ip: &str) -> Result<IpAddr> {
        // Cycling the reserved address through the instance discards its
        // blocked dynamic address: detaching hands out a fresh one.
        self.static_ips().attach(static_ip, instance).await?;
        self.static_ips().detach(static_ip).await?;

        let info = self.instances().get(instance).await?;
        debug!(instance, address = ?info.public_ip, "instance address after renewal");
        info.public_ip.ok_or_else(|| {
            LsmonError::InvalidAddress(format!("no public address reported for {instance}"))
        })
    }

    async fn instance_address(&self, instance: &str) -> Result<IpAddr> {
        let info = self.instances().get(instance).await?;
        info.public_ip.ok_or_else(|| {
            LsmonError::InvalidAddress(format!("no public address reported for {instance}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn renew_attaches_detaches_then_reads_address() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/static-ips/lsmon/attach"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/static-ips/lsmon/attachment"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/instances/web-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "web-1",
                "public_ip": "198.51.100.23"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RegionClient::builder("eu-west-1", "token")
            .base_url(server.uri())
            .build();
        let addr = client.renew_instance_address("web-1", "lsmon").await.unwrap();
        assert_eq!(addr.to_string(), "198.51.100.23");

        // attach must precede detach on the wire.
        let requests = server.received_requests().await.unwrap();
        let order: Vec<String> = requests.iter().map(|r| r.method.to_string()).collect();
        assert_eq!(order, ["POST", "DELETE", "GET"]);
    }

    #[tokio::test]
    async fn renew_without_public_address_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "web-1"})),
            )
            .mount(&server)
            .await;

        let client = RegionClient::builder("eu-west-1", "token")
            .base_url(server.uri())
            .build();
        let err = client.renew_instance_address("web-1", "lsmon").await.unwrap_err();
        assert!(matches!(err, LsmonError::InvalidAddress(_)));
    }
}
