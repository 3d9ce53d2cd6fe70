//! Static-address endpoints.

use crate::RegionClient;
use lsmon_core::{Result, StaticIp};
use serde::{Deserialize, Serialize};

/// Static-address endpoints
pub struct StaticIpApi<'a> {
    client: &'a RegionClient,
}

#[derive(Deserialize)]
struct ListStaticIpsResponse {
    static_ips: Vec<StaticIp>,
}

#[derive(Serialize)]
struct AllocateRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct AttachRequest<'a> {
    instance: &'a str,
}

impl<'a> StaticIpApi<'a> {
    pub(crate) fn new(client: &'a RegionClient) -> Self {
        Self { client }
    }

    /// List all reserved addresses in the region
    pub async fn list(&self) -> Result<Vec<StaticIp>> {
        let response: ListStaticIpsResponse = self.client.get("/static-ips").await?;
        Ok(response.static_ips)
    }

    /// Reserve a new address under `name`
    pub async fn allocate(&self, name: &str) -> Result<StaticIp> {
        self.client
            .post("/static-ips", &AllocateRequest { name })
            .await
    }

    /// Release the reservation named `name`
    pub async fn release(&self, name: &str) -> Result<()> {
        self.client.delete(&format!("/static-ips/{name}")).await
    }

    /// Attach the reservation named `name` to `instance`
    pub async fn attach(&self, name: &str, instance: &str) -> Result<()> {
        self.client
            .post_empty(&format!("/static-ips/{name}/attach"), &AttachRequest { instance })
            .await
    }

    /// Detach the reservation named `name` from whatever it is attached to.
    ///
    /// Detaching forces the provider to assign the instance a fresh dynamic
    /// address.
    pub async fn detach(&self, name: &str) -> Result<()> {
        self.client
            .delete(&format!("/static-ips/{name}/attachment"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::RegionClient;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> RegionClient {
        RegionClient::builder("eu-west-1", "token")
            .base_url(server.uri())
            .build()
    }

    #[tokio::test]
    async fn list_parses_reservations() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/static-ips"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "static_ips": [
                    {"name": "lsmon", "ip_address": "203.0.113.5", "attached_to": null},
                    {"name": "other", "ip_address": "203.0.113.6", "attached_to": "db-1"}
                ]
            })))
            .mount(&server)
            .await;

        let ips = client(&server).await.static_ips().list().await.unwrap();
        assert_eq!(ips.len(), 2);
        assert_eq!(ips[0].name, "lsmon");
        assert!(!ips[0].is_attached());
        assert!(ips[1].is_attached());
    }

    #[tokio::test]
    async fn allocate_posts_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/static-ips"))
            .and(body_json(serde_json::json!({"name": "lsmon"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "name": "lsmon",
                "ip_address": "203.0.113.9"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ip = client(&server).await.static_ips().allocate("lsmon").await.unwrap();
        assert_eq!(ip.ip_address.unwrap().to_string(), "203.0.113.9");
    }

    #[tokio::test]
    async fn release_deletes_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/static-ips/lsmon"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).await.static_ips().release("lsmon").await.unwrap();
    }

    #[tokio::test]
    async fn attach_and_detach() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/static-ips/lsmon/attach"))
            .and(body_json(serde_json::json!({"instance": "web-1"})))
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

        let client = client(&server).await;
        client.static_ips().attach("lsmon", "web-1").await.unwrap();
        client.static_ips().detach("lsmon").await.unwrap();
    }
}
