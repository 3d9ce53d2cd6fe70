//! Webhook notifier.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use lsmon_core::{LsmonError, Notifier, NotifyConfig, NotifyEvent, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts events to a chat/webhook endpoint as JSON.
pub struct WebhookNotifier {
    http: HttpClient,
    url: String,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: String,
    #[serde(flatten)]
    event: &'a NotifyEvent,
}

impl WebhookNotifier {
    /// Create a notifier from validated settings
    pub fn new(config: &NotifyConfig) -> Result<Self> {
        Url::parse(&config.webhook_url)
            .map_err(|e| LsmonError::InvalidUrl(format!("{}: {e}", config.webhook_url)))?;

        let http = HttpClient::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| LsmonError::Http(e.to_string()))?;

        Ok(Self {
            http,
            url: config.webhook_url.clone(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: NotifyEvent) -> Result<()> {
        debug!(node = event.node(), "delivering notification");
        let response = self
            .http
            .post(&self.url)
            .json(&WebhookPayload {
                text: event.to_string(),
                event: &event,
            })
            .send()
            .await
            .map_err(|e| LsmonError::Notify(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(LsmonError::Notify(format!("webhook status {status}")))
        }
    }
}
