//! Configuration model.
//!
//! Loaded once at startup (the CLI parses the TOML file), validated with
//! [`Config::validate`], then treated as read-only for the process lifetime.

use serde::{Deserialize, Serialize};

use crate::error::{LsmonError, Result};

/// Default connectivity-check endpoint (expects a 204 response).
pub const DEFAULT_CHECK_URL: &str = "http://connectivitycheck.gstatic.com/generate_204";

/// Top-level monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log verbosity (tracing env-filter syntax, e.g. "info" or "lsmon=debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds between scan cycles.
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Maximum number of node tasks in flight at once.
    #[serde(default = "default_concurrent")]
    pub concurrent: usize,

    /// Per-request timeout in seconds (probes and provider calls).
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connectivity-check endpoint; a cycle is aborted when it does not
    /// answer 204.
    #[serde(default = "default_check_url")]
    pub check_url: String,

    /// Cloud provider credentials and endpoint.
    pub provider: ProviderConfig,

    /// Monitored nodes.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,

    /// Optional dynamic-DNS settings.
    #[serde(default)]
    pub ddns: Option<DdnsConfig>,

    /// Optional notification settings.
    #[serde(default)]
    pub notify: Option<NotifyConfig>,
}

/// Cloud provider access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API token for the provider.
    pub api_token: String,

    /// Optional per-region endpoint template; `{region}` is substituted.
    /// Defaults to the provider's public endpoint.
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// One monitored node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Provider-side instance name.
    pub name: String,

    /// Host or domain probed for reachability (and refreshed via DDNS).
    pub domain: String,

    /// TCP port probed on `domain`.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Provider region the instance lives in.
    pub region: String,
}

/// Dynamic-DNS settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// Whether DDNS refresh is active.
    #[serde(default)]
    pub enable: bool,

    /// Base URL of the DNS provider API.
    #[serde(default)]
    pub endpoint: String,

    /// API token for the DNS provider.
    #[serde(default)]
    pub api_token: String,

    /// Zone the node records live in.
    #[serde(default)]
    pub zone: String,
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Whether notifications are active.
    #[serde(default)]
    pub enable: bool,

    /// Webhook URL events are posted to.
    #[serde(default)]
    pub webhook_url: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_interval() -> u64 {
    600
}

const fn default_concurrent() -> usize {
    5
}

const fn default_timeout() -> u64 {
    5
}

fn default_check_url() -> String {
    DEFAULT_CHECK_URL.to_string()
}

const fn default_port() -> u16 {
    443
}

impl Config {
    /// Validate the configuration.
    ///
    /// All failures here are fatal-at-startup: the monitor refuses to start
    /// with a config it cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(LsmonError::Config("no valid node configured".into()));
        }
        if self.concurrent == 0 {
            return Err(LsmonError::Config("concurrent must be at least 1".into()));
        }
        if self.interval == 0 {
            return Err(LsmonError::Config("interval must be at least 1 second".into()));
        }
        if self.timeout == 0 {
            return Err(LsmonError::Config("timeout must be at least 1 second".into()));
        }
        if self.provider.api_token.is_empty() {
            return Err(LsmonError::Config("provider.api_token is required".into()));
        }
        for node in &self.nodes {
            if node.name.is_empty() || node.domain.is_empty() || node.region.is_empty() {
                return Err(LsmonError::Config(format!(
                    "node {:?} must have name, domain and region",
                    node.name
                )));
            }
        }
        if let Some(ddns) = &self.ddns {
            if ddns.enable && (ddns.endpoint.is_empty() || ddns.api_token.is_empty() || ddns.zone.is_empty()) {
                return Err(LsmonError::Config(
                    "ddns is enabled but endpoint, api_token or zone is missing".into(),
                ));
            }
        }
        if let Some(notify) = &self.notify {
            if notify.enable && notify.webhook_url.is_empty() {
                return Err(LsmonError::Config(
                    "notify is enabled but webhook_url is missing".into(),
                ));
            }
        }
        Ok(())
    }

    /// Whether DDNS refresh is configured and enabled.
    #[must_use]
    pub fn ddns_enabled(&self) -> bool {
        self.ddns.as_ref().is_some_and(|d| d.enable)
    }

    /// Whether notifications are configured and enabled.
    #[must_use]
    pub fn notify_enabled(&self) -> bool {
        self.notify.as_ref().is_some_and(|n| n.enable)
    }
}
