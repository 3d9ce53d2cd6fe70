//! Wires configuration into a runnable fleet.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use lsmon_client::{DdnsClient, RegionClient, WebhookNotifier};
use lsmon_core::{Config, DnsProvider, Notifier, RegionApi};
use lsmon_monitor::Node;

/// Build the node fleet from config: one shared region client per distinct
/// region, plus the optional DDNS and notifier collaborators.
pub fn build_fleet(config: &Config) -> Result<Vec<Arc<Node>>> {
    let ddns: Option<Arc<dyn DnsProvider>> = match &config.ddns {
        Some(settings) if settings.enable => Some(Arc::new(
            DdnsClient::new(settings).context("building ddns client")?,
        )),
        _ => None,
    };

    let notifier: Option<Arc<dyn Notifier>> = match &config.notify {
        Some(settings) if settings.enable => Some(Arc::new(
            WebhookNotifier::new(settings).context("building notifier")?,
        )),
        _ => None,
    };

    let timeout = Duration::from_secs(config.timeout);
    let mut regions: HashMap<String, Arc<RegionClient>> = HashMap::new();
    let mut nodes = Vec::with_capacity(config.nodes.len());

    for spec in &config.nodes {
        let svc = regions
            .entry(spec.region.clone())
            .or_insert_with(|| {
                debug!(region = %spec.region, "creating region client");
                let mut builder = RegionClient::builder(&spec.region, &config.provider.api_token)
                    .timeout(timeout);
                if let Some(template) = &config.provider.endpoint {
                    builder = builder.base_url(template.replace("{region}", &spec.region));
                }
                Arc::new(builder.build())
            });

        nodes.push(Arc::new(Node::new(
            spec,
            Arc::clone(svc) as Arc<dyn RegionApi>,
            ddns.clone(),
            notifier.clone(),
            timeout,
        )));
    }

    Ok(nodes)
}
