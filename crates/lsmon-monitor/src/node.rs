//! One monitored node: reachability check, DNS refresh, address renewal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpStream;
use tracing::{debug, error, info, warn};

use lsmon_core::{DnsProvider, NodeConfig, Notifier, NotifyEvent, RegionApi, STATIC_IP_NAME};

/// Reachability probe attempts per classification.
const PROBE_ATTEMPTS: u32 = 3;

/// A monitored cloud instance.
///
/// Constructed once at startup and held for the process lifetime; mutated
/// only through its own check/renew operations.
pub struct Node {
    name: String,
    domain: String,
    port: u16,
    svc: Arc<dyn RegionApi>,
    ddns: Option<Arc<dyn DnsProvider>>,
    notifier: Option<Arc<dyn Notifier>>,
    timeout: Duration,
    /// Last-known-blocked flag; drives transition logging and notifications.
    blocked: AtomicBool,
}

impl Node {
    /// Create a node from its config entry and shared collaborators.
    #[must_use]
    pub fn new(
        config: &NodeConfig,
        svc: Arc<dyn RegionApi>,
        ddns: Option<Arc<dyn DnsProvider>>,
        notifier: Option<Arc<dyn Notifier>>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: config.name.clone(),
            domain: config.domain.clone(),
            port: config.port,
            svc,
            ddns,
            notifier,
            timeout,
            blocked: AtomicBool::new(false),
        }
    }

    /// The node's instance name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The region handle this node belongs to.
    #[must_use]
    pub fn svc(&self) -> &Arc<dyn RegionApi> {
        &self.svc
    }

    /// Classify the node's public address as blocked or reachable.
    ///
    /// The authoritative signal for remediation eligibility: a TCP connect to
    /// `domain:port` from the vantage point, up to [`PROBE_ATTEMPTS`] tries
    /// with the configured timeout each.
    pub async fn is_blocked(&self) -> bool {
        let addr = format!("{}:{}", self.domain, self.port);
        for attempt in 1..=PROBE_ATTEMPTS {
            let start = Instant::now();
            match tokio::time::timeout(self.timeout, TcpStream::connect(&addr)).await {
                Ok(Ok(_stream)) => {
                    let latency_ms = start.elapsed().as_millis() as u64;
                    debug!(node = %self.name, %addr, latency_ms, "node reachable");
                    if self.blocked.swap(false, Ordering::SeqCst) {
                        info!(node = %self.name, "node recovered");
                    }
                    return false;
                }
                Ok(Err(e)) => {
                    debug!(node = %self.name, %addr, attempt, error = %e, "connect failed");
                }
                Err(_) => {
                    debug!(node = %self.name, %addr, attempt, "connect timed out");
                }
            }
        }

        warn!(node = %self.name, %addr, "node classified blocked");
        if !self.blocked.swap(true, Ordering::SeqCst) {
            self.send_notify(NotifyEvent::node_blocked(&self.name, &self.domain))
                .await;
        }
        true
    }

    /// Best-effort refresh of the node's DNS record to its current address.
    ///
    /// Failures are logged only; classification never depends on this.
    pub async fn update_domain_ip(&self) {
        let Some(ddns) = &self.ddns else { return };

        match self.svc.instance_address(&self.name).await {
            Ok(addr) => {
                if let Err(e) = ddns.update_record(&self.domain, addr).await {
                    warn!(node = %self.name, domain = %self.domain, error = %e, "ddns refresh failed");
                } else {
                    debug!(node = %self.name, domain = %self.domain, %addr, "ddns record refreshed");
                }
            }
            Err(e) => {
                warn!(node = %self.name, error = %e, "could not read instance address");
            }
        }
    }

    /// Swap the node's blocked public address for a fresh one.
    ///
    /// Safe to re-attempt: a failure leaves the node flagged blocked and the
    /// next cycle retries. Never fatal to the surrounding cycle.
    pub async fn renew_ip(&self) {
        info!(node = %self.name, region = %self.svc.region(), "renewing public address");
        match self
            .svc
            .renew_instance_address(&self.name, STATIC_IP_NAME)
            .await
        {
            Ok(new_addr) => {
                info!(node = %self.name, %new_addr, "public address renewed");
                self.blocked.store(false, Ordering::SeqCst);
                if let Some(ddns) = &self.ddns {
                    if let Err(e) = ddns.update_record(&self.domain, new_addr).await {
                        warn!(node = %self.name, error = %e, "ddns refresh after renewal failed");
                    }
                }
                self.send_notify(NotifyEvent::address_renewed(&self.name, new_addr))
                    .await;
            }
            Err(e) => {
                error!(node = %self.name, error = %e, "address renewal failed");
                self.send_notify(NotifyEvent::renew_failed(&self.name, e.to_string()))
                    .await;
            }
        }
    }

    async fn send_notify(&self, event: NotifyEvent) {
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.notify(event).await {
                warn!(node = %self.name, error = %e, "notification failed");
            }
        }
    }
}
