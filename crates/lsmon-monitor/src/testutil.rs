//! In-memory fakes shared by the orchestrator tests.

use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use lsmon_core::{
    DnsProvider, LsmonError, NodeConfig, Notifier, NotifyEvent, RegionApi, Result, StaticIp,
    STATIC_IP_NAME,
};

use crate::node::Node;

/// Recording fake for one region's provider API.
///
/// Starts with one stale reservation under the fixed name, so the pre-clean
/// phase has something to release. Every call is appended to a journal as
/// `"{region}:{op}"` entries for ordering assertions.
pub(crate) struct MockRegion {
    region: String,
    journal: Mutex<Vec<String>>,
    allocated: AtomicBool,
    fail_allocate: AtomicBool,
    fail_renew: AtomicBool,
}

impl MockRegion {
    pub(crate) fn new(region: &str) -> Arc<Self> {
        Arc::new(Self {
            region: region.to_string(),
            journal: Mutex::new(Vec::new()),
            allocated: AtomicBool::new(true),
            fail_allocate: AtomicBool::new(false),
            fail_renew: AtomicBool::new(false),
        })
    }

    pub(crate) fn fail_allocate(self: Arc<Self>) -> Arc<Self> {
        self.fail_allocate.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn fail_renew(self: Arc<Self>) -> Arc<Self> {
        self.fail_renew.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn journal(&self) -> Vec<String> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, entry: String) {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    fn addr() -> IpAddr {
        "198.51.100.77".parse().expect("valid test address")
    }
}

#[async_trait]
impl RegionApi for MockRegion {
    fn region(&self) -> &str {
        &self.region
    }

    async fn list_static_ips(&self) -> Result<Vec<StaticIp>> {
        self.record(format!("{}:list", self.region));
        if self.allocated.load(Ordering::SeqCst) {
            Ok(vec![StaticIp {
                name: STATIC_IP_NAME.to_string(),
                ip_address: Some(Self::addr()),
                attached_to: None,
            }])
        } else {
            Ok(Vec::new())
        }
    }

    async fn allocate_static_ip(&self, name: &str) -> Result<StaticIp> {
        self.record(format!("{}:allocate", self.region));
        if self.fail_allocate.load(Ordering::SeqCst) {
            return Err(LsmonError::QuotaExceeded {
                region: self.region.clone(),
            });
        }
        self.allocated.store(true, Ordering::SeqCst);
        Ok(StaticIp {
            name: name.to_string(),
            ip_address: Some(Self::addr()),
            attached_to: None,
        })
    }

    async fn release_static_ip(&self, name: &str) -> Result<()> {
        self.record(format!("{}:release:{name}", self.region));
        self.allocated.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn renew_instance_address(&self, instance: &str, _static_ip: &str) -> Result<IpAddr> {
        self.record(format!("{}:renew:{instance}", self.region));
        if self.fail_renew.load(Ordering::SeqCst) {
            return Err(LsmonError::Api {
                code: 500,
                message: "renew refused".into(),
            });
        }
        Ok(Self::addr())
    }

    async fn instance_address(&self, instance: &str) -> Result<IpAddr> {
        self.record(format!("{}:address:{instance}", self.region));
        Ok(Self::addr())
    }
}

/// Recording fake DNS provider.
#[derive(Default)]
pub(crate) struct MockDns {
    updates: Mutex<Vec<(String, IpAddr)>>,
}

impl MockDns {
    pub(crate) fn updates(&self) -> Vec<(String, IpAddr)> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DnsProvider for MockDns {
    async fn update_record(&self, domain: &str, addr: IpAddr) -> Result<()> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((domain.to_string(), addr));
        Ok(())
    }
}

/// Recording fake notifier.
#[derive(Default)]
pub(crate) struct MockNotifier {
    events: Mutex<Vec<NotifyEvent>>,
}

impl MockNotifier {
    pub(crate) fn events(&self) -> Vec<NotifyEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, event: NotifyEvent) -> Result<()> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

/// A node probing `127.0.0.1:port`, wired to a fake region.
pub(crate) fn test_node(name: &str, port: u16, region: &Arc<MockRegion>) -> Node {
    test_node_with(name, port, region, None, None)
}

pub(crate) fn test_node_with(
    name: &str,
    port: u16,
    region: &Arc<MockRegion>,
    ddns: Option<Arc<MockDns>>,
    notifier: Option<Arc<MockNotifier>>,
) -> Node {
    let config = NodeConfig {
        name: name.to_string(),
        domain: "127.0.0.1".to_string(),
        port,
        region: region.region.clone(),
    };
    Node::new(
        &config,
        Arc::clone(region) as Arc<dyn RegionApi>,
        ddns.map(|d| d as Arc<dyn DnsProvider>),
        notifier.map(|n| n as Arc<dyn Notifier>),
        Duration::from_millis(250),
    )
}
