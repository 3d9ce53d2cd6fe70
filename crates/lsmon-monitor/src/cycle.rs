//! One scan-and-remediate cycle: the classification fan-out, the blocked-set
//! aggregation, and the static-address lifecycle.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, info};

use lsmon_core::{RegionApi, STATIC_IP_NAME};

use crate::node::Node;
use crate::pool::WorkerPool;

/// Cycle-scoped aggregation of blocked nodes and their region handles.
///
/// Constructed fresh each cycle, populated concurrently by classification
/// tasks, consumed once by the remediation phase, then discarded.
#[derive(Default)]
pub(crate) struct BlockedSet {
    nodes: Vec<Arc<Node>>,
    regions: Vec<Arc<dyn RegionApi>>,
}

impl BlockedSet {
    /// Record a blocked node and implicate its region. Both collections stay
    /// duplicate-free; regions are keyed by name, nodes by identity.
    fn insert(&mut self, node: Arc<Node>) {
        let svc = Arc::clone(node.svc());
        if !self.regions.iter().any(|r| r.region() == svc.region()) {
            self.regions.push(svc);
        }
        if !self.nodes.iter().any(|n| Arc::ptr_eq(n, &node)) {
            self.nodes.push(node);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub(crate) fn region_count(&self) -> usize {
        self.regions.len()
    }
}

/// Fan out one classification task per node and gather the blocked ones.
///
/// Each task also kicks off the node's DNS refresh; the refresh outcome is
/// discarded, but the task joins it before finishing so nothing outlives the
/// barrier `run_all` provides. The lock guards only the push into the set,
/// never a remote call.
pub(crate) async fn classify(nodes: &[Arc<Node>], pool: &WorkerPool) -> BlockedSet {
    let blocked = Arc::new(Mutex::new(BlockedSet::default()));

    let tasks: Vec<_> = nodes
        .iter()
        .map(|node| {
            let node = Arc::clone(node);
            let blocked = Arc::clone(&blocked);
            async move {
                let ddns_refresh = tokio::spawn({
                    let node = Arc::clone(&node);
                    async move { node.update_domain_ip().await }
                });

                if node.is_blocked().await {
                    blocked
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(Arc::clone(&node));
                }

                // Bound the fire-and-forget refresh to this task.
                let _ = ddns_refresh.await;
            }
        })
        .collect();

    pool.run_all(tasks).await;

    // All tasks have joined, so this is the only reference left.
    Arc::try_unwrap(blocked).map_or_else(
        |_| BlockedSet::default(),
        |mutex| mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
    )
}

/// Drive the static-address lifecycle for a non-empty blocked set.
///
/// Strict phase order per cycle: pre-clean stale reservations, allocate one
/// fresh reservation per implicated region, renew every blocked node through
/// the pool, then release the reservations so they stop counting against the
/// per-region quota.
pub(crate) async fn remediate(set: BlockedSet, pool: &WorkerPool) {
    for svc in &set.regions {
        release_static_ips(svc.as_ref()).await;

        debug!(region = %svc.region(), "allocating static address");
        if let Err(e) = svc.allocate_static_ip(STATIC_IP_NAME).await {
            // Nodes in this region will likely fail their own renewal; other
            // regions proceed unaffected.
            error!(region = %svc.region(), error = %e, "static address allocation failed");
        }
    }

    let tasks: Vec<_> = set
        .nodes
        .iter()
        .map(|node| {
            let node = Arc::clone(node);
            async move { node.renew_ip().await }
        })
        .collect();
    pool.run_all(tasks).await;

    for svc in &set.regions {
        release_static_ips(svc.as_ref()).await;
    }

    info!(nodes = set.len(), regions = set.regions.len(), "remediation finished");
}

/// Release every reservation under the monitor's fixed name in one region.
///
/// Absence of a reservation is not an error; a failed release is logged and
/// the rest are still attempted.
async fn release_static_ips(svc: &dyn RegionApi) {
    debug!(region = %svc.region(), "releasing static addresses");
    match svc.list_static_ips().await {
        Ok(ips) => {
            for ip in ips.into_iter().filter(|ip| ip.name == STATIC_IP_NAME) {
                if let Err(e) = svc.release_static_ip(&ip.name).await {
                    error!(region = %svc.region(), name = %ip.name, error = %e, "static address release failed");
                }
            }
        }
        Err(e) => {
            error!(region = %svc.region(), error = %e, "could not list static addresses");
        }
    }
}
