//! The cycle scheduler: fixed-interval scan-and-remediate with
//! skip-if-running semantics.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use lsmon_core::{Config, LsmonError, Result};

use crate::cycle::{classify, remediate};
use crate::node::Node;
use crate::pool::WorkerPool;
use crate::probe::connectivity_check;

/// How a triggered cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle ran to completion; `blocked` nodes were remediated.
    Completed {
        /// Number of nodes classified blocked this cycle.
        blocked: usize,
    },
    /// The connectivity probe failed; no node work was done.
    Aborted,
    /// A previous cycle was still running; this trigger was dropped.
    Skipped,
}

/// The monitor service: owns the fleet and runs the scan-and-remediate cycle
/// on a fixed interval.
///
/// Lifecycle: [`Monitor::start`] runs one cycle synchronously (so initial
/// health is known immediately) and then arms the recurring scheduler;
/// [`Monitor::close`] stops the scheduler and waits for it. An interval tick
/// that fires while a cycle is still running is dropped, never queued.
pub struct Monitor {
    inner: Arc<MonitorInner>,
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

struct MonitorInner {
    nodes: Vec<Arc<Node>>,
    pool: WorkerPool,
    interval: Duration,
    timeout: Duration,
    check_url: String,
    /// Held for the duration of one cycle; `try_lock` failure means a cycle
    /// is still in flight and the trigger is skipped.
    cycle: Mutex<()>,
}

impl Monitor {
    /// Create a monitor for `nodes` using the validated configuration.
    pub fn new(config: &Config, nodes: Vec<Arc<Node>>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(LsmonError::Config("no valid node configured".into()));
        }
        let (shutdown_tx, _) = watch::channel(false);
        Ok(Self {
            inner: Arc::new(MonitorInner {
                nodes,
                pool: WorkerPool::new(config.concurrent),
                interval: Duration::from_secs(config.interval),
                timeout: Duration::from_secs(config.timeout),
                check_url: config.check_url.clone(),
                cycle: Mutex::new(()),
            }),
            shutdown_tx,
            handle: None,
        })
    }

    /// Number of monitored nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.nodes.len()
    }

    /// Run one cycle immediately, then arm the recurring scheduler.
    pub async fn start(&mut self) {
        info!("initial connectivity test");
        self.inner.run_cycle().await;

        let inner = Arc::clone(&self.inner);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial cycle already
            // ran, so consume it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        inner.run_cycle().await;
                    }
                    _ = shutdown_rx.changed() => {
                        debug!("scheduler stopping");
                        break;
                    }
                }
            }
        }));
        warn!("lsmon started");
    }

    /// Stop the scheduler and wait for it to wind down.
    ///
    /// No new cycles are triggered after this returns; a cycle already in
    /// flight finishes on its own.
    pub async fn close(&mut self) {
        info!("lsmon closing");
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Trigger one cycle by hand (also used by the scheduler loop).
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.inner.run_cycle().await
    }
}

impl MonitorInner {
    async fn run_cycle(&self) -> CycleOutcome {
        let Ok(_guard) = self.cycle.try_lock() else {
            warn!("previous cycle still running, skipping this trigger");
            return CycleOutcome::Skipped;
        };

        // Gate on our own egress before touching any node or provider quota.
        let latency = match connectivity_check(&self.check_url, self.timeout).await {
            Ok(latency) => latency,
            Err(e) => {
                error!(error = %e, "local connectivity check failed, cycle aborted");
                return CycleOutcome::Aborted;
            }
        };
        info!(latency_ms = latency.as_millis() as u64, "local network reachable");

        let blocked = classify(&self.nodes, &self.pool).await;
        let count = blocked.len();
        if blocked.is_empty() {
            debug!("no blocked nodes this cycle");
        } else {
            info!(blocked = count, "remediating blocked nodes");
            remediate(blocked, &self.pool).await;
        }

        CycleOutcome::Completed { blocked: count }
    }
}
