//! Block-detection and remediation orchestrator.
//!
//! Drives the whole scan-and-remediate cycle:
//!
//! - **Connectivity probe**: gates each cycle on the monitor's own egress
//! - **Node**: per-node reachability check, DNS refresh and address renewal
//! - **Worker pool**: bounded-concurrency fan-out with a full join barrier
//! - **Cycle**: blocked-set aggregation and the static-address lifecycle
//! - **Monitor**: the overlap-safe interval scheduler with Start/Close

mod cycle;
mod monitor;
mod node;
mod pool;
mod probe;

#[cfg(test)]
mod testutil;

pub use monitor::{CycleOutcome, Monitor};
pub use node::Node;
pub use pool::WorkerPool;
pub use probe::connectivity_check;
