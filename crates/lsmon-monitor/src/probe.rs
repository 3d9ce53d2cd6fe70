//! Egress connectivity gate.

use std::time::{Duration, Instant};

use lsmon_core::{LsmonError, Result};
use tracing::debug;

/// Fixed retry budget for the connectivity check.
const ATTEMPTS: u32 = 3;

/// Confirm the monitor's own network egress before spending any provider
/// quota on remediation.
///
/// Issues up to [`ATTEMPTS`] GETs against `url` and passes only on a 204
/// response. Returns the round-trip latency of the successful attempt. A
/// degraded vantage point would classify every node as blocked, so callers
/// abort the whole cycle on failure.
pub async fn connectivity_check(url: &str, timeout: Duration) -> Result<Duration> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LsmonError::Http(e.to_string()))?;

    let mut last_err = LsmonError::Connection("connectivity check never attempted".into());
    for attempt in 1..=ATTEMPTS {
        let start = Instant::now();
        match client.get(url).send().await {
            Ok(response) if response.status() == reqwest::StatusCode::NO_CONTENT => {
                return Ok(start.elapsed());
            }
            Ok(response) => {
                debug!(attempt, status = %response.status(), "unexpected connectivity check status");
                last_err = LsmonError::Api {
                    code: response.status().as_u16(),
                    message: "unexpected connectivity check status".into(),
                };
            }
            Err(e) => {
                debug!(attempt, error = %e, "connectivity check request failed");
                last_err = LsmonError::Http(e.to_string());
            }
        }
    }
    Err(last_err)
}
