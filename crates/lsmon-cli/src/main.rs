//! lsmon - fleet monitor daemon.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    lsmon_cli::run().await
}
