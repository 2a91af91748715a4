//! Periodic self-ping so free-tier hosts do not idle the service out

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// GET `url` every `every`, logging the result. Failures never stop the loop.
pub fn spawn_keepalive(url: String, every: Duration) -> reqwest::Result<JoinHandle<()>> {
    let client = reqwest::Client::builder().timeout(PING_TIMEOUT).build()?;
    info!("Keep-alive enabled: {} every {:?}", url, every);

    Ok(tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("Keep-alive ping ok ({})", response.status())
                }
                Ok(response) => warn!("Keep-alive ping returned {}", response.status()),
                Err(e) => warn!("Keep-alive ping failed: {}", e),
            }
        }
    }))
}
