use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use shared_utils::clock;

use crate::models::SlotError;
use crate::store::SlotRepository;

/// Background sweep that deactivates slots whose instant has passed.
///
/// Expired slots are flipped inactive, never deleted, so dashboards keep
/// their history. The sweep is idempotent and commutes with concurrent
/// booking traffic: it only touches `is_active`, while capacity moves
/// through atomic deltas.
pub struct ExpirySweeper {
    repo: Arc<dyn SlotRepository>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(repo: Arc<dyn SlotRepository>, interval_secs: u64) -> Self {
        Self {
            repo,
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }

    /// One sweep cycle against the live clock.
    pub async fn run_once(&self) -> Result<u64, SlotError> {
        self.repo.deactivate_expired(clock::now_local()).await
    }

    /// Fire-and-forget loop: one eager cycle at startup, then a fixed
    /// interval. A failed cycle is logged and swallowed; the next tick
    /// retries naturally.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Expiry sweeper running every {} seconds",
                self.interval.as_secs()
            );
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                match self.run_once().await {
                    Ok(0) => debug!("Expiry sweep: nothing to deactivate"),
                    Ok(flipped) => info!("Expiry sweep deactivated {} slots", flipped),
                    Err(e) => warn!("Expiry sweep failed, will retry next cycle: {}", e),
                }
            }
        })
    }
}
