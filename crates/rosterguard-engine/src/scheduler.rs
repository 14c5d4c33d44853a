//! Periodic sweep scheduler.

use std::sync::Arc;
use std::time::Duration;

use rosterguard_store::IdentityStore;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::gateway::CommunityGateway;
use crate::reconciler::Reconciler;

/// Run sweeps every `interval` until `shutdown` is cancelled.
///
/// The first sweep runs one interval after the call. Sweeps run one after
/// another; ticks missed while a sweep is still running are skipped. A
/// failed sweep is logged and the next tick runs normally. Cancellation is
/// only observed between sweeps.
pub async fn run_sweeps<S, G>(
    reconciler: Arc<Reconciler<S, G>>,
    interval: Duration,
    shutdown: CancellationToken,
) where
    S: IdentityStore,
    G: CommunityGateway,
{
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(interval_ms = interval.as_millis() as u64, "sweep scheduler started");

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                debug!("sweep scheduler shutting down");
                return;
            }

            _ = ticker.tick() => {
                match reconciler.run_sweep().await {
                    Ok(Some(report)) => debug!(total = report.total(), "scheduled sweep finished"),
                    Ok(None) => debug!("previous sweep still running, tick skipped"),
                    Err(e) => error!(
                        error = %e,
                        error_type = e.error_type(),
                        "sweep failed"
                    ),
                }
            }
        }
    }
}
