use super::store::SessionStore;
use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Spawn the recurring sweep task.
///
/// Sessions idle for longer than `ttl` are evicted on each tick, so an
/// abandoned upload outlives its last chunk by at most `ttl` plus one
/// sweep interval.
pub fn spawn_expiry_sweeper(
    store: SessionStore,
    ttl: Duration,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Session sweeper started (ttl: {}s, interval: {}s)",
            ttl.as_secs(),
            interval.as_secs()
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; consume it so a sweep
        // only runs after a full interval has elapsed.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = store.sweep_expired(ttl, Utc::now()).await;
            if removed > 0 {
                info!("Cleaned up {} expired upload sessions", removed);
            } else {
                debug!("Sweep found no expired sessions");
            }
        }
    })
}
