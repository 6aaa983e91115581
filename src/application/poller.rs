// Periodic overview refresh
use crate::application::refresh_client::DashboardRefreshClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn a task that runs `load(false)` every `interval`.
///
/// Returns `None` for a zero interval. The first refresh happens one full
/// interval after the call; callers do the initial load themselves.
pub fn spawn_poller(client: Arc<DashboardRefreshClient>, interval: Duration) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() fires immediately on the first tick
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let state = client.load(false).await;
            tracing::debug!("Scheduled SBC refresh finished in state {}", state.name());
        }
    }))
}
