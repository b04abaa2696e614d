use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

use crate::sessions::SeatSessionRegistry;

/// Periodically drops seat sessions whose browser went away.
pub fn spawn_session_reaper(
    sessions: Arc<SeatSessionRegistry>,
    every: Duration,
    max_idle: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Session reaper started (every {:?}, idle limit {:?})",
            every, max_idle
        );
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let reaped = sessions.reap_idle(max_idle).await;
            if reaped > 0 {
                info!("Reaped {} idle seat sessions", reaped);
            }
        }
    })
}
