//! Background purge of expired geocode cache rows.

use std::time::Duration;

use propsearch_core::Database;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Delete expired rows once per `interval` until the runtime shuts down.
pub fn spawn(db: Database, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            sweep(&db).await;
        }
    })
}

async fn sweep(db: &Database) {
    match db.purge_expired_geocodes().await {
        Ok(0) => tracing::debug!("geocode cache sweep: nothing expired"),
        Ok(purged) => tracing::info!(purged, "geocode cache sweep"),
        Err(e) => tracing::warn!(error = %e, "geocode cache sweep failed"),
    }
}
