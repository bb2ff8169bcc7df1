//! Periodic re-computation of the global dashboard snapshot.

use std::sync::Arc;

use crate::models::dashboard::{cache::BACKGROUND_KEY, compute_summary};
use crate::state::AppState;

/// Recompute the global snapshot once and store it under the background key.
/// Failures are logged and leave any previous snapshot in place.
pub async fn refresh_background_summary(state: &AppState) -> bool {
    match compute_summary(state.metrics.as_ref(), None).await {
        Ok(summary) => {
            // Two intervals: the entry stays live until the next refresh lands.
            let ttl = state.dashboard.warmup_interval.saturating_mul(2);
            state.summaries.set(BACKGROUND_KEY, Arc::new(summary), ttl);
            log::debug!("Background dashboard summary refreshed");
            true
        }
        Err(e) => {
            log::warn!("Background dashboard refresh failed: {e}");
            false
        }
    }
}

/// Spawn the refresh loop on the actix runtime. A zero interval disables
/// warm-up.
pub fn spawn(state: AppState) -> Option<actix_web::rt::task::JoinHandle<()>> {
    if state.dashboard.warmup_interval.is_zero() {
        log::info!("Dashboard warm-up disabled");
        return None;
    }
    Some(actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(state.dashboard.warmup_interval);
        loop {
            ticker.tick().await;
            refresh_background_summary(&state).await;
        }
    }))
}
