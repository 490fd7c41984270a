use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report service health, pinging the league store so outages surface in the logs.
///
/// The verdict comes from the supervisor's degraded flag, not from this probe;
/// the flag only flips after the supervisor exhausts its reconnect attempts.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_league_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "league store ping failed");
            }
        }
        Err(_) => warn!("league store unavailable (degraded mode)"),
    }

    if state.is_degraded() {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
