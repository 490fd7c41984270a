use serde::Serialize;
use utoipa::ToSchema;

/// Payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status ("ok" or "degraded").
    pub status: String,
    /// State of the league store backing the service.
    pub storage: String,
}

impl HealthResponse {
    /// Report a healthy service with a reachable league store.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            storage: "connected".to_string(),
        }
    }

    /// Report a degraded service whose league store is being reconnected.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            storage: "reconnecting".to_string(),
        }
    }
}
