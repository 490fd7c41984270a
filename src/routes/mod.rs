use axum::Router;

use crate::state::SharedState;

pub mod chips;
pub mod docs;
pub mod gameweek;
pub mod health;
pub mod squad;
pub mod transfers;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(squad::router())
        .merge(transfers::router())
        .merge(chips::router())
        .merge(gameweek::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
