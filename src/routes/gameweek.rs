use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};

use crate::{
    dto::gameweek::CloseGameweekResponse,
    error::AppError,
    services::gameweek_service,
    state::SharedState,
};

/// Routes handling gameweek administration.
pub fn router() -> Router<SharedState> {
    Router::new().route("/gameweeks/{gameweek}/close", post(close_gameweek))
}

/// Close a gameweek and seed the next week's ledgers.
#[utoipa::path(
    post,
    path = "/gameweeks/{gameweek}/close",
    tag = "gameweeks",
    params(("gameweek" = u8, Path, description = "Gameweek to close")),
    responses(
        (status = 200, description = "Rollover summary", body = CloseGameweekResponse),
        (status = 400, description = "Gameweek outside the season")
    )
)]
pub async fn close_gameweek(
    State(state): State<SharedState>,
    Path(gameweek): Path<u8>,
) -> Result<Json<CloseGameweekResponse>, AppError> {
    let summary = gameweek_service::close_gameweek(&state, gameweek).await?;
    Ok(Json(summary))
}
