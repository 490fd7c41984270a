use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::squad::{PickSquadRequest, SquadView},
    error::AppError,
    services::squad_service,
    state::SharedState,
};

/// Routes handling squad selection.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/managers/{manager_id}/squad",
        get(get_squad).put(pick_squad),
    )
}

/// Return the manager's current squad.
#[utoipa::path(
    get,
    path = "/managers/{manager_id}/squad",
    tag = "squad",
    params(("manager_id" = String, Path, description = "Identifier of the manager")),
    responses(
        (status = 200, description = "Current squad", body = SquadView),
        (status = 404, description = "Manager has no squad")
    )
)]
pub async fn get_squad(
    State(state): State<SharedState>,
    Path(manager_id): Path<Uuid>,
) -> Result<Json<SquadView>, AppError> {
    let squad = squad_service::get_squad(&state, manager_id).await?;
    Ok(Json(squad))
}

/// Store a full squad for the manager.
#[utoipa::path(
    put,
    path = "/managers/{manager_id}/squad",
    tag = "squad",
    params(("manager_id" = String, Path, description = "Identifier of the manager")),
    request_body = PickSquadRequest,
    responses(
        (status = 200, description = "Squad saved", body = SquadView),
        (status = 409, description = "Squad is locked in for the week")
    )
)]
pub async fn pick_squad(
    State(state): State<SharedState>,
    Path(manager_id): Path<Uuid>,
    Json(payload): Json<PickSquadRequest>,
) -> Result<Json<SquadView>, AppError> {
    payload.validate()?;
    let squad = squad_service::pick_squad(&state, manager_id, payload).await?;
    Ok(Json(squad))
}
