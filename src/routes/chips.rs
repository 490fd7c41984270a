use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{chips::ActivateChipRequest, transfers::TransferLedgerView},
    error::AppError,
    services::chip_service,
    state::SharedState,
};

/// Routes handling chip activation.
pub fn router() -> Router<SharedState> {
    Router::new().route("/managers/{manager_id}/chips", post(activate_chip))
}

/// Activate a chip on the manager's ledger for a gameweek.
#[utoipa::path(
    post,
    path = "/managers/{manager_id}/chips",
    tag = "chips",
    params(("manager_id" = String, Path, description = "Identifier of the manager")),
    request_body = ActivateChipRequest,
    responses(
        (status = 200, description = "Chip activated", body = TransferLedgerView),
        (status = 409, description = "Another chip is already active this week")
    )
)]
pub async fn activate_chip(
    State(state): State<SharedState>,
    Path(manager_id): Path<Uuid>,
    Json(payload): Json<ActivateChipRequest>,
) -> Result<Json<TransferLedgerView>, AppError> {
    payload.validate()?;
    let ledger = chip_service::activate_chip(&state, manager_id, payload).await?;
    Ok(Json(ledger))
}
