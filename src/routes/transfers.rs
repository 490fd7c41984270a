use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::transfers::{MakeTransfersRequest, MakeTransfersResponse, TransferLedgerView},
    error::AppError,
    services::transfer_service,
    state::SharedState,
};

/// Routes recording transfers and exposing the weekly ledgers.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/managers/{manager_id}/transfers", post(make_transfers))
        .route(
            "/managers/{manager_id}/transfers/{gameweek}",
            get(get_ledger),
        )
}

/// Record a batch of transfers against the manager's weekly ledger.
#[utoipa::path(
    post,
    path = "/managers/{manager_id}/transfers",
    tag = "transfers",
    params(("manager_id" = String, Path, description = "Identifier of the manager")),
    request_body = MakeTransfersRequest,
    responses(
        (status = 200, description = "Transfers recorded", body = MakeTransfersResponse),
        (status = 400, description = "Invalid moves or gameweek"),
        (status = 409, description = "Request conflicts with the stored ledger")
    )
)]
pub async fn make_transfers(
    State(state): State<SharedState>,
    Path(manager_id): Path<Uuid>,
    Json(payload): Json<MakeTransfersRequest>,
) -> Result<Json<MakeTransfersResponse>, AppError> {
    payload.validate()?;
    let response = transfer_service::make_transfers(&state, manager_id, payload).await?;
    Ok(Json(response))
}

/// Return the manager's transfer ledger for one gameweek.
#[utoipa::path(
    get,
    path = "/managers/{manager_id}/transfers/{gameweek}",
    tag = "transfers",
    params(
        ("manager_id" = String, Path, description = "Identifier of the manager"),
        ("gameweek" = u8, Path, description = "Gameweek the ledger covers")
    ),
    responses(
        (status = 200, description = "Stored ledger", body = TransferLedgerView),
        (status = 404, description = "No ledger for this manager and gameweek")
    )
)]
pub async fn get_ledger(
    State(state): State<SharedState>,
    Path((manager_id, gameweek)): Path<(Uuid, u8)>,
) -> Result<Json<TransferLedgerView>, AppError> {
    let ledger = transfer_service::get_ledger(&state, manager_id, gameweek).await?;
    Ok(Json(ledger))
}
