use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Gaffer Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::squad::get_squad,
        crate::routes::squad::pick_squad,
        crate::routes::transfers::make_transfers,
        crate::routes::transfers::get_ledger,
        crate::routes::chips::activate_chip,
        crate::routes::gameweek::close_gameweek,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::squad::PickSquadRequest,
            crate::dto::squad::SquadView,
            crate::dto::transfers::TransferMove,
            crate::dto::transfers::MakeTransfersRequest,
            crate::dto::transfers::AllowanceView,
            crate::dto::transfers::TransferCostView,
            crate::dto::transfers::TransferLedgerView,
            crate::dto::transfers::MakeTransfersResponse,
            crate::dto::chips::ChipDto,
            crate::dto::chips::ActivateChipRequest,
            crate::dto::gameweek::CloseGameweekResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "squad", description = "Squad selection"),
        (name = "transfers", description = "Transfer recording and ledgers"),
        (name = "chips", description = "Chip activation"),
        (name = "gameweeks", description = "Gameweek administration"),
    )
)]
pub struct ApiDoc;
