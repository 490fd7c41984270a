/// Chip activation logic.
pub mod chip_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Gameweek rollover administration.
pub mod gameweek_service;
/// Health check service.
pub mod health_service;
/// Squad selection and retrieval.
pub mod squad_service;
/// Storage connection supervision and degraded-mode tracking.
pub mod storage_supervisor;
/// Transfer recording and ledger derivation.
pub mod transfer_service;
