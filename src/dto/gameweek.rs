use serde::Serialize;
use utoipa::ToSchema;

/// Outcome of closing a gameweek and opening the next one.
#[derive(Debug, Serialize, ToSchema)]
pub struct CloseGameweekResponse {
    /// The gameweek that was closed.
    pub gameweek: u8,
    /// Ledgers rolled forward into the next week.
    pub rolled_over: u64,
    /// Ledgers skipped because the next week already existed.
    pub already_open: u64,
}
