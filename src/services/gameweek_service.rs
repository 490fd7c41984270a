//! Gameweek administration. Closing a round seeds the following week's
//! ledger for every manager who played this one, banking unused transfers
//! under the configured cap.

use tracing::info;

use crate::{
    dao::models::TransferLedgerEntity,
    dto::gameweek::CloseGameweekResponse,
    error::ServiceError,
    rules::next_week,
    state::SharedState,
};

/// Close a gameweek, rolling every stored ledger into the next round.
///
/// Safe to call more than once: managers whose next-week record already
/// exists are counted and skipped, never re-seeded.
pub async fn close_gameweek(
    state: &SharedState,
    gameweek: u8,
) -> Result<CloseGameweekResponse, ServiceError> {
    let rules = state.rules();
    let week = crate::services::transfer_service::checked_gameweek(gameweek, rules)?;
    if week.round() == rules.final_gameweek {
        return Err(ServiceError::InvalidInput(format!(
            "gameweek {week} is the last of the season; there is no week to roll into"
        )));
    }

    let store = state.require_league_store().await?;
    let ledgers = store.list_ledgers(week).await?;

    let mut rolled_over = 0u64;
    let mut already_open = 0u64;
    for entity in ledgers {
        let opening = next_week(&entity.ledger(), rules);
        let next = TransferLedgerEntity::from_ledger(entity.manager_id, &opening);
        if store.create_ledger(next).await? {
            rolled_over += 1;
        } else {
            already_open += 1;
        }
    }

    info!(%week, rolled_over, already_open, "closed gameweek");
    Ok(CloseGameweekResponse {
        gameweek: week.round(),
        rolled_over,
        already_open,
    })
}
