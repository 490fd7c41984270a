//! Business logic powering the transfer routes. These helpers coordinate
//! per-manager write gates, ledger derivation at week boundaries, and the
//! compare-and-set persistence discipline.

use std::{sync::Arc, time::SystemTime};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        league_store::LeagueStore,
        models::{SquadEntity, TransferLedgerEntity},
    },
    dto::transfers::{
        MakeTransfersRequest, MakeTransfersResponse, TransferLedgerView, TransferMove,
    },
    error::ServiceError,
    rules::{Gameweek, RuleError, TransferLedger, TransferRules, roll_forward},
    state::SharedState,
};

/// Attempts at the read-modify-write cycle before giving up on a record that
/// keeps moving underneath us. The in-process gate already serializes this
/// instance's writers, so repeated version misses mean another replica is
/// live-updating the same manager.
const MAX_WRITE_ATTEMPTS: u32 = 3;

// ---------------------------------------------------------------------------
// Read-only projections
// ---------------------------------------------------------------------------

/// Return the stored ledger for one manager and gameweek.
pub async fn get_ledger(
    state: &SharedState,
    manager_id: Uuid,
    gameweek: u8,
) -> Result<TransferLedgerView, ServiceError> {
    let week = checked_gameweek(gameweek, state.rules())?;
    let store = state.require_league_store().await?;

    let Some(mut entity) = store.find_ledger(manager_id, week).await? else {
        return Err(ServiceError::NotFound(format!(
            "no transfer ledger for manager `{manager_id}` gameweek {week}"
        )));
    };

    // Serve rule-consistent values even when the stored record drifted; the
    // read stays side-effect free, the next mutation persists the healed copy.
    let mut ledger = entity.ledger();
    if ledger.reconcile(state.rules()) {
        warn!(%manager_id, %week, "stored ledger drifted from the rules; serving reconciled values");
        entity.absorb(&ledger);
    }

    Ok(TransferLedgerView::from(&entity))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Record the requested transfers, re-pricing the whole week from its
/// starting budget, and persist the squad and ledger.
pub async fn make_transfers(
    state: &SharedState,
    manager_id: Uuid,
    request: MakeTransfersRequest,
) -> Result<MakeTransfersResponse, ServiceError> {
    let week = checked_gameweek(request.gameweek, state.rules())?;

    let gate = state.transfer_gate(manager_id);
    let _guard = gate.lock().await;
    let store = state.require_league_store().await?;

    // Resolve the squad the moves apply to; any invalid move rejects the
    // whole request before anything is persisted. The moves are applied once,
    // outside the write loop, so a version retry never re-applies them to the
    // squad it already produced.
    let squad = store
        .find_squad(manager_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("manager `{manager_id}` has no squad")))?;
    let player_ids = apply_moves(squad.player_ids, &request.moves)?;
    let count = request.moves.len() as u16;

    let mut attempts = 0;
    loop {
        let mut entity = week_entity(&store, manager_id, week, state.rules()).await?;
        let mut ledger = entity.ledger();
        if ledger.reconcile(state.rules()) {
            warn!(%manager_id, %week, "stored ledger drifted from the rules; reconciled before applying transfers");
        }

        let cost = ledger.record_transfers(count, state.rules())?;

        // Squad before ledger: a crash in between leaves the week
        // under-charged, which the next mutation's reconciliation absorbs,
        // instead of deducting points for transfers that never landed.
        store
            .save_squad(SquadEntity::new(manager_id, player_ids.clone()))
            .await?;

        entity.absorb(&ledger);
        entity.updated_at = SystemTime::now();
        if store.update_ledger(entity.clone()).await? {
            info!(
                %manager_id,
                %week,
                transfers = count,
                points = cost.points_deducted,
                "recorded transfers"
            );
            return Ok(MakeTransfersResponse {
                ledger: TransferLedgerView::from(&entity),
                cost: cost.into(),
            });
        }

        attempts += 1;
        if attempts >= MAX_WRITE_ATTEMPTS {
            return Err(ServiceError::InvalidState(
                "transfer ledger changed concurrently; retry the request".into(),
            ));
        }
        warn!(%manager_id, %week, attempts, "ledger version moved during transfer; retrying");
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load the ledger that serves `week` for this manager, deriving and
/// persisting it from the latest stored week when the boundary has not been
/// crossed for them yet.
pub(crate) async fn week_entity(
    store: &Arc<dyn LeagueStore>,
    manager_id: Uuid,
    week: Gameweek,
    rules: &TransferRules,
) -> Result<TransferLedgerEntity, ServiceError> {
    loop {
        if let Some(entity) = store.find_ledger(manager_id, week).await? {
            return Ok(entity);
        }

        let opening = match store.find_latest_ledger(manager_id).await? {
            Some(latest) => {
                let stored = latest.ledger();
                if stored.gameweek > week {
                    return Err(RuleError::StaleLedger {
                        ledger: stored.gameweek,
                        requested: week,
                    }
                    .into());
                }
                roll_forward(&stored, week, rules)
            }
            None => TransferLedger::opening(week, rules),
        };

        let entity = TransferLedgerEntity::from_ledger(manager_id, &opening);
        if store.create_ledger(entity.clone()).await? {
            info!(%manager_id, %week, "opened transfer ledger");
            return Ok(entity);
        }
        // Lost the creation race; loop around and read the winner's record.
    }
}

/// Reject rounds outside the configured season.
pub(crate) fn checked_gameweek(
    round: u8,
    rules: &TransferRules,
) -> Result<Gameweek, ServiceError> {
    if round == 0 || round > rules.final_gameweek {
        return Err(ServiceError::InvalidInput(format!(
            "gameweek {round} is outside the season (1..={})",
            rules.final_gameweek
        )));
    }
    Ok(Gameweek::new(round))
}

/// Apply each swap to the selection, validating against the squad as it
/// evolves move by move.
fn apply_moves(
    mut player_ids: Vec<u32>,
    moves: &[TransferMove],
) -> Result<Vec<u32>, ServiceError> {
    for transfer_move in moves {
        let Some(slot) = player_ids
            .iter()
            .position(|id| *id == transfer_move.player_out)
        else {
            return Err(ServiceError::InvalidInput(format!(
                "player {} is not in the squad",
                transfer_move.player_out
            )));
        };

        if player_ids.contains(&transfer_move.player_in) {
            return Err(ServiceError::InvalidInput(format!(
                "player {} is already in the squad",
                transfer_move.player_in
            )));
        }

        player_ids[slot] = transfer_move.player_in;
    }

    Ok(player_ids)
}
