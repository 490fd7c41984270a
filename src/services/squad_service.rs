//! Squad selection. Wholesale squad replacement is the pre-season and
//! wildcard path; once a priced week is underway, changes go through the
//! transfer endpoint so they are charged.

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::SquadEntity,
    dto::squad::{PickSquadRequest, SquadView},
    error::ServiceError,
    services::transfer_service,
    state::SharedState,
};

/// Return the manager's stored squad.
pub async fn get_squad(state: &SharedState, manager_id: Uuid) -> Result<SquadView, ServiceError> {
    let store = state.require_league_store().await?;
    store
        .find_squad(manager_id)
        .await?
        .map(SquadView::from)
        .ok_or_else(|| ServiceError::NotFound(format!("manager `{manager_id}` has no squad")))
}

/// Store a full squad for the manager.
pub async fn pick_squad(
    state: &SharedState,
    manager_id: Uuid,
    request: PickSquadRequest,
) -> Result<SquadView, ServiceError> {
    let rules = state.rules();
    let week = transfer_service::checked_gameweek(request.gameweek, rules)?;
    if request.player_ids.len() != usize::from(rules.squad_size) {
        return Err(ServiceError::InvalidInput(format!(
            "a squad holds exactly {} players, got {}",
            rules.squad_size,
            request.player_ids.len()
        )));
    }

    let gate = state.transfer_gate(manager_id);
    let _guard = gate.lock().await;
    let store = state.require_league_store().await?;

    let entity = transfer_service::week_entity(&store, manager_id, week, rules).await?;
    let ledger = entity.ledger();
    let existing = store.find_squad(manager_id).await?;

    // A first selection is always free. After that the week must waive
    // transfer pricing (unlimited opening budget or a cost-suspending chip)
    // for a wholesale rewrite to be allowed.
    let replace_allowed = existing.is_none()
        || ledger.costs_suspended()
        || ledger.allowance_at_start.is_unlimited();
    if !replace_allowed {
        return Err(ServiceError::InvalidState(
            "the squad is locked in for this week; use transfers to change it".into(),
        ));
    }

    let squad = SquadEntity::new(manager_id, request.player_ids);
    store.save_squad(squad.clone()).await?;
    info!(%manager_id, %week, players = squad.player_ids.len(), "saved squad");
    Ok(SquadView::from(squad))
}
