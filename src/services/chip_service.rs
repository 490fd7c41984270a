//! Chip activation. A cost-suspending chip refunds any points already
//! deducted this week; scoring chips only mark the record.

use std::time::SystemTime;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::{chips::ActivateChipRequest, transfers::TransferLedgerView},
    error::ServiceError,
    rules::Chip,
    services::transfer_service,
    state::SharedState,
};

const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Activate a chip on the manager's ledger for the requested gameweek.
pub async fn activate_chip(
    state: &SharedState,
    manager_id: Uuid,
    request: ActivateChipRequest,
) -> Result<TransferLedgerView, ServiceError> {
    let week = transfer_service::checked_gameweek(request.gameweek, state.rules())?;
    let chip = Chip::from(request.chip);

    let gate = state.transfer_gate(manager_id);
    let _guard = gate.lock().await;
    let store = state.require_league_store().await?;

    let mut attempts = 0;
    loop {
        let mut entity =
            transfer_service::week_entity(&store, manager_id, week, state.rules()).await?;
        let mut ledger = entity.ledger();
        if ledger.reconcile(state.rules()) {
            warn!(%manager_id, %week, "stored ledger drifted from the rules; reconciled before chip activation");
        }

        ledger.activate_chip(chip, state.rules())?;

        entity.absorb(&ledger);
        entity.updated_at = SystemTime::now();
        if store.update_ledger(entity.clone()).await? {
            info!(%manager_id, %week, ?chip, "activated chip");
            return Ok(TransferLedgerView::from(&entity));
        }

        attempts += 1;
        if attempts >= MAX_WRITE_ATTEMPTS {
            return Err(ServiceError::InvalidState(
                "transfer ledger changed concurrently; retry the request".into(),
            ));
        }
        warn!(%manager_id, %week, attempts, "ledger version moved during chip activation; retrying");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::{
        dao::{league_store::memory::MemoryLeagueStore, models::SquadEntity},
        dto::{
            chips::ChipDto,
            transfers::{MakeTransfersRequest, TransferMove},
        },
        rules::TransferRules,
        services::transfer_service,
        state::{AppState, SharedState},
    };

    async fn state_with_store() -> (SharedState, MemoryLeagueStore) {
        let state = AppState::new(TransferRules::default());
        let store = MemoryLeagueStore::new();
        state.install_league_store(Arc::new(store.clone())).await;
        (state, store)
    }

    async fn charged_week(state: &SharedState, store: &MemoryLeagueStore) -> Uuid {
        let manager_id = Uuid::new_v4();
        store.seed_squad(SquadEntity::new(manager_id, (1..=15).collect()));
        let request = MakeTransfersRequest {
            gameweek: 2,
            moves: vec![
                TransferMove {
                    player_out: 1,
                    player_in: 101,
                },
                TransferMove {
                    player_out: 2,
                    player_in: 102,
                },
                TransferMove {
                    player_out: 3,
                    player_in: 103,
                },
            ],
        };
        let response = transfer_service::make_transfers(state, manager_id, request)
            .await
            .unwrap();
        assert_eq!(response.ledger.points_deducted, 8);
        manager_id
    }

    fn activate(gameweek: u8, chip: ChipDto) -> ActivateChipRequest {
        ActivateChipRequest { gameweek, chip }
    }

    #[tokio::test]
    async fn wildcard_refunds_the_weeks_deductions() {
        let (state, store) = state_with_store().await;
        let manager_id = charged_week(&state, &store).await;

        let view = activate_chip(&state, manager_id, activate(2, ChipDto::Wildcard))
            .await
            .unwrap();

        assert_eq!(view.points_deducted, 0);
        assert_eq!(view.active_chip, Some(ChipDto::Wildcard));
        assert_eq!(store.stored_ledger(manager_id, 2).unwrap().points_deducted, 0);
    }

    #[tokio::test]
    async fn scoring_chips_leave_pricing_alone() {
        let (state, store) = state_with_store().await;
        let manager_id = charged_week(&state, &store).await;

        let view = activate_chip(&state, manager_id, activate(2, ChipDto::TripleCaptain))
            .await
            .unwrap();

        assert_eq!(view.points_deducted, 8);
        assert_eq!(view.active_chip, Some(ChipDto::TripleCaptain));
    }

    #[tokio::test]
    async fn second_chip_in_a_week_is_rejected() {
        let (state, store) = state_with_store().await;
        let manager_id = charged_week(&state, &store).await;

        activate_chip(&state, manager_id, activate(2, ChipDto::Wildcard))
            .await
            .unwrap();
        let err = activate_chip(&state, manager_id, activate(2, ChipDto::BenchBoost))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn chip_opens_the_week_when_no_ledger_exists() {
        let (state, store) = state_with_store().await;
        let manager_id = Uuid::new_v4();

        let view = activate_chip(&state, manager_id, activate(5, ChipDto::FreeHit))
            .await
            .unwrap();

        assert_eq!(view.gameweek, 5);
        assert_eq!(view.active_chip, Some(ChipDto::FreeHit));
        assert!(store.stored_ledger(manager_id, 5).is_some());
    }
}
