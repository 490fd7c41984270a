//! Integration tests for the transfer lifecycle: squad entry, weekly
//! transfers, chip interaction, and gameweek rollover, run against an
//! in-memory store.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use futures::future::BoxFuture;
use uuid::Uuid;

use gaffer_back::{
    dao::{
        league_store::LeagueStore,
        models::{SquadEntity, TransferLedgerEntity},
        storage::StorageResult,
    },
    dto::{
        chips::{ActivateChipRequest, ChipDto},
        squad::PickSquadRequest,
        transfers::{AllowanceView, MakeTransfersRequest, TransferMove},
    },
    error::ServiceError,
    rules::{Gameweek, TransferRules},
    services::{chip_service, gameweek_service, squad_service, transfer_service},
    state::{AppState, SharedState},
};

#[derive(Default)]
struct Inner {
    ledgers: HashMap<(Uuid, u8), TransferLedgerEntity>,
    squads: HashMap<Uuid, SquadEntity>,
}

/// Store with the same create/compare-and-set contract as the MongoDB
/// implementation, held in a plain mutex.
#[derive(Clone, Default)]
struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    fn ledger(&self, manager_id: Uuid, gameweek: u8) -> Option<TransferLedgerEntity> {
        self.inner
            .lock()
            .unwrap()
            .ledgers
            .get(&(manager_id, gameweek))
            .cloned()
    }

    fn squad(&self, manager_id: Uuid) -> Option<SquadEntity> {
        self.inner.lock().unwrap().squads.get(&manager_id).cloned()
    }
}

impl LeagueStore for MemoryStore {
    fn create_ledger(
        &self,
        ledger: TransferLedgerEntity,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut guard = inner.lock().unwrap();
            let key = (ledger.manager_id, ledger.gameweek);
            if guard.ledgers.contains_key(&key) {
                return Ok(false);
            }
            guard.ledgers.insert(key, ledger);
            Ok(true)
        })
    }

    fn update_ledger(
        &self,
        mut ledger: TransferLedgerEntity,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut guard = inner.lock().unwrap();
            let key = (ledger.manager_id, ledger.gameweek);
            match guard.ledgers.get(&key) {
                Some(stored) if stored.version == ledger.version => {
                    ledger.version += 1;
                    guard.ledgers.insert(key, ledger);
                    Ok(true)
                }
                _ => Ok(false),
            }
        })
    }

    fn find_ledger(
        &self,
        manager_id: Uuid,
        gameweek: Gameweek,
    ) -> BoxFuture<'static, StorageResult<Option<TransferLedgerEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            Ok(inner
                .lock()
                .unwrap()
                .ledgers
                .get(&(manager_id, gameweek.round()))
                .cloned())
        })
    }

    fn find_latest_ledger(
        &self,
        manager_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TransferLedgerEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            Ok(inner
                .lock()
                .unwrap()
                .ledgers
                .values()
                .filter(|entity| entity.manager_id == manager_id)
                .max_by_key(|entity| entity.gameweek)
                .cloned())
        })
    }

    fn list_ledgers(
        &self,
        gameweek: Gameweek,
    ) -> BoxFuture<'static, StorageResult<Vec<TransferLedgerEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            Ok(inner
                .lock()
                .unwrap()
                .ledgers
                .values()
                .filter(|entity| entity.gameweek == gameweek.round())
                .cloned()
                .collect())
        })
    }

    fn save_squad(&self, squad: SquadEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            inner.lock().unwrap().squads.insert(squad.manager_id, squad);
            Ok(())
        })
    }

    fn find_squad(
        &self,
        manager_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SquadEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move { Ok(inner.lock().unwrap().squads.get(&manager_id).cloned()) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

async fn league() -> (SharedState, MemoryStore) {
    let state = AppState::new(TransferRules::default());
    let store = MemoryStore::default();
    state.install_league_store(Arc::new(store.clone())).await;
    (state, store)
}

fn pick(gameweek: u8, players: std::ops::RangeInclusive<u32>) -> PickSquadRequest {
    PickSquadRequest {
        gameweek,
        player_ids: players.collect(),
    }
}

fn transfers(gameweek: u8, moves: &[(u32, u32)]) -> MakeTransfersRequest {
    MakeTransfersRequest {
        gameweek,
        moves: moves
            .iter()
            .map(|(player_out, player_in)| TransferMove {
                player_out: *player_out,
                player_in: *player_in,
            })
            .collect(),
    }
}

#[tokio::test]
async fn full_lifecycle_from_squad_entry_to_rollover() {
    let (state, store) = league().await;
    let manager_id = Uuid::new_v4();

    // Week 1: entering squad selection opens an unlimited week.
    squad_service::pick_squad(&state, manager_id, pick(1, 1..=15))
        .await
        .unwrap();
    let opening = transfer_service::make_transfers(&state, manager_id, transfers(1, &[(1, 101)]))
        .await
        .unwrap();
    assert_eq!(opening.cost.points_deducted, 0);
    assert!(matches!(
        opening.ledger.allowance_at_start,
        AllowanceView::Unlimited
    ));

    // Deadline passes; week 2 opens with the standard single free transfer.
    let closed = gameweek_service::close_gameweek(&state, 1).await.unwrap();
    assert_eq!(closed.rolled_over, 1);
    let week_two = store.ledger(manager_id, 2).unwrap();
    assert_eq!(week_two.allowance_at_start, Some(1));

    // Three transfers against one free: two paid, eight points.
    let priced = transfer_service::make_transfers(
        &state,
        manager_id,
        transfers(2, &[(101, 201), (2, 202), (3, 203)]),
    )
    .await
    .unwrap();
    assert_eq!(priced.cost.free_used, 1);
    assert_eq!(priced.cost.paid, 2);
    assert_eq!(priced.cost.points_deducted, 8);
    let squad = store.squad(manager_id).unwrap();
    assert!(squad.player_ids.contains(&201));
    assert!(!squad.player_ids.contains(&101));

    // Playing the wildcard afterwards refunds the week's deduction.
    let refunded = chip_service::activate_chip(
        &state,
        manager_id,
        ActivateChipRequest {
            gameweek: 2,
            chip: ChipDto::Wildcard,
        },
    )
    .await
    .unwrap();
    assert_eq!(refunded.points_deducted, 0);

    // Rolling out of a wildcard week resets the allowance instead of banking.
    gameweek_service::close_gameweek(&state, 2).await.unwrap();
    let week_three = store.ledger(manager_id, 3).unwrap();
    assert_eq!(week_three.allowance_at_start, Some(1));
    assert_eq!(week_three.transfers_made, 0);
    assert_eq!(week_three.active_chip, None);
}

#[tokio::test]
async fn unused_transfers_bank_up_to_the_cap() {
    let (state, store) = league().await;
    let manager_id = Uuid::new_v4();

    squad_service::pick_squad(&state, manager_id, pick(1, 1..=15))
        .await
        .unwrap();

    // Two idle deadlines: 1 banks to 2, then the cap holds it at 2.
    gameweek_service::close_gameweek(&state, 1).await.unwrap();
    gameweek_service::close_gameweek(&state, 2).await.unwrap();
    assert_eq!(
        store.ledger(manager_id, 3).unwrap().allowance_at_start,
        Some(2)
    );

    gameweek_service::close_gameweek(&state, 3).await.unwrap();
    assert_eq!(
        store.ledger(manager_id, 4).unwrap().allowance_at_start,
        Some(2)
    );
}

#[tokio::test]
async fn rerunning_a_deadline_never_reseeds_a_week() {
    let (state, store) = league().await;
    let manager_id = Uuid::new_v4();

    squad_service::pick_squad(&state, manager_id, pick(1, 1..=15))
        .await
        .unwrap();
    gameweek_service::close_gameweek(&state, 1).await.unwrap();
    let seeded = store.ledger(manager_id, 2).unwrap();

    let rerun = gameweek_service::close_gameweek(&state, 1).await.unwrap();
    assert_eq!(rerun.rolled_over, 0);
    assert_eq!(rerun.already_open, 1);
    assert_eq!(store.ledger(manager_id, 2).unwrap(), seeded);
}

#[tokio::test]
async fn rejected_batches_change_nothing() {
    let (state, store) = league().await;
    let manager_id = Uuid::new_v4();

    squad_service::pick_squad(&state, manager_id, pick(1, 1..=15))
        .await
        .unwrap();

    // A sixteen-move chain on one slot exceeds the weekly bound of fifteen.
    let mut chain: Vec<(u32, u32)> = vec![(1, 100)];
    chain.extend((100..115).map(|id| (id, id + 1)));
    let err = transfer_service::make_transfers(&state, manager_id, transfers(2, &chain))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    // The week record opened but recorded nothing, and the squad is intact.
    let ledger = store.ledger(manager_id, 2).unwrap();
    assert_eq!(ledger.transfers_made, 0);
    assert_eq!(ledger.points_deducted, 0);
    assert_eq!(
        store.squad(manager_id).unwrap().player_ids,
        (1..=15).collect::<Vec<u32>>()
    );
}

#[tokio::test]
async fn past_weeks_reject_new_transfers() {
    let (state, _store) = league().await;
    let manager_id = Uuid::new_v4();

    squad_service::pick_squad(&state, manager_id, pick(1, 1..=15))
        .await
        .unwrap();
    transfer_service::make_transfers(&state, manager_id, transfers(5, &[(1, 101)]))
        .await
        .unwrap();

    let err = transfer_service::make_transfers(&state, manager_id, transfers(3, &[(2, 102)]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn ledger_views_round_trip_through_the_api_shape() {
    let (state, _store) = league().await;
    let manager_id = Uuid::new_v4();

    squad_service::pick_squad(&state, manager_id, pick(1, 1..=15))
        .await
        .unwrap();
    transfer_service::make_transfers(&state, manager_id, transfers(2, &[(1, 101), (2, 102)]))
        .await
        .unwrap();

    let view = transfer_service::get_ledger(&state, manager_id, 2)
        .await
        .unwrap();
    assert_eq!(view.manager_id, manager_id);
    assert_eq!(view.gameweek, 2);
    assert_eq!(view.transfers_made, 2);
    assert_eq!(view.points_deducted, 4);
    assert!(matches!(
        view.free_remaining,
        AllowanceView::Limited { count: 0 }
    ));

    let missing = transfer_service::get_ledger(&state, manager_id, 4)
        .await
        .unwrap_err();
    assert!(matches!(missing, ServiceError::NotFound(_)));
}
