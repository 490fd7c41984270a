//! In-memory store backing the service tests, with the same compare-and-set
//! behavior as the MongoDB implementation.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::{
    dao::{
        league_store::LeagueStore,
        models::{SquadEntity, TransferLedgerEntity},
        storage::StorageResult,
    },
    rules::Gameweek,
};

#[derive(Default)]
struct MemoryInner {
    ledgers: HashMap<(Uuid, u8), TransferLedgerEntity>,
    squads: HashMap<Uuid, SquadEntity>,
    reject_updates: bool,
}

/// [`LeagueStore`] held entirely in process memory.
#[derive(Clone, Default)]
pub struct MemoryLeagueStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryLeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `update_ledger` call miss its version check,
    /// as if another writer kept winning the race.
    pub fn reject_updates(&self) {
        self.inner.lock().unwrap().reject_updates = true;
    }

    pub fn stored_ledger(
        &self,
        manager_id: Uuid,
        gameweek: u8,
    ) -> Option<TransferLedgerEntity> {
        self.inner
            .lock()
            .unwrap()
            .ledgers
            .get(&(manager_id, gameweek))
            .cloned()
    }

    pub fn seed_ledger(&self, entity: TransferLedgerEntity) {
        self.inner
            .lock()
            .unwrap()
            .ledgers
            .insert((entity.manager_id, entity.gameweek), entity);
    }

    pub fn seed_squad(&self, squad: SquadEntity) {
        self.inner
            .lock()
            .unwrap()
            .squads
            .insert(squad.manager_id, squad);
    }
}

impl LeagueStore for MemoryLeagueStore {
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
            if guard.reject_updates {
                return Ok(false);
            }
            let key = (ledger.manager_id, ledger.gameweek);
            let Some(stored) = guard.ledgers.get(&key) else {
                return Ok(false);
            };
            if stored.version != ledger.version {
                return Ok(false);
            }
            ledger.version += 1;
            guard.ledgers.insert(key, ledger);
            Ok(true)
        })
    }

    fn find_ledger(
        &self,
        manager_id: Uuid,
        gameweek: Gameweek,
    ) -> BoxFuture<'static, StorageResult<Option<TransferLedgerEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let guard = inner.lock().unwrap();
            Ok(guard.ledgers.get(&(manager_id, gameweek.round())).cloned())
        })
    }

    fn find_latest_ledger(
        &self,
        manager_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TransferLedgerEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let guard = inner.lock().unwrap();
            Ok(guard
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
            let guard = inner.lock().unwrap();
            Ok(guard
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
