use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::dao::league_store::LeagueStore;
use crate::error::ServiceError;
use crate::rules::TransferRules;

pub type SharedState = Arc<AppState>;

/// Central application state holding the storage handle and per-manager
/// write gates.
pub struct AppState {
    league_store: RwLock<Option<Arc<dyn LeagueStore>>>,
    transfer_gates: DashMap<Uuid, Arc<Mutex<()>>>,
    degraded: watch::Sender<bool>,
    rules: TransferRules,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(rules: TransferRules) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            league_store: RwLock::new(None),
            transfer_gates: DashMap::new(),
            degraded: degraded_tx,
            rules,
        })
    }

    /// Transfer rules the server was configured with.
    pub fn rules(&self) -> &TransferRules {
        &self.rules
    }

    /// Obtain a handle to the current league store, if one is installed.
    pub async fn league_store(&self) -> Option<Arc<dyn LeagueStore>> {
        let guard = self.league_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current league store or fail when running degraded.
    pub async fn require_league_store(&self) -> Result<Arc<dyn LeagueStore>, ServiceError> {
        self.league_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new league store implementation and leave degraded mode.
    pub async fn install_league_store(&self, store: Arc<dyn LeagueStore>) {
        {
            let mut guard = self.league_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current league store and enter degraded mode.
    pub async fn clear_league_store(&self) {
        {
            let mut guard = self.league_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    ///
    /// Tracks the supervisor's view of storage health, which can flip to
    /// degraded while a (failing) store is still installed.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Serialization gate for one manager's ledger writes.
    ///
    /// Requests for the same manager queue behind this mutex so a
    /// read-modify-write never interleaves with another in this process;
    /// the store's version check still guards against other replicas.
    pub fn transfer_gate(&self, manager_id: Uuid) -> Arc<Mutex<()>> {
        self.transfer_gates
            .entry(manager_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        if self.is_degraded() == value {
            return;
        }

        let _ = self.degraded.send(value);
    }
}
