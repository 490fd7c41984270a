#[cfg(test)]
pub mod memory;
pub mod mongodb;

use crate::dao::models::{SquadEntity, TransferLedgerEntity};
use crate::dao::storage::StorageResult;
use crate::rules::Gameweek;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for transfer ledgers and squads.
///
/// Ledger writes are compare-and-set: `create_ledger` and `update_ledger`
/// return `false` when another writer got there first (an existing record for
/// the same manager and gameweek, or a version that moved on), and callers
/// re-read and retry. `Ok(false)` is never a transport failure.
pub trait LeagueStore: Send + Sync {
    /// Insert a fresh ledger record. Returns `false` if a record for the
    /// same manager and gameweek already exists.
    fn create_ledger(
        &self,
        ledger: TransferLedgerEntity,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// Replace a ledger record if its stored version still matches
    /// `ledger.version`; the stored copy's version is bumped on success.
    fn update_ledger(
        &self,
        ledger: TransferLedgerEntity,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    fn find_ledger(
        &self,
        manager_id: Uuid,
        gameweek: Gameweek,
    ) -> BoxFuture<'static, StorageResult<Option<TransferLedgerEntity>>>;

    /// Most recent ledger for a manager, by gameweek.
    fn find_latest_ledger(
        &self,
        manager_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TransferLedgerEntity>>>;

    /// All ledgers belonging to one gameweek.
    fn list_ledgers(
        &self,
        gameweek: Gameweek,
    ) -> BoxFuture<'static, StorageResult<Vec<TransferLedgerEntity>>>;

    fn save_squad(&self, squad: SquadEntity) -> BoxFuture<'static, StorageResult<()>>;

    fn find_squad(
        &self,
        manager_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SquadEntity>>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
