use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::rules::{Chip, Gameweek, TransferAllowance, TransferLedger};

/// Chip identifier stored alongside a ledger record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChipEntity {
    Wildcard,
    FreeHit,
    BenchBoost,
    TripleCaptain,
}

impl From<Chip> for ChipEntity {
    fn from(value: Chip) -> Self {
        match value {
            Chip::Wildcard => ChipEntity::Wildcard,
            Chip::FreeHit => ChipEntity::FreeHit,
            Chip::BenchBoost => ChipEntity::BenchBoost,
            Chip::TripleCaptain => ChipEntity::TripleCaptain,
        }
    }
}

impl From<ChipEntity> for Chip {
    fn from(value: ChipEntity) -> Self {
        match value {
            ChipEntity::Wildcard => Chip::Wildcard,
            ChipEntity::FreeHit => Chip::FreeHit,
            ChipEntity::BenchBoost => Chip::BenchBoost,
            ChipEntity::TripleCaptain => Chip::TripleCaptain,
        }
    }
}

/// One manager's transfer accounting for one gameweek, as persisted.
///
/// Free-transfer budgets use `None` for the unlimited opening round and
/// `Some(n)` for a finite balance. `version` backs the compare-and-set
/// update discipline: a write only lands if the stored version still matches
/// the one this record was loaded with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferLedgerEntity {
    /// Primary key of the ledger record.
    pub id: Uuid,
    /// Manager this ledger belongs to.
    pub manager_id: Uuid,
    /// Gameweek round number.
    pub gameweek: u8,
    /// Free-transfer budget captured when the week opened.
    pub allowance_at_start: Option<u8>,
    /// Transfers recorded so far this week.
    pub transfers_made: u16,
    /// Points charged for the week so far.
    pub points_deducted: u32,
    /// Budget left after the week's transfers.
    pub free_remaining: Option<u8>,
    /// Chip played this week, if any.
    pub active_chip: Option<ChipEntity>,
    /// Optimistic concurrency counter, bumped by the store on every update.
    pub version: u64,
    /// Last time this record was updated.
    pub updated_at: SystemTime,
}

impl TransferLedgerEntity {
    /// Build a fresh record (version 0) from a domain ledger.
    pub fn from_ledger(manager_id: Uuid, ledger: &TransferLedger) -> Self {
        Self {
            id: Uuid::new_v4(),
            manager_id,
            gameweek: ledger.gameweek.round(),
            allowance_at_start: ledger.allowance_at_start.banked(),
            transfers_made: ledger.transfers_made,
            points_deducted: ledger.points_deducted,
            free_remaining: ledger.free_remaining.banked(),
            active_chip: ledger.active_chip.map(Into::into),
            version: 0,
            updated_at: SystemTime::now(),
        }
    }

    /// Domain view of this record.
    pub fn ledger(&self) -> TransferLedger {
        TransferLedger {
            gameweek: Gameweek::new(self.gameweek),
            allowance_at_start: TransferAllowance::from(self.allowance_at_start),
            transfers_made: self.transfers_made,
            points_deducted: self.points_deducted,
            free_remaining: TransferAllowance::from(self.free_remaining),
            active_chip: self.active_chip.map(Into::into),
        }
    }

    /// Copy the domain ledger's fields back into this record, keeping the
    /// identity, version, and timestamp it was loaded with.
    pub fn absorb(&mut self, ledger: &TransferLedger) {
        self.gameweek = ledger.gameweek.round();
        self.allowance_at_start = ledger.allowance_at_start.banked();
        self.transfers_made = ledger.transfers_made;
        self.points_deducted = ledger.points_deducted;
        self.free_remaining = ledger.free_remaining.banked();
        self.active_chip = ledger.active_chip.map(Into::into);
    }
}

/// Squad selection persisted per manager.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SquadEntity {
    /// Manager this squad belongs to (also the primary key).
    pub manager_id: Uuid,
    /// Selected player identifiers, in pick order.
    pub player_ids: Vec<u32>,
    /// Last time this squad was updated.
    pub updated_at: SystemTime,
}

impl SquadEntity {
    /// Build a squad record for `manager_id` from a validated selection.
    pub fn new(manager_id: Uuid, player_ids: Vec<u32>) -> Self {
        Self {
            manager_id,
            player_ids,
            updated_at: SystemTime::now(),
        }
    }
}
