//! Transfer accounting rules: the pure core the rest of the backend drives.
//!
//! Everything in this module is synchronous and side-effect free. Persistence,
//! HTTP, and concurrency control live in the layers above; the rules only ever
//! see plain values and return plain values or typed errors.

pub mod cost;
pub mod ledger;
pub mod rollover;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::cost::{TransferCost, cost_for_week};
pub use self::ledger::TransferLedger;
pub use self::rollover::{next_week, roll_forward};

/// One scheduling round of matches; the unit over which transfer budgets reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gameweek(u8);

impl Gameweek {
    /// The opening round of a season.
    pub const FIRST: Gameweek = Gameweek(1);

    /// Wrap a raw round number. Range checks belong to the request boundary.
    pub fn new(round: u8) -> Self {
        Gameweek(round)
    }

    /// The round directly after this one.
    pub fn next(self) -> Self {
        Gameweek(self.0.saturating_add(1))
    }

    /// Whether this is the opening round, where squad changes are free.
    pub fn is_first(self) -> bool {
        self.0 == 1
    }

    /// Raw round number for persistence and wire formats.
    pub fn round(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Gameweek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-transfer budget for one gameweek.
///
/// `Unlimited` is the agreed representation of the "no transfer costs apply"
/// weeks (the opening round, and a wildcard squad rebuild mid-draft). It never
/// participates in arithmetic, which keeps sentinel integers out of the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferAllowance {
    /// Every transfer is free and nothing is consumed.
    Unlimited,
    /// A banked number of free transfers; anything beyond them is paid.
    Limited(u8),
}

impl TransferAllowance {
    /// Whether this budget never charges for transfers.
    pub fn is_unlimited(self) -> bool {
        matches!(self, TransferAllowance::Unlimited)
    }

    /// How many of `transfers` this budget covers for free.
    pub fn free_used_for(self, transfers: u16) -> u16 {
        match self {
            TransferAllowance::Unlimited => transfers,
            TransferAllowance::Limited(banked) => transfers.min(u16::from(banked)),
        }
    }

    /// The budget left after `free_used` transfers were taken from it.
    pub fn minus(self, free_used: u16) -> Self {
        match self {
            TransferAllowance::Unlimited => TransferAllowance::Unlimited,
            TransferAllowance::Limited(banked) => {
                let left = u16::from(banked).saturating_sub(free_used);
                TransferAllowance::Limited(left as u8)
            }
        }
    }

    /// Banked count, if the budget is finite.
    pub fn banked(self) -> Option<u8> {
        match self {
            TransferAllowance::Unlimited => None,
            TransferAllowance::Limited(banked) => Some(banked),
        }
    }
}

impl From<Option<u8>> for TransferAllowance {
    fn from(value: Option<u8>) -> Self {
        match value {
            None => TransferAllowance::Unlimited,
            Some(banked) => TransferAllowance::Limited(banked),
        }
    }
}

impl From<TransferAllowance> for Option<u8> {
    fn from(value: TransferAllowance) -> Self {
        value.banked()
    }
}

impl fmt::Display for TransferAllowance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferAllowance::Unlimited => write!(f, "unlimited"),
            TransferAllowance::Limited(banked) => write!(f, "{banked}"),
        }
    }
}

/// Chips a manager can play for one gameweek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    /// Rebuild the squad freely for one week.
    Wildcard,
    /// One-week squad rebuild that reverts afterwards.
    FreeHit,
    /// Bench players score this week.
    BenchBoost,
    /// Captain scores triple instead of double.
    TripleCaptain,
}

impl Chip {
    /// Whether transfers made while this chip is active cost nothing and leave
    /// the free-transfer budget untouched.
    pub fn suspends_transfer_cost(self) -> bool {
        matches!(self, Chip::Wildcard | Chip::FreeHit)
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Chip::Wildcard => "wildcard",
            Chip::FreeHit => "free_hit",
            Chip::BenchBoost => "bench_boost",
            Chip::TripleCaptain => "triple_captain",
        };
        f.write_str(name)
    }
}

/// Tunable transfer policy, loaded from configuration at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRules {
    /// Most free transfers a manager can carry into a week.
    pub free_transfer_cap: u8,
    /// Points deducted per transfer beyond the free budget.
    pub paid_transfer_points: u32,
    /// Free transfers granted to a fresh week without carry-over.
    pub initial_free_transfers: u8,
    /// Players a squad must contain.
    pub squad_size: u8,
    /// Most transfers accepted in one week while the budget is finite.
    pub weekly_transfer_bound: u16,
    /// Last round of the season; rollover stops here.
    pub final_gameweek: u8,
}

impl Default for TransferRules {
    fn default() -> Self {
        Self {
            free_transfer_cap: 2,
            paid_transfer_points: 4,
            initial_free_transfers: 1,
            squad_size: 15,
            weekly_transfer_bound: 15,
            final_gameweek: 38,
        }
    }
}

/// Error raised when a transfer-accounting rule rejects a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The weekly transfer bound would be exceeded.
    #[error("{attempted} transfers this week would exceed the bound of {bound}")]
    TransferBoundExceeded {
        /// Count the mutation would have reached.
        attempted: u16,
        /// Configured weekly bound.
        bound: u16,
    },
    /// The stored week no longer matches the week being acted upon.
    #[error("transfer ledger is for gameweek {ledger}, cannot serve gameweek {requested}")]
    StaleLedger {
        /// Gameweek the ledger belongs to.
        ledger: Gameweek,
        /// Gameweek the caller asked for.
        requested: Gameweek,
    },
    /// A chip is already active for the week.
    #[error("chip {active} is already active this gameweek")]
    ChipAlreadyActive {
        /// The chip that was played earlier in the week.
        active: Chip,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowance_covers_up_to_banked_count() {
        assert_eq!(TransferAllowance::Limited(2).free_used_for(1), 1);
        assert_eq!(TransferAllowance::Limited(2).free_used_for(5), 2);
        assert_eq!(TransferAllowance::Unlimited.free_used_for(40), 40);
    }

    #[test]
    fn allowance_subtraction_saturates() {
        assert_eq!(
            TransferAllowance::Limited(1).minus(3),
            TransferAllowance::Limited(0)
        );
        assert_eq!(
            TransferAllowance::Unlimited.minus(100),
            TransferAllowance::Unlimited
        );
    }

    #[test]
    fn only_squad_rebuild_chips_suspend_costs() {
        assert!(Chip::Wildcard.suspends_transfer_cost());
        assert!(Chip::FreeHit.suspends_transfer_cost());
        assert!(!Chip::BenchBoost.suspends_transfer_cost());
        assert!(!Chip::TripleCaptain.suspends_transfer_cost());
    }

    #[test]
    fn gameweek_ordering_and_successor() {
        let first = Gameweek::FIRST;
        assert!(first.is_first());
        assert!(first < first.next());
        assert_eq!(first.next().round(), 2);
    }
}
