//! Gameweek boundary transition for transfer ledgers.

use crate::rules::{Gameweek, TransferAllowance, TransferLedger, TransferRules};

/// Build the opening ledger for the week after `prev`.
///
/// Weekly counters reset to zero and the chip slot is cleared. The new budget
/// is `min(cap, remaining + 1)`, except after a cost-suspending chip week or
/// an unlimited week, both of which reset to the standard initial allowance.
pub fn next_week(prev: &TransferLedger, rules: &TransferRules) -> TransferLedger {
    let carried = if prev.costs_suspended() {
        TransferAllowance::Limited(rules.initial_free_transfers)
    } else {
        match prev.free_remaining.banked() {
            None => TransferAllowance::Limited(rules.initial_free_transfers),
            Some(remaining) => TransferAllowance::Limited(
                remaining
                    .saturating_add(1)
                    .min(rules.free_transfer_cap),
            ),
        }
    };

    TransferLedger {
        gameweek: prev.gameweek.next(),
        allowance_at_start: carried,
        transfers_made: 0,
        points_deducted: 0,
        free_remaining: carried,
        active_chip: None,
    }
}

/// Advance `ledger` week by week until it belongs to `into`.
///
/// Asking for the current week or an earlier one returns the ledger unchanged,
/// so replaying a boundary event never double-banks a free transfer.
pub fn roll_forward(
    ledger: &TransferLedger,
    into: Gameweek,
    rules: &TransferRules,
) -> TransferLedger {
    let mut current = ledger.clone();
    while current.gameweek < into {
        current = next_week(&current, rules);
    }
    current
}
