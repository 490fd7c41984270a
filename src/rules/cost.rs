//! Weekly transfer-cost computation.

use crate::rules::{Gameweek, TransferAllowance, TransferRules};

/// Breakdown of one week's transfer charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferCost {
    /// Transfers covered by the week-start budget.
    pub free_used: u16,
    /// Transfers beyond the budget.
    pub paid: u16,
    /// Points charged for the paid transfers.
    pub points_deducted: u32,
}

impl TransferCost {
    /// A cost of nothing, used for weeks where charging is suspended.
    pub const NONE: TransferCost = TransferCost {
        free_used: 0,
        paid: 0,
        points_deducted: 0,
    };
}

/// Price `transfers_this_week` transfers against the budget captured at the
/// start of the week.
///
/// The opening round and unlimited budgets never charge. Otherwise the budget
/// covers transfers first and each one past it costs
/// [`TransferRules::paid_transfer_points`].
///
/// Callers must pass the week-start budget, not the running remainder: the
/// whole week is re-priced from scratch on every transfer, so feeding an
/// already-decremented balance back in would charge later transfers twice.
pub fn cost_for_week(
    transfers_this_week: u16,
    allowance_at_start: TransferAllowance,
    gameweek: Gameweek,
    rules: &TransferRules,
) -> TransferCost {
    if gameweek.is_first() || allowance_at_start.is_unlimited() {
        return TransferCost {
            free_used: transfers_this_week,
            paid: 0,
            points_deducted: 0,
        };
    }

    let free_used = allowance_at_start.free_used_for(transfers_this_week);
    let paid = transfers_this_week - free_used;
    TransferCost {
        free_used,
        paid,
        points_deducted: u32::from(paid) * rules.paid_transfer_points,
    }
}
