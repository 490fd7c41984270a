//! Per-gameweek transfer ledger and its mutation rules.

use crate::rules::{
    Chip, Gameweek, RuleError, TransferAllowance, TransferCost, TransferRules, cost_for_week,
};

/// One manager's transfer accounting for one gameweek.
///
/// `allowance_at_start` is captured when the week opens and is the only input
/// the pricing ever reads; `free_remaining` and `points_deducted` are derived
/// and overwritten in full on every mutation. The historical defect this
/// design rules out was re-pricing a week against the already-decremented
/// remainder, which miscounted every transfer after the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLedger {
    /// Gameweek this ledger belongs to.
    pub gameweek: Gameweek,
    /// Free-transfer budget captured once when the week opened.
    pub allowance_at_start: TransferAllowance,
    /// Transfers recorded so far this week.
    pub transfers_made: u16,
    /// Derived: points charged for the week so far.
    pub points_deducted: u32,
    /// Derived: budget left after the week's transfers.
    pub free_remaining: TransferAllowance,
    /// Chip played this week, if any.
    pub active_chip: Option<Chip>,
}

impl TransferLedger {
    /// Fresh ledger for a manager entering squad selection in `gameweek`.
    ///
    /// The opening round grants an unlimited budget; every later entry point
    /// starts from the standard initial allowance.
    pub fn opening(gameweek: Gameweek, rules: &TransferRules) -> Self {
        let allowance = if gameweek.is_first() {
            TransferAllowance::Unlimited
        } else {
            TransferAllowance::Limited(rules.initial_free_transfers)
        };

        Self {
            gameweek,
            allowance_at_start: allowance,
            transfers_made: 0,
            points_deducted: 0,
            free_remaining: allowance,
            active_chip: None,
        }
    }

    /// Whether the active chip suspends transfer charges this week.
    pub fn costs_suspended(&self) -> bool {
        self.active_chip
            .is_some_and(|chip| chip.suspends_transfer_cost())
    }

    /// Record one more transfer and re-price the whole week.
    ///
    /// The count is bounded while the budget is finite; unlimited weeks accept
    /// any number of squad edits. Both derived fields are overwritten from the
    /// week-start budget, never adjusted incrementally.
    pub fn record_transfer(&mut self, rules: &TransferRules) -> Result<TransferCost, RuleError> {
        let attempted = self
            .transfers_made
            .checked_add(1)
            .ok_or(RuleError::TransferBoundExceeded {
                attempted: u16::MAX,
                bound: rules.weekly_transfer_bound,
            })?;

        if !self.allowance_at_start.is_unlimited() && attempted > rules.weekly_transfer_bound {
            return Err(RuleError::TransferBoundExceeded {
                attempted,
                bound: rules.weekly_transfer_bound,
            });
        }

        self.transfers_made = attempted;
        Ok(self.reprice(rules))
    }

    /// Record `count` transfers one at a time, returning the week's final cost.
    ///
    /// Nothing is applied if any single step would breach the bound: the bound
    /// is checked against the would-be total up front so a rejected batch
    /// leaves the ledger untouched.
    pub fn record_transfers(
        &mut self,
        count: u16,
        rules: &TransferRules,
    ) -> Result<TransferCost, RuleError> {
        let attempted = self
            .transfers_made
            .checked_add(count)
            .ok_or(RuleError::TransferBoundExceeded {
                attempted: u16::MAX,
                bound: rules.weekly_transfer_bound,
            })?;

        if !self.allowance_at_start.is_unlimited() && attempted > rules.weekly_transfer_bound {
            return Err(RuleError::TransferBoundExceeded {
                attempted,
                bound: rules.weekly_transfer_bound,
            });
        }

        let mut cost = self.current_cost(rules);
        for _ in 0..count {
            cost = self.record_transfer(rules)?;
        }
        Ok(cost)
    }

    /// Play a chip for this week. Only one chip fits in a week; a
    /// cost-suspending chip immediately re-prices the week, refunding any
    /// deduction already recorded.
    pub fn activate_chip(&mut self, chip: Chip, rules: &TransferRules) -> Result<(), RuleError> {
        if let Some(active) = self.active_chip {
            return Err(RuleError::ChipAlreadyActive { active });
        }

        self.active_chip = Some(chip);
        if chip.suspends_transfer_cost() {
            self.reprice(rules);
        }
        Ok(())
    }

    /// Recompute the derived fields from scratch and report whether the stored
    /// values had drifted.
    ///
    /// Every load from persistence runs through this, so records hand-edited
    /// or corrupted by older software converge back to the rules without
    /// one-off repair scripts.
    pub fn reconcile(&mut self, rules: &TransferRules) -> bool {
        let before = (self.points_deducted, self.free_remaining);
        self.reprice(rules);
        before != (self.points_deducted, self.free_remaining)
    }

    /// The week's cost as currently derivable, without mutating the count.
    fn current_cost(&self, rules: &TransferRules) -> TransferCost {
        if self.costs_suspended() {
            TransferCost::NONE
        } else {
            cost_for_week(
                self.transfers_made,
                self.allowance_at_start,
                self.gameweek,
                rules,
            )
        }
    }

    /// Overwrite both derived fields from the week-start budget.
    fn reprice(&mut self, rules: &TransferRules) -> TransferCost {
        let cost = self.current_cost(rules);
        self.points_deducted = cost.points_deducted;
        self.free_remaining = self.allowance_at_start.minus(cost.free_used);
        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(n: u8) -> Gameweek {
        Gameweek::new(n)
    }

    fn ledger_with_budget(gameweek: u8, banked: u8) -> TransferLedger {
        TransferLedger {
            gameweek: week(gameweek),
            allowance_at_start: TransferAllowance::Limited(banked),
            transfers_made: 0,
            points_deducted: 0,
            free_remaining: TransferAllowance::Limited(banked),
            active_chip: None,
        }
    }

    #[test]
    fn opening_round_ledger_is_unlimited() {
        let rules = TransferRules::default();
        let ledger = TransferLedger::opening(Gameweek::FIRST, &rules);
        assert_eq!(ledger.allowance_at_start, TransferAllowance::Unlimited);
        assert_eq!(ledger.free_remaining, TransferAllowance::Unlimited);
        assert_eq!(ledger.transfers_made, 0);
    }

    #[test]
    fn later_weeks_open_with_the_initial_allowance() {
        let rules = TransferRules::default();
        let ledger = TransferLedger::opening(week(9), &rules);
        assert_eq!(ledger.allowance_at_start, TransferAllowance::Limited(1));
        assert_eq!(ledger.free_remaining, TransferAllowance::Limited(1));
    }

    #[test]
    fn three_transfers_against_one_free_costs_eight_points() {
        let rules = TransferRules::default();
        let mut ledger = ledger_with_budget(5, 1);

        ledger.record_transfer(&rules).unwrap();
        ledger.record_transfer(&rules).unwrap();
        let cost = ledger.record_transfer(&rules).unwrap();

        assert_eq!(ledger.transfers_made, 3);
        assert_eq!(ledger.free_remaining, TransferAllowance::Limited(0));
        assert_eq!(ledger.points_deducted, 8);
        assert_eq!(cost.free_used, 1);
        assert_eq!(cost.paid, 2);
    }

    #[test]
    fn reprice_always_reads_the_week_start_budget() {
        let rules = TransferRules::default();
        let mut ledger = ledger_with_budget(5, 2);

        // After the first transfer the remainder drops to 1; pricing the
        // second against that remainder (the old bug) would have charged it.
        ledger.record_transfer(&rules).unwrap();
        assert_eq!(ledger.free_remaining, TransferAllowance::Limited(1));
        let cost = ledger.record_transfer(&rules).unwrap();

        assert_eq!(cost.free_used, 2);
        assert_eq!(cost.paid, 0);
        assert_eq!(ledger.points_deducted, 0);
    }

    #[test]
    fn batch_recording_matches_single_steps() {
        let rules = TransferRules::default();
        let mut stepped = ledger_with_budget(5, 1);
        let mut batched = stepped.clone();

        for _ in 0..4 {
            stepped.record_transfer(&rules).unwrap();
        }
        let cost = batched.record_transfers(4, &rules).unwrap();

        assert_eq!(stepped, batched);
        assert_eq!(cost.paid, 3);
        assert_eq!(cost.points_deducted, 12);
    }

    #[test]
    fn rejected_batch_leaves_the_ledger_untouched() {
        let rules = TransferRules::default();
        let mut ledger = ledger_with_budget(5, 1);
        ledger.record_transfers(14, &rules).unwrap();
        let snapshot = ledger.clone();

        let err = ledger.record_transfers(2, &rules).unwrap_err();
        assert_eq!(
            err,
            RuleError::TransferBoundExceeded {
                attempted: 16,
                bound: 15
            }
        );
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn bound_is_waived_while_the_budget_is_unlimited() {
        let rules = TransferRules::default();
        let mut ledger = TransferLedger::opening(Gameweek::FIRST, &rules);
        ledger.record_transfers(40, &rules).unwrap();
        assert_eq!(ledger.transfers_made, 40);
        assert_eq!(ledger.points_deducted, 0);
    }

    #[test]
    fn wildcard_week_never_deducts_and_keeps_the_budget() {
        let rules = TransferRules::default();
        let mut ledger = ledger_with_budget(5, 2);
        ledger.activate_chip(Chip::Wildcard, &rules).unwrap();

        for _ in 0..10 {
            ledger.record_transfer(&rules).unwrap();
        }

        assert_eq!(ledger.points_deducted, 0);
        assert_eq!(ledger.free_remaining, TransferAllowance::Limited(2));
        assert_eq!(ledger.transfers_made, 10);
    }

    #[test]
    fn wildcard_refunds_deductions_already_recorded_this_week() {
        let rules = TransferRules::default();
        let mut ledger = ledger_with_budget(5, 1);
        ledger.record_transfers(3, &rules).unwrap();
        assert_eq!(ledger.points_deducted, 8);

        ledger.activate_chip(Chip::Wildcard, &rules).unwrap();
        assert_eq!(ledger.points_deducted, 0);
        assert_eq!(ledger.free_remaining, TransferAllowance::Limited(1));
    }

    #[test]
    fn scoring_chips_do_not_touch_transfer_accounting() {
        let rules = TransferRules::default();
        let mut ledger = ledger_with_budget(5, 1);
        ledger.activate_chip(Chip::TripleCaptain, &rules).unwrap();
        ledger.record_transfers(2, &rules).unwrap();

        assert_eq!(ledger.points_deducted, 4);
        assert_eq!(ledger.free_remaining, TransferAllowance::Limited(0));
    }

    #[test]
    fn second_chip_in_a_week_is_rejected() {
        let rules = TransferRules::default();
        let mut ledger = ledger_with_budget(5, 1);
        ledger.activate_chip(Chip::BenchBoost, &rules).unwrap();

        let err = ledger.activate_chip(Chip::Wildcard, &rules).unwrap_err();
        assert_eq!(
            err,
            RuleError::ChipAlreadyActive {
                active: Chip::BenchBoost
            }
        );
        assert_eq!(ledger.active_chip, Some(Chip::BenchBoost));
    }

    #[test]
    fn reconcile_heals_drifted_derived_fields() {
        let rules = TransferRules::default();
        let mut ledger = ledger_with_budget(5, 1);
        ledger.record_transfers(3, &rules).unwrap();

        // Simulate a record mangled by direct field edits.
        ledger.points_deducted = 16;
        ledger.free_remaining = TransferAllowance::Limited(1);

        assert!(ledger.reconcile(&rules));
        assert_eq!(ledger.points_deducted, 8);
        assert_eq!(ledger.free_remaining, TransferAllowance::Limited(0));
        assert!(!ledger.reconcile(&rules));
    }
}
