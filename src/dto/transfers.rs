use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dao::models::TransferLedgerEntity;
use crate::dto::{chips::ChipDto, format_system_time, validation::validate_gameweek};
use crate::rules::{TransferAllowance, TransferCost};

/// One player swapped for another.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct TransferMove {
    /// Player leaving the squad.
    pub player_out: u32,
    /// Player joining the squad.
    pub player_in: u32,
}

impl Validate for TransferMove {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.player_out == self.player_in {
            let mut err = ValidationError::new("transfer_move_identity");
            err.message = Some("A transfer must swap two different players".into());
            errors.add("player_in", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload used to record one or more transfers in a gameweek.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MakeTransfersRequest {
    /// Gameweek the client believes is current.
    pub gameweek: u8,
    /// Swaps to apply, in order.
    pub moves: Vec<TransferMove>,
}

impl Validate for MakeTransfersRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_gameweek(self.gameweek) {
            errors.add("gameweek", e);
        }

        if self.moves.is_empty() {
            let mut err = ValidationError::new("moves_empty");
            err.message = Some("At least one transfer is required".into());
            errors.add("moves", err);
        }

        for transfer_move in &self.moves {
            if let Err(move_errors) = transfer_move.validate() {
                errors.merge_self("moves", Err(move_errors));
            }
        }

        // The same player may not leave or join twice within one request.
        let mut outgoing = HashSet::new();
        let mut incoming = HashSet::new();
        for transfer_move in &self.moves {
            if !outgoing.insert(transfer_move.player_out) {
                let mut err = ValidationError::new("moves_duplicate_out");
                err.message = Some(
                    format!("Player {} leaves more than once", transfer_move.player_out).into(),
                );
                errors.add("moves", err);
            }
            if !incoming.insert(transfer_move.player_in) {
                let mut err = ValidationError::new("moves_duplicate_in");
                err.message = Some(
                    format!("Player {} joins more than once", transfer_move.player_in).into(),
                );
                errors.add("moves", err);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Free-transfer budget projection exposed to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllowanceView {
    /// Transfers are free and uncounted this week.
    Unlimited,
    /// A finite number of free transfers remain.
    Limited { count: u8 },
}

impl From<TransferAllowance> for AllowanceView {
    fn from(value: TransferAllowance) -> Self {
        match value {
            TransferAllowance::Unlimited => AllowanceView::Unlimited,
            TransferAllowance::Limited(count) => AllowanceView::Limited { count },
        }
    }
}

/// Price of the transfers recorded so far this week.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferCostView {
    pub free_used: u16,
    pub paid: u16,
    pub points_deducted: u32,
}

impl From<TransferCost> for TransferCostView {
    fn from(value: TransferCost) -> Self {
        Self {
            free_used: value.free_used,
            paid: value.paid,
            points_deducted: value.points_deducted,
        }
    }
}

/// One manager's transfer accounting for one gameweek.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferLedgerView {
    pub manager_id: Uuid,
    pub gameweek: u8,
    pub allowance_at_start: AllowanceView,
    pub transfers_made: u16,
    pub points_deducted: u32,
    pub free_remaining: AllowanceView,
    pub active_chip: Option<ChipDto>,
    pub updated_at: String,
}

impl From<&TransferLedgerEntity> for TransferLedgerView {
    fn from(entity: &TransferLedgerEntity) -> Self {
        let ledger = entity.ledger();
        Self {
            manager_id: entity.manager_id,
            gameweek: ledger.gameweek.round(),
            allowance_at_start: ledger.allowance_at_start.into(),
            transfers_made: ledger.transfers_made,
            points_deducted: ledger.points_deducted,
            free_remaining: ledger.free_remaining.into(),
            active_chip: ledger.active_chip.map(Into::into),
            updated_at: format_system_time(entity.updated_at),
        }
    }
}

/// Result of recording transfers: the updated ledger and the week's price.
#[derive(Debug, Serialize, ToSchema)]
pub struct MakeTransfersResponse {
    pub ledger: TransferLedgerView,
    pub cost: TransferCostView,
}
