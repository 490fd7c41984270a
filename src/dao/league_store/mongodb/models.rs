use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{ChipEntity, SquadEntity, TransferLedgerEntity};

/// Ledger record as stored in the `transfer_ledgers` collection.
///
/// `version` is widened to `i64` because BSON has no unsigned integers; the
/// counter starts at zero and only the store increments it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoLedgerDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    pub manager_id: Uuid,
    pub gameweek: u8,
    allowance_at_start: Option<u8>,
    transfers_made: u16,
    points_deducted: u32,
    free_remaining: Option<u8>,
    active_chip: Option<ChipEntity>,
    pub version: i64,
    updated_at: DateTime,
}

impl From<TransferLedgerEntity> for MongoLedgerDocument {
    fn from(value: TransferLedgerEntity) -> Self {
        Self {
            id: value.id,
            manager_id: value.manager_id,
            gameweek: value.gameweek,
            allowance_at_start: value.allowance_at_start,
            transfers_made: value.transfers_made,
            points_deducted: value.points_deducted,
            free_remaining: value.free_remaining,
            active_chip: value.active_chip,
            version: value.version as i64,
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoLedgerDocument> for TransferLedgerEntity {
    fn from(value: MongoLedgerDocument) -> Self {
        Self {
            id: value.id,
            manager_id: value.manager_id,
            gameweek: value.gameweek,
            allowance_at_start: value.allowance_at_start,
            transfers_made: value.transfers_made,
            points_deducted: value.points_deducted,
            free_remaining: value.free_remaining,
            active_chip: value.active_chip,
            version: value.version as u64,
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

/// Squad record as stored in the `squads` collection, keyed by manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSquadDocument {
    #[serde(rename = "_id")]
    manager_id: Uuid,
    player_ids: Vec<u32>,
    updated_at: DateTime,
}

impl From<SquadEntity> for MongoSquadDocument {
    fn from(value: SquadEntity) -> Self {
        Self {
            manager_id: value.manager_id,
            player_ids: value.player_ids,
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoSquadDocument> for SquadEntity {
    fn from(value: MongoSquadDocument) -> Self {
        Self {
            manager_id: value.manager_id,
            player_ids: value.player_ids,
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}

/// Filter matching one manager's ledger for one gameweek.
pub fn ledger_key(manager_id: Uuid, gameweek: u8) -> Document {
    doc! {
        "manager_id": uuid_as_binary(manager_id),
        "gameweek": i32::from(gameweek),
    }
}
