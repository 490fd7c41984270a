use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dao::models::SquadEntity;
use crate::dto::{format_system_time, validation};

/// Payload used to pick or rebuild a squad for a gameweek.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PickSquadRequest {
    /// Gameweek the selection is for.
    pub gameweek: u8,
    /// Full selection, replacing any previous squad.
    pub player_ids: Vec<u32>,
}

impl Validate for PickSquadRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validation::validate_gameweek(self.gameweek) {
            errors.add("gameweek", e);
        }

        if let Err(e) = validation::validate_player_ids(&self.player_ids) {
            errors.add("player_ids", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Squad selection returned by the squad routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct SquadView {
    pub manager_id: Uuid,
    pub player_ids: Vec<u32>,
    pub updated_at: String,
}

impl From<SquadEntity> for SquadView {
    fn from(entity: SquadEntity) -> Self {
        Self {
            manager_id: entity.manager_id,
            player_ids: entity.player_ids,
            updated_at: format_system_time(entity.updated_at),
        }
    }
}
