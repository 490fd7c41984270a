use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::dto::validation::validate_gameweek;
use crate::rules::Chip;

/// Chip identifier used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChipDto {
    Wildcard,
    FreeHit,
    BenchBoost,
    TripleCaptain,
}

impl From<Chip> for ChipDto {
    fn from(value: Chip) -> Self {
        match value {
            Chip::Wildcard => ChipDto::Wildcard,
            Chip::FreeHit => ChipDto::FreeHit,
            Chip::BenchBoost => ChipDto::BenchBoost,
            Chip::TripleCaptain => ChipDto::TripleCaptain,
        }
    }
}

impl From<ChipDto> for Chip {
    fn from(value: ChipDto) -> Self {
        match value {
            ChipDto::Wildcard => Chip::Wildcard,
            ChipDto::FreeHit => Chip::FreeHit,
            ChipDto::BenchBoost => Chip::BenchBoost,
            ChipDto::TripleCaptain => Chip::TripleCaptain,
        }
    }
}

/// Payload used to play a chip for a gameweek.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivateChipRequest {
    /// Gameweek the client believes is current.
    pub gameweek: u8,
    pub chip: ChipDto,
}

impl Validate for ActivateChipRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_gameweek(self.gameweek) {
            errors.add("gameweek", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
