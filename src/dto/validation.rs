//! Validation helpers for DTOs.

use std::collections::HashSet;

use validator::ValidationError;

/// Validates that a gameweek number is at least 1.
///
/// The upper bound depends on the configured season length, so it is checked
/// in the service layer where the rule set is available.
pub fn validate_gameweek(round: u8) -> Result<(), ValidationError> {
    if round == 0 {
        let mut err = ValidationError::new("gameweek_range");
        err.message = Some("Gameweek numbering starts at 1".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a player selection is non-empty and free of duplicates.
pub fn validate_player_ids(ids: &[u32]) -> Result<(), ValidationError> {
    if ids.is_empty() {
        let mut err = ValidationError::new("player_ids_empty");
        err.message = Some("Selection must contain at least one player".into());
        return Err(err);
    }

    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id) {
            let mut err = ValidationError::new("player_ids_unique");
            err.message = Some(format!("Player {} appears more than once", id).into());
            return Err(err);
        }
    }

    Ok(())
}
