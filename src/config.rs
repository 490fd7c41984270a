//! Application-level configuration loading, including the transfer rule set.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::rules::TransferRules;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GAFFER_BACK_CONFIG_PATH";

#[derive(Debug, Clone, Default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    rules: TransferRules,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// built-in rule set when the file is absent or malformed.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        cap = app_config.rules.free_transfer_cap,
                        paid_points = app_config.rules.paid_transfer_points,
                        "loaded transfer rules from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Transfer rules the server should enforce.
    pub fn rules(&self) -> TransferRules {
        self.rules.clone()
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
///
/// Every field is optional; omitted entries keep their built-in value, so a
/// deployment can override a single rule without restating the rest.
struct RawConfig {
    free_transfer_cap: Option<u8>,
    paid_transfer_points: Option<u32>,
    initial_free_transfers: Option<u8>,
    squad_size: Option<u8>,
    weekly_transfer_bound: Option<u16>,
    final_gameweek: Option<u8>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = TransferRules::default();
        let rules = TransferRules {
            free_transfer_cap: value.free_transfer_cap.unwrap_or(defaults.free_transfer_cap),
            paid_transfer_points: value
                .paid_transfer_points
                .unwrap_or(defaults.paid_transfer_points),
            initial_free_transfers: value
                .initial_free_transfers
                .unwrap_or(defaults.initial_free_transfers),
            squad_size: value.squad_size.unwrap_or(defaults.squad_size),
            weekly_transfer_bound: value
                .weekly_transfer_bound
                .unwrap_or(defaults.weekly_transfer_bound),
            final_gameweek: value.final_gameweek.unwrap_or(defaults.final_gameweek),
        };
        Self { rules }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
