mod log;
mod modal;
mod placement;
mod sdk;

pub use log::*;
pub use modal::*;
pub use placement::*;
pub use sdk::*;

use crate::{
    config::ConfigError,
    domain::SlotDefinition,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ConfigSchemaError
///

#[derive(Debug, ThisError)]
pub enum ConfigSchemaError {
    #[error("validation error: {0}")]
    ValidationError(String),
}

pub const PLACEMENT_KEY_MAX_BYTES: usize = 64;

fn validate_placement_key(key: &str) -> Result<(), ConfigSchemaError> {
    if key.is_empty() || key.len() > PLACEMENT_KEY_MAX_BYTES {
        return Err(ConfigSchemaError::ValidationError(format!(
            "placement key '{key}' must be 1..={PLACEMENT_KEY_MAX_BYTES} bytes",
        )));
    }

    let valid = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(ConfigSchemaError::ValidationError(format!(
            "placement key '{key}' may only contain ascii letters, digits, '_' and '-'",
        )));
    }

    Ok(())
}

///
/// Validate
///

pub trait Validate {
    fn validate(&self) -> Result<(), ConfigSchemaError>;
}

///
/// AdsConfig
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdsConfig {
    #[serde(default)]
    pub sdk: SdkConfig,

    #[serde(default)]
    pub consent: ConsentConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub out_of_page: OutOfPageConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub placements: BTreeMap<String, PlacementConfig>,

    #[serde(default)]
    pub modals: BTreeMap<String, ModalConfig>,
}

impl AdsConfig {
    /// Resolve a placement key to its slot definition.
    #[must_use]
    pub fn placement(&self, key: &str) -> Option<SlotDefinition> {
        self.placements.get(key).map(|placement| SlotDefinition {
            placement_key: key.to_string(),
            ad_unit_path: placement.ad_unit_path.clone(),
            sizes: placement.sizes.clone(),
        })
    }

    /// Like [`Self::placement`], but an unknown key is an error.
    pub fn resolve(&self, key: &str) -> Result<SlotDefinition, ConfigError> {
        self.placement(key)
            .ok_or_else(|| ConfigError::UnknownPlacement(key.to_string()))
    }

    pub fn modal(&self, id: &str) -> Result<&ModalConfig, ConfigError> {
        self.modals
            .get(id)
            .ok_or_else(|| ConfigError::UnknownModal(id.to_string()))
    }
}

impl Validate for AdsConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        self.sdk.validate()?;
        self.consent.validate()?;
        self.out_of_page.validate()?;
        self.log.validate()?;

        for (key, placement) in &self.placements {
            validate_placement_key(key)?;
            placement.validate().map_err(|ConfigSchemaError::ValidationError(msg)| {
                ConfigSchemaError::ValidationError(format!("placement '{key}': {msg}"))
            })?;
        }

        for (id, modal) in &self.modals {
            validate_placement_key(id)?;
            modal.validate().map_err(|ConfigSchemaError::ValidationError(msg)| {
                ConfigSchemaError::ValidationError(format!("modal '{id}': {msg}"))
            })?;
        }

        Ok(())
    }
}

///
/// TESTS
///
