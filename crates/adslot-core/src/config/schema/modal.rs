use super::{ConfigSchemaError, Validate};
use crate::policy::frequency::FrequencyPolicy;
use serde::{Deserialize, Serialize};

mod defaults {
    pub const fn delay_ms() -> u64 {
        3_000
    }
}

pub const MAX_MODAL_DELAY_MS: u64 = 600_000;

///
/// ModalConfig
/// One frequency-capped overlay, keyed by id under `[modals]`.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModalConfig {
    #[serde(default = "defaults::delay_ms")]
    pub delay_ms: u64,

    #[serde(default)]
    pub policy: FrequencyPolicy,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            delay_ms: defaults::delay_ms(),
            policy: FrequencyPolicy::default(),
        }
    }
}

impl Validate for ModalConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.delay_ms > MAX_MODAL_DELAY_MS {
            return Err(ConfigSchemaError::ValidationError(format!(
                "delay_ms {} exceeds max {MAX_MODAL_DELAY_MS}",
                self.delay_ms
            )));
        }

        Ok(())
    }
}

///
/// TESTS
///
