pub mod schema;

use crate::{Error, ErrorOrigin};
use schema::{ConfigSchemaError, Validate};
use std::sync::Arc;
use thiserror::Error as ThisError;

pub use schema::AdsConfig;

//
// CONFIG
//
// The config is shared by every controller in a session and never mutated
// after load, so it is handed around as an `Arc`. Host-side tests and tools
// run on multi-threaded targets too; `Arc` works there without cfg gymnastics.
//

/// Errors related to configuration parsing and validation.
#[derive(Debug, ThisError)]
pub enum ConfigError {
    /// TOML could not be parsed into the expected structure.
    #[error("toml error: {0}")]
    CannotParseToml(String),

    #[error("unknown placement '{0}'")]
    UnknownPlacement(String),

    #[error("unknown modal '{0}'")]
    UnknownModal(String),

    /// Wrapper for data schema-level errors.
    #[error(transparent)]
    ConfigSchema(#[from] ConfigSchemaError),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::domain(ErrorOrigin::Config, err.to_string())
    }
}

///
/// Config
///

pub struct Config;

impl Config {
    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(config_str: &str) -> Result<Arc<AdsConfig>, ConfigError> {
        let config: AdsConfig =
            toml::from_str(config_str).map_err(|e| ConfigError::CannotParseToml(e.to_string()))?;

        Self::from_model(config)
    }

    /// Validate an in-memory model, e.g. one assembled by a remote
    /// placement service.
    pub fn from_model(config: AdsConfig) -> Result<Arc<AdsConfig>, ConfigError> {
        config.validate()?;

        Ok(Arc::new(config))
    }

    /// Render a config back to TOML.
    pub fn to_toml(config: &AdsConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::CannotParseToml(e.to_string()))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{AnchorPosition, SlotSize},
        policy::frequency::FrequencyPolicy,
    };

    const SAMPLE: &str = r#"
        [sdk]
        script_url = "https://ads.example.test/tag.js"
        single_request = true
        center_slots = true

        [sdk.lazy_load]
        fetch_margin_percent = 300
        render_margin_percent = 150
        mobile_scaling = 2.0

        [consent]
        timeout_ms = 1500

        [out_of_page]
        interstitial = "/2233/ledgerline/interstitial"
        anchor = "/2233/ledgerline/anchor"
        anchor_position = "top"

        [placements.article_top]
        ad_unit_path = "/2233/ledgerline/article_top"
        sizes = [[728, 90], [970, 90], "fluid"]

        [placements.sidebar]
        ad_unit_path = "/2233/ledgerline/sidebar"
        sizes = [[300, 250]]

        [modals.newsletter]
        delay_ms = 5000
        policy = "once"
    "#;

    #[test]
    fn sample_config_parses_and_resolves_placements() {
        let cfg = Config::from_toml(SAMPLE).expect("sample config is valid");

        let def = cfg.placement("article_top").expect("placement exists");
        assert_eq!(def.placement_key, "article_top");
        assert_eq!(def.ad_unit_path, "/2233/ledgerline/article_top");
        assert_eq!(
            def.sizes,
            vec![SlotSize::pixel(728, 90), SlotSize::pixel(970, 90), SlotSize::Fluid]
        );

        assert_eq!(cfg.consent.timeout_ms, 1500);
        assert_eq!(cfg.sdk.lazy_load.fetch_margin_percent, 300);
        assert_eq!(cfg.out_of_page.anchor_position, AnchorPosition::Top);
        assert!(cfg.refresh.on_visibility);
    }

    #[test]
    fn unknown_placement_is_a_config_error() {
        let cfg = Config::from_toml(SAMPLE).expect("sample config is valid");
        let err = cfg.resolve("footer").expect_err("footer is not configured");
        assert!(matches!(err, ConfigError::UnknownPlacement(key) if key == "footer"));
    }

    #[test]
    fn modals_resolve_by_id() {
        let cfg = Config::from_toml(SAMPLE).expect("sample config is valid");

        let modal = cfg.modal("newsletter").expect("modal exists");
        assert_eq!(modal.delay_ms, 5000);
        assert_eq!(modal.policy, FrequencyPolicy::Once);
        assert!(matches!(cfg.modal("promo"), Err(ConfigError::UnknownModal(_))));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = Config::from_toml("").expect("defaults are valid");
        assert!(cfg.placements.is_empty());
        assert!(cfg.sdk.single_request);
        assert_eq!(cfg.consent.timeout_ms, 1500);
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let err = Config::from_toml("[sdk\nscript_url = 1").expect_err("broken toml");
        assert!(matches!(err, ConfigError::CannotParseToml(_)));
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = Config::from_toml(SAMPLE).expect("sample config is valid");
        let rendered = Config::to_toml(&cfg).expect("render");
        let reparsed = Config::from_toml(&rendered).expect("rendered config is valid");
        assert_eq!(reparsed.placement("sidebar"), cfg.placement("sidebar"));
    }
}
