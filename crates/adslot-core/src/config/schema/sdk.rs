use super::{ConfigSchemaError, Validate};
use serde::{Deserialize, Serialize};

///
/// Defaults
///

mod defaults {
    pub fn script_url() -> String {
        "https://securepubads.g.doubleclick.net/tag/js/gpt.js".to_string()
    }

    pub const fn enabled() -> bool {
        true
    }

    pub const fn fetch_margin_percent() -> u32 {
        200
    }

    pub const fn render_margin_percent() -> u32 {
        100
    }

    pub const fn mobile_scaling() -> f64 {
        2.0
    }

    pub const fn consent_timeout_ms() -> u64 {
        1_500
    }
}

pub const MAX_CONSENT_TIMEOUT_MS: u64 = 30_000;
pub const MAX_MARGIN_PERCENT: u32 = 10_000;

///
/// SdkConfig
/// Global rendering policy applied once at bootstrap.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SdkConfig {
    #[serde(default = "defaults::script_url")]
    pub script_url: String,

    #[serde(default = "defaults::enabled")]
    pub single_request: bool,

    #[serde(default = "defaults::enabled")]
    pub center_slots: bool,

    #[serde(default)]
    pub lazy_load: LazyLoadConfig,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            script_url: defaults::script_url(),
            single_request: true,
            center_slots: true,
            lazy_load: LazyLoadConfig::default(),
        }
    }
}

impl Validate for SdkConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        let url = self.script_url.trim();
        if url.is_empty() {
            return Err(ConfigSchemaError::ValidationError(
                "sdk.script_url must not be empty".to_string(),
            ));
        }
        if !url.starts_with("https://") && !url.starts_with("//") {
            return Err(ConfigSchemaError::ValidationError(format!(
                "sdk.script_url '{url}' must be https or protocol-relative",
            )));
        }

        self.lazy_load.validate()
    }
}

///
/// LazyLoadConfig
/// Viewport margins (percent of viewport height) for fetching and rendering.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LazyLoadConfig {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    #[serde(default = "defaults::fetch_margin_percent")]
    pub fetch_margin_percent: u32,

    #[serde(default = "defaults::render_margin_percent")]
    pub render_margin_percent: u32,

    #[serde(default = "defaults::mobile_scaling")]
    pub mobile_scaling: f64,
}

impl Default for LazyLoadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fetch_margin_percent: defaults::fetch_margin_percent(),
            render_margin_percent: defaults::render_margin_percent(),
            mobile_scaling: defaults::mobile_scaling(),
        }
    }
}

impl Validate for LazyLoadConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.fetch_margin_percent > MAX_MARGIN_PERCENT {
            return Err(ConfigSchemaError::ValidationError(format!(
                "sdk.lazy_load.fetch_margin_percent {} exceeds max {MAX_MARGIN_PERCENT}",
                self.fetch_margin_percent
            )));
        }

        // a creative cannot render before it has been fetched
        if self.render_margin_percent > self.fetch_margin_percent {
            return Err(ConfigSchemaError::ValidationError(format!(
                "sdk.lazy_load.render_margin_percent {} exceeds fetch_margin_percent {}",
                self.render_margin_percent, self.fetch_margin_percent
            )));
        }

        if !self.mobile_scaling.is_finite() || self.mobile_scaling <= 0.0 {
            return Err(ConfigSchemaError::ValidationError(format!(
                "sdk.lazy_load.mobile_scaling must be positive, got {}",
                self.mobile_scaling
            )));
        }

        Ok(())
    }
}

///
/// ConsentConfig
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConsentConfig {
    /// Upper bound on how long bootstrap waits for the first consent signal.
    #[serde(default = "defaults::consent_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            timeout_ms: defaults::consent_timeout_ms(),
        }
    }
}

impl Validate for ConsentConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.timeout_ms == 0 || self.timeout_ms > MAX_CONSENT_TIMEOUT_MS {
            return Err(ConfigSchemaError::ValidationError(format!(
                "consent.timeout_ms must be 1..={MAX_CONSENT_TIMEOUT_MS}, got {}",
                self.timeout_ms
            )));
        }

        Ok(())
    }
}

///
/// RefreshConfig
/// Platform events that trigger a soft refresh besides route changes.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshConfig {
    #[serde(default = "defaults::enabled")]
    pub on_visibility: bool,

    #[serde(default = "defaults::enabled")]
    pub on_pageshow: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            on_visibility: true,
            on_pageshow: true,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_margin_cannot_exceed_fetch_margin() {
        let cfg = LazyLoadConfig {
            fetch_margin_percent: 100,
            render_margin_percent: 200,
            ..LazyLoadConfig::default()
        };

        assert!(cfg.validate().is_err());
    }

    #[test]
    fn mobile_scaling_must_be_positive() {
        let cfg = LazyLoadConfig {
            mobile_scaling: 0.0,
            ..LazyLoadConfig::default()
        };

        assert!(cfg.validate().is_err());
    }

    #[test]
    fn consent_timeout_is_bounded() {
        assert!(ConsentConfig { timeout_ms: 0 }.validate().is_err());
        assert!(
            ConsentConfig {
                timeout_ms: MAX_CONSENT_TIMEOUT_MS + 1
            }
            .validate()
            .is_err()
        );
        assert!(ConsentConfig::default().validate().is_ok());
    }

    #[test]
    fn script_url_must_be_secure() {
        let cfg = SdkConfig {
            script_url: "http://ads.example.test/tag.js".to_string(),
            ..SdkConfig::default()
        };

        assert!(cfg.validate().is_err());
    }
}
