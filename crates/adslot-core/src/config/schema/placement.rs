use super::{ConfigSchemaError, Validate};
use crate::domain::{AnchorPosition, OutOfPageKind, SlotSize};
use serde::{Deserialize, Serialize};

fn validate_ad_unit_path(path: &str, context: &str) -> Result<(), ConfigSchemaError> {
    if !path.starts_with('/') || path.len() < 2 {
        return Err(ConfigSchemaError::ValidationError(format!(
            "{context} ad unit path '{path}' must start with '/' and name a unit",
        )));
    }

    if path.chars().any(char::is_whitespace) {
        return Err(ConfigSchemaError::ValidationError(format!(
            "{context} ad unit path '{path}' must not contain whitespace",
        )));
    }

    Ok(())
}

///
/// PlacementConfig
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlacementConfig {
    pub ad_unit_path: String,
    pub sizes: Vec<SlotSize>,
}

impl Validate for PlacementConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        validate_ad_unit_path(&self.ad_unit_path, "placement")?;

        if self.sizes.is_empty() {
            return Err(ConfigSchemaError::ValidationError(
                "size list must not be empty".to_string(),
            ));
        }

        for size in &self.sizes {
            if let SlotSize::Pixel(pixel) = size
                && pixel.is_zero()
            {
                return Err(ConfigSchemaError::ValidationError(format!(
                    "size {pixel} has a zero dimension",
                )));
            }
        }

        Ok(())
    }
}

///
/// OutOfPageConfig
/// Ad-unit paths for session singletons; an absent path disables the kind.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutOfPageConfig {
    #[serde(default)]
    pub interstitial: Option<String>,

    #[serde(default)]
    pub anchor: Option<String>,

    #[serde(default)]
    pub anchor_position: AnchorPosition,
}

impl OutOfPageConfig {
    #[must_use]
    pub fn ad_unit_path(&self, kind: OutOfPageKind) -> Option<&str> {
        match kind {
            OutOfPageKind::Anchor => self.anchor.as_deref(),
            OutOfPageKind::Interstitial => self.interstitial.as_deref(),
        }
    }
}

impl Validate for OutOfPageConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if let Some(path) = &self.interstitial {
            validate_ad_unit_path(path, "out_of_page.interstitial")?;
        }
        if let Some(path) = &self.anchor {
            validate_ad_unit_path(path, "out_of_page.anchor")?;
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimension_sizes_are_rejected() {
        let cfg = PlacementConfig {
            ad_unit_path: "/2233/ledgerline/sidebar".to_string(),
            sizes: vec![SlotSize::pixel(300, 0)],
        };

        let err = cfg.validate().expect_err("zero height");
        assert!(err.to_string().contains("300x0"));
    }

    #[test]
    fn fluid_only_placement_is_valid() {
        let cfg = PlacementConfig {
            ad_unit_path: "/2233/ledgerline/native".to_string(),
            sizes: vec![SlotSize::Fluid],
        };

        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn ad_unit_path_must_be_rooted() {
        let cfg = OutOfPageConfig {
            interstitial: Some("ledgerline/interstitial".to_string()),
            ..OutOfPageConfig::default()
        };

        assert!(cfg.validate().is_err());
    }
}
