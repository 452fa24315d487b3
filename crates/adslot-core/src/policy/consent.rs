use crate::{domain::ConsentState, host::PrivacySettings};
use derive_more::Display;

///
/// PrivacyMode
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum PrivacyMode {
    Personalized,
    /// Non-personalized and limited ads.
    Restricted,
}

impl PrivacyMode {
    /// GDPR scope without a consent string is always restricted. Everything
    /// else, including an unknown scope, is personalized.
    #[must_use]
    pub const fn for_consent(state: &ConsentState) -> Self {
        match (state.gdpr_applies, state.has_consent_string) {
            (Some(true), false) => Self::Restricted,
            _ => Self::Personalized,
        }
    }

    #[must_use]
    pub const fn settings(self) -> PrivacySettings {
        match self {
            Self::Personalized => PrivacySettings {
                non_personalized_ads: false,
                limited_ads: false,
            },
            Self::Restricted => PrivacySettings {
                non_personalized_ads: true,
                limited_ads: true,
            },
        }
    }
}

///
/// TESTS
///
