use crate::host::FlagScope;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// FrequencyPolicy
/// How often an overlay may appear.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyPolicy {
    /// No suppression.
    Always,
    /// Once per browser session.
    #[default]
    Session,
    /// Once per device, forever.
    Once,
}

impl FrequencyPolicy {
    /// Where the "already shown" flag lives, if anywhere.
    #[must_use]
    pub const fn scope(self) -> Option<FlagScope> {
        match self {
            Self::Always => None,
            Self::Session => Some(FlagScope::Session),
            Self::Once => Some(FlagScope::Device),
        }
    }

    #[must_use]
    pub const fn allows(self, previously_shown: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Session | Self::Once => !previously_shown,
        }
    }
}

///
/// TESTS
///
