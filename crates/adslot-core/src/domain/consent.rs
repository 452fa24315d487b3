use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// ConsentEventStatus
/// Lifecycle stage reported by the consent platform alongside its data.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize, Deserialize)]
pub enum ConsentEventStatus {
    #[default]
    Unknown,
    CmpShown,
    ConsentComplete,
    SignalLoaded,
}

///
/// ConsentState
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConsentState {
    pub gdpr_applies: Option<bool>,
    pub has_consent_string: bool,
    pub event_status: ConsentEventStatus,
}

impl ConsentState {
    /// Default when no consent platform is installed on the page:
    /// unknown status, treated as outside GDPR scope.
    #[must_use]
    pub const fn without_cmp() -> Self {
        Self {
            gdpr_applies: None,
            has_consent_string: false,
            event_status: ConsentEventStatus::Unknown,
        }
    }

    /// Default when a consent platform exists but never answered in time.
    /// Assumes GDPR applies and no consent was given.
    #[must_use]
    pub const fn fail_safe() -> Self {
        Self {
            gdpr_applies: Some(true),
            has_consent_string: false,
            event_status: ConsentEventStatus::Unknown,
        }
    }
}
