//! Deterministic fakes for exercising adslot without a browser.
//!
//! Every host collaborator has a fake here: a recording ad SDK, a scriptable
//! consent platform, a virtual-clock event loop that doubles as the document,
//! in-memory flag storage and a test-driven router. [`TestEnv`] wires them
//! into a [`adslot_core::Session`].

pub mod cmp;
pub mod env;
pub mod flags;
pub mod host;
pub mod navigation;
pub mod sdk;

pub use cmp::FakeCmp;
pub use env::{TestEnv, TestEnvBuilder};
pub use flags::MemoryFlagStore;
pub use host::ManualHost;
pub use navigation::FakeNavigation;
pub use sdk::{FakeSdk, SdkCall};

use adslot_core::{AdsConfig, Config};
use std::sync::Arc;

/// Config used by most tests: two in-page placements (one with a fluid
/// size), both out-of-page kinds and two modals.
pub const STANDARD_CONFIG: &str = r#"
[sdk]
script_url = "https://ads.example.test/tag.js"

[consent]
timeout_ms = 1500

[out_of_page]
interstitial = "/2233/site/interstitial"
anchor = "/2233/site/anchor"

[placements.article_top]
ad_unit_path = "/2233/site/article_top"
sizes = [[728, 90], [970, 250], "fluid"]

[placements.sidebar]
ad_unit_path = "/2233/site/sidebar"
sizes = [[300, 250]]

[modals.newsletter]
delay_ms = 4000
policy = "once"

[modals.promo]
delay_ms = 1000
policy = "always"
"#;

///
/// Parse [`STANDARD_CONFIG`]; panics on an invalid config.
///
#[must_use]
pub fn standard_config() -> Arc<AdsConfig> {
    Config::from_toml(STANDARD_CONFIG)
        .unwrap_or_else(|err| panic!("standard test config is invalid: {err}"))
}
