use crate::{FakeCmp, FakeNavigation, FakeSdk, ManualHost, MemoryFlagStore};
use adslot_core::{
    AdsConfig, Session,
    host::{ConsentPlatform, Host},
};
use derive_more::Deref;
use std::{rc::Rc, sync::Arc};

///
/// TestEnvBuilder
///

pub struct TestEnvBuilder {
    config: Arc<AdsConfig>,
    cmp: Option<FakeCmp>,
    flags: Option<Rc<MemoryFlagStore>>,
    location: (String, String),
    script_present: bool,
}

impl TestEnvBuilder {
    /// Install a consent platform; without one the page has none.
    #[must_use]
    pub fn with_cmp(mut self, cmp: FakeCmp) -> Self {
        self.cmp = Some(cmp);
        self
    }

    /// Share flag storage with an earlier environment (a reload).
    #[must_use]
    pub fn with_flags(mut self, flags: Rc<MemoryFlagStore>) -> Self {
        self.flags = Some(flags);
        self
    }

    #[must_use]
    pub fn at(mut self, path: &str, query: &str) -> Self {
        self.location = (path.to_string(), query.to_string());
        self
    }

    /// Pretend the ad script tag is already in the page.
    #[must_use]
    pub const fn with_script_present(mut self) -> Self {
        self.script_present = true;
        self
    }

    #[must_use]
    pub fn build(self) -> TestEnv {
        let host = Rc::new(ManualHost::new());
        if self.script_present {
            host.preload_script(&self.config.sdk.script_url);
        }

        let sdk = Rc::new(FakeSdk::new());
        let cmp = self.cmp.map(Rc::new);
        let flags = self.flags.unwrap_or_default();
        let navigation = Rc::new(FakeNavigation::at(&self.location.0, &self.location.1));

        let session = Session::new(
            self.config,
            Host {
                scheduler: host.clone(),
                document: host.clone(),
                sdk: sdk.clone(),
                cmp: cmp.clone().map(|cmp| -> Rc<dyn ConsentPlatform> { cmp }),
                flags: flags.clone(),
                navigation: navigation.clone(),
            },
        );

        TestEnv {
            session,
            host,
            sdk,
            cmp,
            flags,
            navigation,
        }
    }
}

///
/// TestEnv
///
/// A session wired to fakes, with typed handles on every fake so tests can
/// drive and inspect them. Derefs to the [`Session`].
///

#[derive(Deref)]
pub struct TestEnv {
    #[deref]
    pub session: Session,
    pub host: Rc<ManualHost>,
    pub sdk: Rc<FakeSdk>,
    pub cmp: Option<Rc<FakeCmp>>,
    pub flags: Rc<MemoryFlagStore>,
    pub navigation: Rc<FakeNavigation>,
}

impl TestEnv {
    #[must_use]
    pub fn builder(config: Arc<AdsConfig>) -> TestEnvBuilder {
        TestEnvBuilder {
            config,
            cmp: None,
            flags: None,
            location: ("/".to_string(), String::new()),
            script_present: false,
        }
    }

    /// Boot with no consent platform and a script that loads immediately,
    /// leaving the command queue open.
    #[must_use]
    pub fn booted(config: Arc<AdsConfig>) -> Self {
        let env = Self::builder(config).build();
        env.boot_to_ready();
        env
    }

    /// Start the boot, finish the script load and run what is runnable.
    /// A silent consent platform still needs the clock advanced.
    pub fn boot_to_ready(&self) {
        self.session.boot_once();
        self.host.run_until_stalled();
        self.host.load_scripts();
        self.host.settle();
    }

    #[must_use]
    pub fn cmp(&self) -> &FakeCmp {
        self.cmp
            .as_deref()
            .unwrap_or_else(|| panic!("test env was built without a consent platform"))
    }
}
