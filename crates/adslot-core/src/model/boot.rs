use crate::domain::OutOfPageKind;

///
/// OutOfPageState
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OutOfPageState {
    pub interstitial_shown: bool,
    pub anchor_shown: bool,
}

impl OutOfPageState {
    #[must_use]
    pub const fn is_shown(&self, kind: OutOfPageKind) -> bool {
        match kind {
            OutOfPageKind::Anchor => self.anchor_shown,
            OutOfPageKind::Interstitial => self.interstitial_shown,
        }
    }

    const fn flag_mut(&mut self, kind: OutOfPageKind) -> &mut bool {
        match kind {
            OutOfPageKind::Anchor => &mut self.anchor_shown,
            OutOfPageKind::Interstitial => &mut self.interstitial_shown,
        }
    }
}

///
/// BootState
///
/// Session-wide bootstrap bookkeeping.
///
/// Semantics:
/// - Starts unbooted with no out-of-page singleton shown.
/// - `booted` and every out-of-page flag transition false → true at most
///   once and never go back within the same session.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BootState {
    booted: bool,
    out_of_page: OutOfPageState,
}

impl BootState {
    #[must_use]
    pub const fn is_booted(&self) -> bool {
        self.booted
    }

    #[must_use]
    pub const fn out_of_page(&self) -> OutOfPageState {
        self.out_of_page
    }

    /// Claim the one-time boot. Returns true for the first caller only.
    pub const fn begin_boot(&mut self) -> bool {
        if self.booted {
            return false;
        }

        self.booted = true;
        true
    }

    /// Claim an out-of-page singleton. Returns true for the first caller only.
    pub const fn claim_out_of_page(&mut self, kind: OutOfPageKind) -> bool {
        let flag = self.out_of_page.flag_mut(kind);
        if *flag {
            return false;
        }

        *flag = true;
        true
    }
}

///
/// TESTS
///
