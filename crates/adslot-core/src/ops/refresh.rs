use crate::{
    Error,
    domain::{SlotHandle, SlotInfo},
    host::AdSdk,
    log,
    log::Topic,
    model::{MetricKind, Metrics},
};

///
/// RefreshOps
///
/// Soft refresh of in-page slots. Out-of-page slots (interstitial, anchor)
/// carry no container identity and cannot be safely re-rendered, so they are
/// filtered out before anything reaches the SDK.
///

pub struct RefreshOps;

impl RefreshOps {
    /// Handles of every slot bound to a container.
    #[must_use]
    pub fn in_page_targets(slots: &[SlotInfo]) -> Vec<SlotHandle> {
        slots
            .iter()
            .filter(|slot| slot.container_id.is_some())
            .map(|slot| slot.handle)
            .collect()
    }

    /// Issue one batched refresh for all in-page slots.
    /// Returns how many slots were targeted; zero means nothing was sent.
    pub fn refresh_in_page(
        sdk: &dyn AdSdk,
        metrics: &Metrics,
        reason: &str,
    ) -> Result<usize, Error> {
        let targets = Self::in_page_targets(&sdk.slots());

        if targets.is_empty() {
            log!(Topic::Refresh, Debug, "{reason}: no in-page slots to refresh");
            return Ok(0);
        }

        sdk.refresh(&targets)?;
        metrics.increment(MetricKind::RefreshIssued);
        log!(
            Topic::Refresh,
            Info,
            "{reason}: refreshed {} in-page slot(s)",
            targets.len()
        );

        Ok(targets.len())
    }
}

///
/// TESTS
///
