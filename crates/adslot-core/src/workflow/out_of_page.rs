use crate::{
    domain::{OutOfPageFormat, OutOfPageKind},
    log,
    log::Topic,
    model::MetricKind,
    session::Session,
};

///
/// OutOfPageController
///
/// Session singletons that are not bound to a container (interstitial,
/// anchor). Each kind is defined and displayed at most once per session, no
/// matter how many times the owning component mounts across navigations.
///

pub struct OutOfPageController {
    session: Session,
}

impl OutOfPageController {
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
        }
    }

    /// Define and display `kind` unless this session already did.
    /// Returns true when a definition was queued by this call.
    pub fn ensure_defined(&self, kind: OutOfPageKind) -> bool {
        let config = &self.session.config().out_of_page;
        let Some(ad_unit_path) = config.ad_unit_path(kind).map(str::to_string) else {
            log!(Topic::OutOfPage, Debug, "{kind} has no ad unit configured");
            return false;
        };

        if !self.session.boot_mut().claim_out_of_page(kind) {
            return false;
        }

        let format = match kind {
            OutOfPageKind::Anchor => OutOfPageFormat::Anchor(config.anchor_position),
            OutOfPageKind::Interstitial => OutOfPageFormat::Interstitial,
        };

        self.session.boot_once();

        let weak = self.session.downgrade();
        self.session
            .queue()
            .push(format!("out_of_page:{kind}"), move |sdk| {
                let Some(session) = weak.upgrade() else {
                    return Ok(());
                };

                // the flag stays claimed either way: a declined or failed
                // singleton is not retried on the next route
                let Some(handle) = sdk.define_out_of_page_slot(&ad_unit_path, format)? else {
                    session.metrics().increment(MetricKind::OutOfPageDeclined);
                    log!(Topic::OutOfPage, Info, "sdk declined {format} on this page");
                    return Ok(());
                };

                if let Err(err) = sdk.add_service(handle) {
                    // an unattached slot can never display; do not leave it live
                    if let Err(destroy) = sdk.destroy_slots(&[handle]) {
                        log!(Topic::OutOfPage, Warn, "destroy of {handle} failed: {destroy}");
                    }
                    return Err(err.into());
                }

                session.record_out_of_page(kind, handle);
                sdk.display(handle)?;
                session.metrics().increment(MetricKind::OutOfPageDisplayed);
                log!(Topic::OutOfPage, Ok, "displayed {format} as {handle}");

                Ok(())
            });

        true
    }
}
