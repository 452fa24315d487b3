//! In-page slot controller.
//!
//! One controller per rendered placement. Its lifecycle is
//!
//! ```text
//! Unmounted → Defined → (RenderedFluid | RenderedFixed | Collapsed) → Destroyed
//! ```
//!
//! A rendered slot may render again (refresh), so the three rendered states
//! transition among themselves until the controller is dropped.

use crate::{
    Error, ErrorOrigin,
    domain::{ContainerLayout, PixelSize, RenderEvent, SlotDefinition, SlotHandle, SlotSize},
    host::{Document, ListenerId, ObserverId},
    log,
    log::Topic,
    model::MetricKind,
    policy::layout::{RenderOutcome, fit_to_width},
    session::{Session, WeakSession},
};
use derive_more::Display;
use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

///
/// SlotPhase
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum SlotPhase {
    Unmounted,
    #[display("defined({_0})")]
    Defined(SlotHandle),
    #[display("rendered-fluid({_0})")]
    RenderedFluid(SlotHandle),
    #[display("rendered-fixed({handle}, {size})")]
    RenderedFixed { handle: SlotHandle, size: PixelSize },
    #[display("collapsed({_0})")]
    Collapsed(SlotHandle),
    Destroyed,
}

impl SlotPhase {
    /// The live handle, for every phase that has one.
    #[must_use]
    pub const fn handle(self) -> Option<SlotHandle> {
        match self {
            Self::Defined(handle)
            | Self::RenderedFluid(handle)
            | Self::RenderedFixed { handle, .. }
            | Self::Collapsed(handle) => Some(handle),
            Self::Unmounted | Self::Destroyed => None,
        }
    }

    /// Size the SDK served, cleared for every non-rendered phase.
    #[must_use]
    pub const fn served_size(self) -> Option<SlotSize> {
        match self {
            Self::RenderedFluid(_) => Some(SlotSize::Fluid),
            Self::RenderedFixed { size, .. } => Some(SlotSize::Pixel(size)),
            _ => None,
        }
    }
}

///
/// SlotCell
/// State shared between the controller and its host callbacks.
///

struct SlotCell {
    container_id: String,
    phase: SlotPhase,
    width: Option<f64>,
    layout: Option<ContainerLayout>,
}

impl SlotCell {
    fn apply(&mut self, document: &dyn Document, layout: ContainerLayout) {
        if self.layout == Some(layout) {
            return;
        }

        document.apply_layout(&self.container_id, &layout);
        self.layout = Some(layout);
    }
}

///
/// SlotController
///
/// Owns one in-page slot from mount to drop. Dropping the controller is the
/// unmount: it detaches the width observer and the render listener and asks
/// the registry to destroy the slot, without waiting for any in-flight render.
///

pub struct SlotController {
    session: Session,
    definition: SlotDefinition,
    cell: Rc<RefCell<SlotCell>>,
    observer: Option<ObserverId>,
    render_listener: Rc<Cell<Option<ListenerId>>>,
}

impl SlotController {
    /// Resolve `placement_key`, start observing the container and queue the
    /// slot definition. Boots the SDK if nothing else has yet.
    pub fn mount(
        session: &Session,
        placement_key: &str,
        container_id: impl Into<String>,
    ) -> Result<Self, Error> {
        let container_id = container_id.into();
        if container_id.trim().is_empty() {
            return Err(Error::domain(
                ErrorOrigin::Workflow,
                format!("placement '{placement_key}' mounted without a container id"),
            ));
        }

        let definition = session.config().resolve(placement_key)?;
        session.boot_once();

        let document = Rc::clone(&session.host().document);
        let cell = Rc::new(RefCell::new(SlotCell {
            container_id: container_id.clone(),
            phase: SlotPhase::Unmounted,
            width: document.container_width(&container_id),
            layout: None,
        }));

        let observer = {
            let cell = Rc::downgrade(&cell);
            let weak_doc = Rc::downgrade(&document);
            document.observe_width(
                &container_id,
                Rc::new(move |width| Self::on_width(&weak_doc, &cell, width)),
            )
        };

        let controller = Self {
            session: session.clone(),
            definition,
            cell,
            observer: Some(observer),
            render_listener: Rc::new(Cell::new(None)),
        };
        controller.queue_define();

        log!(
            Topic::Slot,
            Debug,
            "mounted '{}' in '{container_id}'",
            controller.definition.placement_key
        );

        Ok(controller)
    }

    //
    // Accessors
    //

    #[must_use]
    pub fn phase(&self) -> SlotPhase {
        self.cell.borrow().phase
    }

    #[must_use]
    pub fn container_id(&self) -> String {
        self.cell.borrow().container_id.clone()
    }

    #[must_use]
    pub const fn definition(&self) -> &SlotDefinition {
        &self.definition
    }

    /// Layout most recently forced onto the container.
    #[must_use]
    pub fn layout(&self) -> Option<ContainerLayout> {
        self.cell.borrow().layout
    }

    #[must_use]
    pub fn served_size(&self) -> Option<SlotSize> {
        self.phase().served_size()
    }

    //
    // Definition
    //

    fn queue_define(&self) {
        let weak_session = self.session.downgrade();
        let cell = Rc::clone(&self.cell);
        let definition = self.definition.clone();
        let listener_slot = Rc::clone(&self.render_listener);
        let weak_doc = Rc::downgrade(&self.session.host().document);

        self.session
            .queue()
            .push("slot:define", move |sdk| {
                let Some(session) = weak_session.upgrade() else {
                    return Ok(());
                };

                let container_id = {
                    let cell = cell.borrow();
                    if cell.phase == SlotPhase::Destroyed {
                        // unmounted before the queue opened
                        return Ok(());
                    }
                    cell.container_id.clone()
                };

                // listen before define so no render can slip past
                let listener = {
                    let cell = Rc::downgrade(&cell);
                    let weak_session = session.downgrade();
                    sdk.add_render_listener(Rc::new(move |event: &RenderEvent| {
                        Self::on_render(&weak_session, &weak_doc, &cell, event);
                    }))
                };
                listener_slot.set(Some(listener));

                let outcome = session
                    .registry_mut()
                    .define(sdk, &container_id, &definition);

                match outcome {
                    Ok(outcome) => {
                        if outcome.replaced.is_some() {
                            session.metrics().increment(MetricKind::SlotDestroyed);
                        }
                        session.metrics().increment(MetricKind::SlotDefined);

                        // the sdk may deliver the first render from inside
                        // `display`, so the handle has to be published first
                        let handle = outcome.instance.handle;
                        cell.borrow_mut().phase = SlotPhase::Defined(handle);

                        match sdk.display(handle) {
                            Ok(()) => {
                                session.registry_mut().mark_displayed(handle);
                                session.metrics().increment(MetricKind::SlotDisplayed);
                            }
                            Err(err) => log!(
                                Topic::Slot,
                                Warn,
                                "display failed for '{container_id}' ({handle}): {err}"
                            ),
                        }

                        Ok(())
                    }
                    Err(err) => {
                        sdk.remove_render_listener(listener);
                        listener_slot.set(None);

                        Err(err.into())
                    }
                }
            });
    }

    //
    // Host callbacks
    //

    fn on_render(
        session: &WeakSession,
        document: &Weak<dyn Document>,
        cell: &Weak<RefCell<SlotCell>>,
        event: &RenderEvent,
    ) {
        let (Some(session), Some(document), Some(cell)) =
            (session.upgrade(), document.upgrade(), cell.upgrade())
        else {
            return;
        };
        let mut cell = cell.borrow_mut();

        // many slots render concurrently; only our own handle counts
        let Some(handle) = cell.phase.handle() else {
            return;
        };
        if event.slot != handle {
            return;
        }

        let (phase, layout) = match RenderOutcome::classify(event) {
            RenderOutcome::Collapsed => {
                (SlotPhase::Collapsed(handle), ContainerLayout::collapsed())
            }
            RenderOutcome::Fluid => (SlotPhase::RenderedFluid(handle), ContainerLayout::cleared()),
            RenderOutcome::Fixed(size) => {
                let width = cell
                    .width
                    .filter(|w| *w > 0.0)
                    .or_else(|| document.container_width(&cell.container_id));
                let layout = width
                    .and_then(|w| fit_to_width(size, w))
                    .or_else(|| fit_to_width(size, f64::from(size.width)))
                    .unwrap_or_else(ContainerLayout::cleared);

                (SlotPhase::RenderedFixed { handle, size }, layout)
            }
        };

        cell.phase = phase;
        cell.apply(&*document, layout);
        session.registry_mut().record_served(handle, phase.served_size());

        log!(Topic::Slot, Debug, "'{}' {phase}", cell.container_id);
    }

    fn on_width(document: &Weak<dyn Document>, cell: &Weak<RefCell<SlotCell>>, width: f64) {
        let (Some(document), Some(cell)) = (document.upgrade(), cell.upgrade()) else {
            return;
        };
        let mut cell = cell.borrow_mut();
        cell.width = Some(width);

        let SlotPhase::RenderedFixed { size, .. } = cell.phase else {
            return;
        };

        // an unusable width (collapsed parent) keeps the last scale
        if let Some(layout) = fit_to_width(size, width) {
            cell.apply(&*document, layout);
        }
    }
}

impl Drop for SlotController {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.take() {
            self.session.host().document.unobserve_width(observer);
        }

        let (previous, container_id) = {
            let mut cell = self.cell.borrow_mut();
            let previous = std::mem::replace(&mut cell.phase, SlotPhase::Destroyed);
            (previous, cell.container_id.clone())
        };

        log!(Topic::Slot, Debug, "unmounted '{container_id}'");

        let weak_session = self.session.downgrade();
        let listener_slot = Rc::clone(&self.render_listener);

        self.session
            .queue()
            .push("slot:destroy", move |sdk| {
                if let Some(listener) = listener_slot.take() {
                    sdk.remove_render_listener(listener);
                }

                let Some(session) = weak_session.upgrade() else {
                    return Ok(());
                };

                // no handle at unmount means the define command had not run
                // yet; it saw `Destroyed` and skipped itself
                let Some(handle) = previous.handle() else {
                    return Ok(());
                };

                if session.registry_mut().release(sdk, &container_id, handle) {
                    session.metrics().increment(MetricKind::SlotDestroyed);
                }

                Ok(())
            });
    }
}
