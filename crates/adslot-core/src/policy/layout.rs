use crate::domain::{ContainerLayout, CreativeBox, PixelSize, RenderEvent, SlotSize};

///
/// RenderOutcome
/// What a render-completion event means for the container.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenderOutcome {
    Collapsed,
    Fluid,
    Fixed(PixelSize),
}

impl RenderOutcome {
    /// Empty responses, missing sizes and `[0, 0]` all collapse.
    #[must_use]
    pub const fn classify(event: &RenderEvent) -> Self {
        if event.is_empty {
            return Self::Collapsed;
        }

        match event.size {
            None => Self::Collapsed,
            Some(SlotSize::Fluid) => Self::Fluid,
            Some(SlotSize::Pixel(size)) if size.is_zero() => Self::Collapsed,
            Some(SlotSize::Pixel(size)) => Self::Fixed(size),
        }
    }
}

/// Scale needed for a `served_width` creative to fit `container_width`,
/// never enlarging.
#[must_use]
pub fn fit_scale(served_width: u32, container_width: f64) -> f64 {
    if served_width == 0 {
        return 1.0;
    }

    (container_width / f64::from(served_width)).clamp(0.0, 1.0)
}

/// Container layout for a fixed creative at the given width.
///
/// Returns `None` when the width is not usable (zero, negative or NaN), e.g.
/// while a parent is collapsed; the caller keeps whatever was applied last.
#[must_use]
pub fn fit_to_width(served: PixelSize, container_width: f64) -> Option<ContainerLayout> {
    if !container_width.is_finite() || container_width <= 0.0 {
        return None;
    }

    let scale = fit_scale(served.width, container_width);

    Some(ContainerLayout {
        height: Some(scaled_height(served.height, scale)),
        overflow_hidden: true,
        creative: Some(CreativeBox {
            width: served.width,
            height: served.height,
            scale,
        }),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_height(height: u32, scale: f64) -> u32 {
    (f64::from(height) * scale).round().max(0.0) as u32
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SlotHandle;

    const MPU: PixelSize = PixelSize::new(300, 250);

    fn event(is_empty: bool, size: Option<SlotSize>) -> RenderEvent {
        RenderEvent {
            slot: SlotHandle(1),
            is_empty,
            size,
        }
    }

    #[test]
    fn half_width_container_halves_the_creative() {
        let layout = fit_to_width(MPU, 150.0).expect("usable width");
        assert_eq!(layout.height, Some(125));
        assert!(layout.overflow_hidden);

        let creative = layout.creative.expect("fixed creative box");
        assert!((creative.scale - 0.5).abs() < f64::EPSILON);
        assert_eq!((creative.width, creative.height), (300, 250));
    }

    #[test]
    fn wide_container_never_enlarges() {
        for width in [300.0, 301.0, 1_200.0] {
            let layout = fit_to_width(MPU, width).expect("usable width");
            assert_eq!(layout.height, Some(250));
            let scale = layout.creative.expect("creative").scale;
            assert!((scale - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn height_is_rounded() {
        // 250 * (100 / 300) = 83.33..
        let layout = fit_to_width(MPU, 100.0).expect("usable width");
        assert_eq!(layout.height, Some(83));

        // 90 * (500 / 728) = 61.81..
        let layout = fit_to_width(PixelSize::new(728, 90), 500.0).expect("usable width");
        assert_eq!(layout.height, Some(62));
    }

    #[test]
    fn unusable_width_yields_no_layout() {
        assert!(fit_to_width(MPU, 0.0).is_none());
        assert!(fit_to_width(MPU, -4.0).is_none());
        assert!(fit_to_width(MPU, f64::NAN).is_none());
    }

    #[test]
    fn classify_covers_every_render_shape() {
        assert_eq!(RenderOutcome::classify(&event(true, None)), RenderOutcome::Collapsed);
        assert_eq!(
            RenderOutcome::classify(&event(false, Some(SlotSize::pixel(0, 0)))),
            RenderOutcome::Collapsed
        );
        assert_eq!(RenderOutcome::classify(&event(false, None)), RenderOutcome::Collapsed);
        assert_eq!(
            RenderOutcome::classify(&event(false, Some(SlotSize::Fluid))),
            RenderOutcome::Fluid
        );
        assert_eq!(
            RenderOutcome::classify(&event(false, Some(SlotSize::Pixel(MPU)))),
            RenderOutcome::Fixed(MPU)
        );
    }
}
