///
/// CreativeBox
/// Inner creative box: native size plus a top-left-origin scale transform.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreativeBox {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

///
/// ContainerLayout
///
/// Styles forced onto an in-page slot container. `None` fields mean "leave
/// it to the SDK/stylesheet".
///

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContainerLayout {
    pub height: Option<u32>,
    pub overflow_hidden: bool,
    pub creative: Option<CreativeBox>,
}

impl ContainerLayout {
    /// No forced width, height or transform.
    #[must_use]
    pub const fn cleared() -> Self {
        Self {
            height: None,
            overflow_hidden: false,
            creative: None,
        }
    }

    /// Zero height with hidden overflow, used when nothing was served.
    #[must_use]
    pub const fn collapsed() -> Self {
        Self {
            height: Some(0),
            overflow_hidden: true,
            creative: None,
        }
    }
}
