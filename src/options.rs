//! The request bundle accepted by [`LayoutEngine::apply`].
//!
//! [`LayoutEngine::apply`]: crate::LayoutEngine::apply

/// Up to eight independent pin requests: four edge offsets, two
/// self-relative dimension constants, two center-alignment flags.
///
/// `Default` is all-empty; an empty bundle still disables the source
/// view's frame translation but creates no constraints.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PinOptions {
    pub top: Option<f64>,
    pub leading: Option<f64>,
    pub bottom: Option<f64>,
    pub trailing: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub center_x: bool,
    pub center_y: bool,
}

impl PinOptions {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the top edge at the given offset from the reference's top.
    pub fn top(mut self, offset: f64) -> Self {
        self.top = Some(offset);
        self
    }

    /// Pin the leading edge at the given offset from the reference's leading.
    pub fn leading(mut self, offset: f64) -> Self {
        self.leading = Some(offset);
        self
    }

    /// Pin the bottom edge at the given offset from the reference's bottom.
    pub fn bottom(mut self, offset: f64) -> Self {
        self.bottom = Some(offset);
        self
    }

    /// Pin the trailing edge at the given offset from the reference's trailing.
    pub fn trailing(mut self, offset: f64) -> Self {
        self.trailing = Some(offset);
        self
    }

    /// Fix the view's own width to a constant.
    pub fn width(mut self, value: f64) -> Self {
        self.width = Some(value);
        self
    }

    /// Fix the view's own height to a constant.
    pub fn height(mut self, value: f64) -> Self {
        self.height = Some(value);
        self
    }

    /// Align horizontal centers with the reference.
    pub fn center_x(mut self) -> Self {
        self.center_x = true;
        self
    }

    /// Align vertical centers with the reference.
    pub fn center_y(mut self) -> Self {
        self.center_y = true;
        self
    }

    /// Whether any request in this bundle relates to a reference view.
    /// Width and height constants are self-relative and need none.
    pub fn needs_reference(&self) -> bool {
        self.top.is_some()
            || self.leading.is_some()
            || self.bottom.is_some()
            || self.trailing.is_some()
            || self.center_x
            || self.center_y
    }

    /// Whether the bundle contains no requests at all.
    pub fn is_empty(&self) -> bool {
        !self.needs_reference() && self.width.is_none() && self.height.is_none()
    }
}
