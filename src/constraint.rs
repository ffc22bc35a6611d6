//! Constraint handles: the eight relationship kinds and the data the
//! engine keeps for each created constraint.

use std::fmt;

use slotmap::new_key_type;

use crate::tree::ViewId;

/// The eight relationship kinds a pin call can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Top,
    Leading,
    Bottom,
    Trailing,
    Width,
    Height,
    CenterX,
    CenterY,
}

impl Anchor {
    /// All anchors, in record-slot order.
    pub const ALL: [Anchor; 8] = [
        Anchor::Top,
        Anchor::Leading,
        Anchor::Bottom,
        Anchor::Trailing,
        Anchor::Width,
        Anchor::Height,
        Anchor::CenterX,
        Anchor::CenterY,
    ];

    /// Name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Anchor::Top => "top",
            Anchor::Leading => "leading",
            Anchor::Bottom => "bottom",
            Anchor::Trailing => "trailing",
            Anchor::Width => "width",
            Anchor::Height => "height",
            Anchor::CenterX => "center_x",
            Anchor::CenterY => "center_y",
        }
    }
}

new_key_type! {
    /// Stable identity of one created constraint. Re-synchronizing the
    /// constant rebuilds the solver-side constraint under the same id.
    pub struct ConstraintId;
}

/// Engine-owned payload behind a [`ConstraintId`].
///
/// `reference` is `None` for self-relative dimension constraints
/// (`width == c`, `height == c`). For adjacency pins `reference_anchor`
/// differs from `anchor` (e.g. source trailing against the other view's
/// leading).
pub struct PinConstraint {
    pub source: ViewId,
    pub reference: Option<ViewId>,
    pub anchor: Anchor,
    pub reference_anchor: Option<Anchor>,
    pub constant: f64,
    pub multiplier: f64,
    pub active: bool,
    /// The solver-side constraint currently installed for this handle.
    pub(crate) raw: kasuari::Constraint,
}

impl fmt::Debug for PinConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinConstraint")
            .field("source", &self.source)
            .field("reference", &self.reference)
            .field("anchor", &self.anchor)
            .field("reference_anchor", &self.reference_anchor)
            .field("constant", &self.constant)
            .field("multiplier", &self.multiplier)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
