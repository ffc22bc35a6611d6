//! The record returned by every pin operation.
//!
//! A fresh record comes back from each apply-family call; a caller-held
//! record stays alive across calls and accumulates handles by merging
//! each fresh result into itself. The record holds only arena keys, so
//! keeping one around never keeps a removed view alive.

use crate::constraint::{Anchor, ConstraintId};
use crate::engine::LayoutEngine;
use crate::geometry::Size;
use crate::options::PinOptions;
use crate::tree::ViewId;

/// Eight optional constraint handles, one per relationship kind, plus
/// the source view they were created for.
///
/// A slot is `Some` only if a corresponding request was actually applied
/// in some prior call; it is never fabricated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinRecord {
    source: ViewId,
    pub top: Option<ConstraintId>,
    pub leading: Option<ConstraintId>,
    pub bottom: Option<ConstraintId>,
    pub trailing: Option<ConstraintId>,
    pub width: Option<ConstraintId>,
    pub height: Option<ConstraintId>,
    pub center_x: Option<ConstraintId>,
    pub center_y: Option<ConstraintId>,
}

impl PinRecord {
    /// An all-empty record for `source`.
    pub fn new(source: ViewId) -> Self {
        Self {
            source,
            top: None,
            leading: None,
            bottom: None,
            trailing: None,
            width: None,
            height: None,
            center_x: None,
            center_y: None,
        }
    }

    /// The view this record was built for.
    pub fn source(&self) -> ViewId {
        self.source
    }

    /// The handle in a given slot.
    pub fn get(&self, anchor: Anchor) -> Option<ConstraintId> {
        match anchor {
            Anchor::Top => self.top,
            Anchor::Leading => self.leading,
            Anchor::Bottom => self.bottom,
            Anchor::Trailing => self.trailing,
            Anchor::Width => self.width,
            Anchor::Height => self.height,
            Anchor::CenterX => self.center_x,
            Anchor::CenterY => self.center_y,
        }
    }

    pub(crate) fn set(&mut self, anchor: Anchor, id: ConstraintId) {
        match anchor {
            Anchor::Top => self.top = Some(id),
            Anchor::Leading => self.leading = Some(id),
            Anchor::Bottom => self.bottom = Some(id),
            Anchor::Trailing => self.trailing = Some(id),
            Anchor::Width => self.width = Some(id),
            Anchor::Height => self.height = Some(id),
            Anchor::CenterX => self.center_x = Some(id),
            Anchor::CenterY => self.center_y = Some(id),
        }
    }

    /// Whether every slot is empty.
    pub fn is_empty(&self) -> bool {
        Anchor::ALL.iter().all(|&a| self.get(a).is_none())
    }

    /// Merge `other` into `self`: per slot, the incoming handle wins when
    /// present and an empty incoming slot never erases an existing one.
    pub fn merge(&mut self, other: &PinRecord) {
        self.top = other.top.or(self.top);
        self.leading = other.leading.or(self.leading);
        self.bottom = other.bottom.or(self.bottom);
        self.trailing = other.trailing.or(self.trailing);
        self.width = other.width.or(self.width);
        self.height = other.height.or(self.height);
        self.center_x = other.center_x.or(self.center_x);
        self.center_y = other.center_y.or(self.center_y);
    }

    /// Chained [`LayoutEngine::apply`] against this record's source.
    pub fn apply(
        &mut self,
        engine: &mut LayoutEngine,
        reference: Option<ViewId>,
        options: PinOptions,
    ) -> &mut Self {
        let fresh = engine.apply(self.source, reference, options);
        self.merge(&fresh);
        self
    }

    /// Chained [`LayoutEngine::apply_size`].
    pub fn apply_size(&mut self, engine: &mut LayoutEngine, size: Size) -> &mut Self {
        let fresh = engine.apply_size(self.source, size);
        self.merge(&fresh);
        self
    }

    /// Chained [`LayoutEngine::apply_relative_width`].
    pub fn apply_relative_width(
        &mut self,
        engine: &mut LayoutEngine,
        reference: ViewId,
        multiplier: f64,
    ) -> &mut Self {
        let fresh = engine.apply_relative_width(self.source, reference, multiplier);
        self.merge(&fresh);
        self
    }

    /// Chained [`LayoutEngine::apply_relative_height`].
    pub fn apply_relative_height(
        &mut self,
        engine: &mut LayoutEngine,
        reference: ViewId,
        multiplier: f64,
    ) -> &mut Self {
        let fresh = engine.apply_relative_height(self.source, reference, multiplier);
        self.merge(&fresh);
        self
    }

    /// Chained [`LayoutEngine::apply_trailing`].
    pub fn apply_trailing(
        &mut self,
        engine: &mut LayoutEngine,
        other: ViewId,
        constant: f64,
    ) -> &mut Self {
        let fresh = engine.apply_trailing(self.source, other, constant);
        self.merge(&fresh);
        self
    }

    /// Chained [`LayoutEngine::apply_leading`].
    pub fn apply_leading(
        &mut self,
        engine: &mut LayoutEngine,
        other: ViewId,
        constant: f64,
    ) -> &mut Self {
        let fresh = engine.apply_leading(self.source, other, constant);
        self.merge(&fresh);
        self
    }

    /// Chained [`LayoutEngine::apply_above`].
    pub fn apply_above(
        &mut self,
        engine: &mut LayoutEngine,
        other: ViewId,
        constant: f64,
    ) -> &mut Self {
        let fresh = engine.apply_above(self.source, other, constant);
        self.merge(&fresh);
        self
    }

    /// Chained [`LayoutEngine::apply_below`].
    pub fn apply_below(
        &mut self,
        engine: &mut LayoutEngine,
        other: ViewId,
        constant: f64,
    ) -> &mut Self {
        let fresh = engine.apply_below(self.source, other, constant);
        self.merge(&fresh);
        self
    }
}
