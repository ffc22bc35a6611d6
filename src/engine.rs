//! The constraint applier.
//!
//! `LayoutEngine` owns the view arena, the solver, and the constraint
//! registry. Every apply-family operation resolves the effective
//! reference view, installs required constraints, disables the source
//! view's frame translation, and returns a fresh [`PinRecord`].
//!
//! Apply-family calls never fail: a detached view or an unresolvable
//! reference degrades to an empty record with a `tracing` diagnostic.
//! The strict surface (`layout`, `set_constant`, `set_active`,
//! `set_frame`) returns [`LayoutError`] instead.

use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::constraint::{Anchor, ConstraintId, PinConstraint};
use crate::error::LayoutError;
use crate::geometry::{Rect, Size};
use crate::options::PinOptions;
use crate::record::PinRecord;
use crate::solver::{HoldStrength, PinSolver, SolverError, VarKind};
use crate::tree::{View, ViewId, ViewTree};

/// Horizontal resolution of the leading/trailing anchors.
///
/// Constraints capture the direction in force when they are built; the
/// direction is fixed per engine at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Configuration options for a [`LayoutEngine`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub direction: LayoutDirection,
}

impl EngineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout direction.
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }
}

/// The applier plus its host seam: view arena, solver, constraint
/// registry, and the per-(view, anchor) table used to supersede
/// overlapping constraints.
pub struct LayoutEngine {
    tree: ViewTree,
    solver: PinSolver,
    constraints: SlotMap<ConstraintId, PinConstraint>,
    /// Active constraint per (source, anchor). Re-pinning a slot
    /// deactivates the entry before installing the replacement.
    current: HashMap<(ViewId, Anchor), ConstraintId>,
    /// Views that have carried at least one constraint as the source.
    /// A view referenced by pins but never pinned itself keeps a firmer
    /// frame hold, so it anchors the views constrained against it.
    pinned_sources: HashSet<ViewId>,
    config: EngineConfig,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            tree: ViewTree::new(),
            solver: PinSolver::new(),
            constraints: SlotMap::with_key(),
            current: HashMap::new(),
            pinned_sources: HashSet::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // View management
    // ------------------------------------------------------------------

    /// Insert a parentless view.
    pub fn add_view(&mut self, view: View) -> ViewId {
        self.tree.insert(view)
    }

    /// Insert a view as a child of `parent`.
    pub fn add_child(&mut self, parent: ViewId, view: View) -> ViewId {
        self.tree.insert_child(parent, view)
    }

    /// Remove a view and its whole subtree, deactivating every
    /// constraint that mentions a removed view. Handles held by callers
    /// stay readable with `active == false`.
    pub fn remove_view(&mut self, id: ViewId) -> Vec<ViewId> {
        let removed = self.tree.remove(id);
        if removed.is_empty() {
            return removed;
        }
        let victims: Vec<ConstraintId> = self
            .constraints
            .iter()
            .filter(|(_, c)| {
                c.active
                    && (removed.contains(&c.source)
                        || c.reference.is_some_and(|r| removed.contains(&r)))
            })
            .map(|(id, _)| id)
            .collect();
        for victim in victims {
            self.deactivate(victim);
        }
        self.current.retain(|&(view, _), _| !removed.contains(&view));
        self.pinned_sources.retain(|view| !removed.contains(view));
        removed
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.tree.get(id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.tree.get_mut(id)
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.tree.parent(id)
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.tree.children(id)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.tree.contains(id)
    }

    /// A view's current frame.
    pub fn frame(&self, id: ViewId) -> Option<Rect> {
        self.tree.get(id).map(|view| view.frame)
    }

    /// Replace a view's frame. The new frame feeds the next layout pass
    /// as a suggestion (strong while the view translates its frame).
    pub fn set_frame(&mut self, id: ViewId, frame: Rect) -> Result<(), LayoutError> {
        let view = self.tree.get_mut(id).ok_or(LayoutError::detached(id))?;
        view.frame = frame;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Apply-family operations
    // ------------------------------------------------------------------

    /// Pin any subset of the eight relationships of `source` against a
    /// reference view.
    ///
    /// The reference is `reference` when supplied and live, otherwise
    /// `source`'s parent. Width/height requests are relative to `source`
    /// itself and need no reference. If an edge or center request is
    /// present and no reference resolves, the whole call degrades to an
    /// empty record.
    pub fn apply(
        &mut self,
        source: ViewId,
        reference: Option<ViewId>,
        options: PinOptions,
    ) -> PinRecord {
        let mut record = PinRecord::new(source);
        if !self.tree.contains(source) {
            warn!(view = ?source, "apply on a detached view; no constraints created");
            return record;
        }
        self.disable_frame_translation(source);

        let target = if options.needs_reference() {
            match self.resolve_reference(source, reference) {
                Some(target) => Some(target),
                None => {
                    warn!(
                        view = ?source,
                        "no resolvable reference view; no constraints created"
                    );
                    return record;
                }
            }
        } else {
            None
        };

        if let Some(offset) = options.top {
            self.pin(&mut record, source, Anchor::Top, pair(target, Anchor::Top), offset, 1.0);
        }
        if let Some(offset) = options.leading {
            self.pin(
                &mut record,
                source,
                Anchor::Leading,
                pair(target, Anchor::Leading),
                offset,
                1.0,
            );
        }
        if let Some(offset) = options.bottom {
            self.pin(
                &mut record,
                source,
                Anchor::Bottom,
                pair(target, Anchor::Bottom),
                offset,
                1.0,
            );
        }
        if let Some(offset) = options.trailing {
            self.pin(
                &mut record,
                source,
                Anchor::Trailing,
                pair(target, Anchor::Trailing),
                offset,
                1.0,
            );
        }
        if let Some(value) = options.width {
            self.pin(&mut record, source, Anchor::Width, None, value, 1.0);
        }
        if let Some(value) = options.height {
            self.pin(&mut record, source, Anchor::Height, None, value, 1.0);
        }
        if options.center_x {
            self.pin(
                &mut record,
                source,
                Anchor::CenterX,
                pair(target, Anchor::CenterX),
                0.0,
                1.0,
            );
        }
        if options.center_y {
            self.pin(
                &mut record,
                source,
                Anchor::CenterY,
                pair(target, Anchor::CenterY),
                0.0,
                1.0,
            );
        }
        record
    }

    /// Fix `source`'s width and height to the two components of `size`.
    pub fn apply_size(&mut self, source: ViewId, size: Size) -> PinRecord {
        self.apply(
            source,
            None,
            PinOptions::new().width(size.width).height(size.height),
        )
    }

    /// `source.width == multiplier * reference.width`, constant zero.
    /// Disables frame translation on both views.
    pub fn apply_relative_width(
        &mut self,
        source: ViewId,
        reference: ViewId,
        multiplier: f64,
    ) -> PinRecord {
        self.relative(source, reference, Anchor::Width, multiplier)
    }

    /// `source.height == multiplier * reference.height`, constant zero.
    /// Disables frame translation on both views.
    pub fn apply_relative_height(
        &mut self,
        source: ViewId,
        reference: ViewId,
        multiplier: f64,
    ) -> PinRecord {
        self.relative(source, reference, Anchor::Height, multiplier)
    }

    /// Pin `source`'s trailing edge to `other`'s leading edge, offset by
    /// `constant`. `source` ends up just before `other`.
    pub fn apply_trailing(&mut self, source: ViewId, other: ViewId, constant: f64) -> PinRecord {
        self.adjacent(source, other, Anchor::Trailing, Anchor::Leading, constant)
    }

    /// Pin `source`'s leading edge to `other`'s trailing edge, offset by
    /// `constant`. `source` ends up just after `other`.
    pub fn apply_leading(&mut self, source: ViewId, other: ViewId, constant: f64) -> PinRecord {
        self.adjacent(source, other, Anchor::Leading, Anchor::Trailing, constant)
    }

    /// Pin `source`'s top edge to `other`'s bottom edge, offset by
    /// `constant`. `other` sits above `source`.
    pub fn apply_above(&mut self, source: ViewId, other: ViewId, constant: f64) -> PinRecord {
        self.adjacent(source, other, Anchor::Top, Anchor::Bottom, constant)
    }

    /// Pin `source`'s bottom edge to `other`'s top edge, offset by
    /// `constant`. `other` sits below `source`.
    pub fn apply_below(&mut self, source: ViewId, other: ViewId, constant: f64) -> PinRecord {
        self.adjacent(source, other, Anchor::Bottom, Anchor::Top, constant)
    }

    // ------------------------------------------------------------------
    // Handle maintenance
    // ------------------------------------------------------------------

    /// Read a constraint's metadata: endpoints, constant, multiplier,
    /// active flag.
    pub fn constraint(&self, id: ConstraintId) -> Option<&PinConstraint> {
        self.constraints.get(id)
    }

    /// Change a constraint's constant, rebuilding the solver-side
    /// constraint under the same id so long-held handles keep observing
    /// the same logical constraint. On an inactive handle only the
    /// stored constant changes.
    pub fn set_constant(&mut self, id: ConstraintId, value: f64) -> Result<(), LayoutError> {
        let Some(constraint) = self.constraints.get(id) else {
            return Err(LayoutError::unknown_constraint(id));
        };
        if !constraint.active {
            if let Some(constraint) = self.constraints.get_mut(id) {
                constraint.constant = value;
            }
            return Ok(());
        }
        let (source, anchor, target, multiplier, raw) = (
            constraint.source,
            constraint.anchor,
            constraint.reference.zip(constraint.reference_anchor),
            constraint.multiplier,
            constraint.raw.clone(),
        );
        self.solver.remove(&raw)?;
        match self.build_raw(source, anchor, target, value, multiplier) {
            Ok(raw) => {
                if let Some(constraint) = self.constraints.get_mut(id) {
                    constraint.raw = raw;
                    constraint.constant = value;
                }
                Ok(())
            }
            Err(e) => {
                if let Some(constraint) = self.constraints.get_mut(id) {
                    constraint.active = false;
                    constraint.constant = value;
                }
                Err(e.into())
            }
        }
    }

    /// Activate or deactivate a constraint. Re-activation requires both
    /// endpoints to still be live and supersedes whatever currently
    /// occupies the slot.
    pub fn set_active(&mut self, id: ConstraintId, active: bool) -> Result<(), LayoutError> {
        let Some(constraint) = self.constraints.get(id) else {
            return Err(LayoutError::unknown_constraint(id));
        };
        if constraint.active == active {
            return Ok(());
        }
        if !active {
            let raw = constraint.raw.clone();
            self.solver.remove(&raw)?;
            if let Some(constraint) = self.constraints.get_mut(id) {
                constraint.active = false;
            }
            return Ok(());
        }
        let (source, anchor, target, constant, multiplier) = (
            constraint.source,
            constraint.anchor,
            constraint.reference.zip(constraint.reference_anchor),
            constraint.constant,
            constraint.multiplier,
        );
        if !self.tree.contains(source) {
            return Err(LayoutError::detached(source));
        }
        if let Some((reference, _)) = target {
            if !self.tree.contains(reference) {
                return Err(LayoutError::detached(reference));
            }
        }
        self.supersede(source, anchor);
        let raw = self.build_raw(source, anchor, target, constant, multiplier)?;
        if let Some(constraint) = self.constraints.get_mut(id) {
            constraint.raw = raw;
            constraint.active = true;
        }
        self.current.insert((source, anchor), id);
        self.pinned_sources.insert(source);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Layout pass
    // ------------------------------------------------------------------

    /// Run one layout pass: suggest every view's frame, solve, and write
    /// the solved frames back into the arena.
    ///
    /// Hold strengths are graded: strong for frame-translating views,
    /// medium for views that only appear as references (their frames
    /// anchor the system), weak for pinned views (constraints govern,
    /// the frame settles leftover degrees of freedom).
    pub fn layout(&mut self) -> Result<(), LayoutError> {
        for (id, view) in self.tree.iter() {
            let hold = if view.translates_frame {
                HoldStrength::Strong
            } else if self.pinned_sources.contains(&id) {
                HoldStrength::Weak
            } else {
                HoldStrength::Medium
            };
            let frame = view.frame;
            self.solver.hold(id, VarKind::X, frame.x, hold)?;
            self.solver.hold(id, VarKind::Y, frame.y, hold)?;
            self.solver.hold(id, VarKind::Width, frame.width, hold)?;
            self.solver.hold(id, VarKind::Height, frame.height, hold)?;
        }
        self.solver.flush();
        let ids: Vec<ViewId> = self.tree.iter().map(|(id, _)| id).collect();
        for id in ids {
            let frame = Rect::new(
                self.solver.value(id, VarKind::X),
                self.solver.value(id, VarKind::Y),
                self.solver.value(id, VarKind::Width),
                self.solver.value(id, VarKind::Height),
            );
            if let Some(view) = self.tree.get_mut(id) {
                view.frame = frame;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn disable_frame_translation(&mut self, id: ViewId) {
        if let Some(view) = self.tree.get_mut(id) {
            view.translates_frame = false;
        }
    }

    fn resolve_reference(&self, source: ViewId, reference: Option<ViewId>) -> Option<ViewId> {
        match reference {
            Some(reference) if self.tree.contains(reference) => Some(reference),
            Some(_) => None,
            None => self.tree.parent(source),
        }
    }

    fn relative(
        &mut self,
        source: ViewId,
        reference: ViewId,
        anchor: Anchor,
        multiplier: f64,
    ) -> PinRecord {
        let mut record = PinRecord::new(source);
        if !self.tree.contains(source) {
            warn!(view = ?source, "relative pin on a detached view; no constraints created");
            return record;
        }
        self.disable_frame_translation(source);
        if !self.tree.contains(reference) {
            warn!(view = ?reference, "relative pin against a detached reference; no constraints created");
            return record;
        }
        self.disable_frame_translation(reference);
        self.pin(&mut record, source, anchor, Some((reference, anchor)), 0.0, multiplier);
        record
    }

    fn adjacent(
        &mut self,
        source: ViewId,
        other: ViewId,
        anchor: Anchor,
        other_anchor: Anchor,
        constant: f64,
    ) -> PinRecord {
        let mut record = PinRecord::new(source);
        if !self.tree.contains(source) {
            warn!(view = ?source, "adjacency pin on a detached view; no constraints created");
            return record;
        }
        self.disable_frame_translation(source);
        if !self.tree.contains(other) {
            warn!(view = ?other, "adjacency pin against a detached view; no constraints created");
            return record;
        }
        self.disable_frame_translation(other);
        self.pin(&mut record, source, anchor, Some((other, other_anchor)), constant, 1.0);
        record
    }

    /// Install one constraint, superseding whatever currently occupies
    /// the (source, anchor) slot. A solver rejection skips the slot with
    /// a diagnostic; other slots of the same call are unaffected.
    fn pin(
        &mut self,
        record: &mut PinRecord,
        source: ViewId,
        anchor: Anchor,
        target: Option<(ViewId, Anchor)>,
        constant: f64,
        multiplier: f64,
    ) {
        self.supersede(source, anchor);
        let description = self.describe(source, anchor, target, constant, multiplier);
        match self.build_raw(source, anchor, target, constant, multiplier) {
            Ok(raw) => {
                let id = self.constraints.insert(PinConstraint {
                    source,
                    reference: target.map(|(view, _)| view),
                    anchor,
                    reference_anchor: target.map(|(_, anchor)| anchor),
                    constant,
                    multiplier,
                    active: true,
                    raw,
                });
                self.current.insert((source, anchor), id);
                self.pinned_sources.insert(source);
                record.set(anchor, id);
                debug!(constraint = %description, "pinned");
            }
            Err(e) => {
                warn!(constraint = %description, error = %e, "constraint rejected; slot skipped");
            }
        }
    }

    fn build_raw(
        &mut self,
        source: ViewId,
        anchor: Anchor,
        target: Option<(ViewId, Anchor)>,
        constant: f64,
        multiplier: f64,
    ) -> Result<kasuari::Constraint, SolverError> {
        let description = self.describe(source, anchor, target, constant, multiplier);
        let direction = self.config.direction;
        let lhs = self.solver.anchor_expression(source, anchor, direction);
        match target {
            Some((reference, reference_anchor)) => {
                let rhs = self.solver.anchor_expression(reference, reference_anchor, direction);
                self.solver.relate(lhs, rhs, multiplier, constant, &description)
            }
            None => self.solver.fix(lhs, constant, &description),
        }
    }

    fn supersede(&mut self, source: ViewId, anchor: Anchor) {
        if let Some(&old) = self.current.get(&(source, anchor)) {
            self.deactivate(old);
        }
    }

    fn deactivate(&mut self, id: ConstraintId) {
        if let Some(constraint) = self.constraints.get_mut(id) {
            if !constraint.active {
                return;
            }
            constraint.active = false;
            if let Err(e) = self.solver.remove(&constraint.raw) {
                warn!(constraint = ?id, error = %e, "failed to remove deactivated constraint");
            }
        }
    }

    fn label(&self, view: ViewId) -> String {
        self.tree
            .get(view)
            .and_then(|v| v.name().map(str::to_string))
            .unwrap_or_else(|| format!("{:?}", view))
    }

    fn describe(
        &self,
        source: ViewId,
        anchor: Anchor,
        target: Option<(ViewId, Anchor)>,
        constant: f64,
        multiplier: f64,
    ) -> String {
        match target {
            Some((reference, reference_anchor)) if multiplier == 1.0 => format!(
                "{}.{} = {}.{} + {}",
                self.label(source),
                anchor.name(),
                self.label(reference),
                reference_anchor.name(),
                constant
            ),
            Some((reference, reference_anchor)) => format!(
                "{}.{} = {} * {}.{} + {}",
                self.label(source),
                anchor.name(),
                multiplier,
                self.label(reference),
                reference_anchor.name(),
                constant
            ),
            None => format!("{}.{} = {}", self.label(source), anchor.name(), constant),
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn pair(target: Option<ViewId>, anchor: Anchor) -> Option<(ViewId, Anchor)> {
    target.map(|view| (view, anchor))
}
