//! Constraint solver integration.
//!
//! This module wraps the kasuari Cassowary solver: one variable per
//! (view, base property), anchor expressions built from those variables,
//! and a persistent value table so solved frames survive kasuari's
//! delta-only change reporting.

use std::collections::HashMap;

use kasuari::{
    Constraint, Expression, Solver as KasuariSolver, Strength, Variable, WeightedRelation::*,
};
use thiserror::Error;

use crate::constraint::Anchor;
use crate::engine::LayoutDirection;
use crate::tree::ViewId;

/// The four base properties backed by a solver variable. Every anchor is
/// an expression over these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    X,
    Y,
    Width,
    Height,
}

impl VarKind {
    pub const ALL: [VarKind; 4] = [VarKind::X, VarKind::Y, VarKind::Width, VarKind::Height];
}

/// How firmly a frame suggestion holds its variable between required
/// constraints. Graded so that a view referenced by pins but never
/// pinned itself anchors the system instead of being dragged to a
/// pinned view's stale frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldStrength {
    /// The view still translates its frame into layout.
    Strong,
    /// Untranslated but never pinned: the frame anchors counterpart
    /// views that other pins reference.
    Medium,
    /// Untranslated and pinned: constraints govern; the frame only
    /// settles leftover degrees of freedom.
    Weak,
}

impl HoldStrength {
    fn strength(self) -> Strength {
        match self {
            HoldStrength::Strong => Strength::STRONG,
            HoldStrength::Medium => Strength::MEDIUM,
            HoldStrength::Weak => Strength::WEAK,
        }
    }
}

/// Errors from the constraint solver.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unsatisfiable constraint: {description}")]
    Unsatisfiable { description: String },

    #[error("duplicate constraint: {description}")]
    Duplicate { description: String },

    #[error("internal solver error: {0}")]
    Internal(String),
}

/// Wrapper around the kasuari solver.
pub struct PinSolver {
    solver: KasuariSolver,
    /// Maps (view, property) to kasuari variables, created lazily.
    variables: HashMap<(ViewId, VarKind), Variable>,
    /// Last solved value per variable, accumulated across
    /// `fetch_changes` calls (kasuari reports deltas only).
    values: HashMap<Variable, f64>,
    /// Edit-variable registration, keyed by the strength in force.
    edits: HashMap<Variable, HoldStrength>,
}

impl PinSolver {
    pub fn new() -> Self {
        Self {
            solver: KasuariSolver::new(),
            variables: HashMap::new(),
            values: HashMap::new(),
            edits: HashMap::new(),
        }
    }

    /// Get or create the kasuari variable for a base property.
    fn var(&mut self, view: ViewId, kind: VarKind) -> Variable {
        *self
            .variables
            .entry((view, kind))
            .or_insert_with(Variable::new)
    }

    /// Expression for an anchor of a view.
    ///
    /// top = y; bottom = y + h; center_x = x + w/2; center_y = y + h/2;
    /// leading/trailing resolve to the left/right edges under
    /// left-to-right and swap under right-to-left.
    pub fn anchor_expression(
        &mut self,
        view: ViewId,
        anchor: Anchor,
        direction: LayoutDirection,
    ) -> Expression {
        let rtl = direction == LayoutDirection::RightToLeft;
        match anchor {
            Anchor::Top => self.var(view, VarKind::Y).into(),
            Anchor::Bottom => self.var(view, VarKind::Y) + self.var(view, VarKind::Height),
            Anchor::Leading if !rtl => self.var(view, VarKind::X).into(),
            Anchor::Leading => self.var(view, VarKind::X) + self.var(view, VarKind::Width),
            Anchor::Trailing if !rtl => self.var(view, VarKind::X) + self.var(view, VarKind::Width),
            Anchor::Trailing => self.var(view, VarKind::X).into(),
            Anchor::Width => self.var(view, VarKind::Width).into(),
            Anchor::Height => self.var(view, VarKind::Height).into(),
            Anchor::CenterX => self.var(view, VarKind::X) + self.var(view, VarKind::Width) * 0.5,
            Anchor::CenterY => self.var(view, VarKind::Y) + self.var(view, VarKind::Height) * 0.5,
        }
    }

    /// Add `lhs == multiplier * rhs + constant` at required strength.
    /// Returns the installed constraint for later removal.
    pub fn relate(
        &mut self,
        lhs: Expression,
        rhs: Expression,
        multiplier: f64,
        constant: f64,
        description: &str,
    ) -> Result<Constraint, SolverError> {
        let constraint = lhs | EQ(Strength::REQUIRED) | rhs * multiplier + constant;
        self.solver
            .add_constraint(constraint.clone())
            .map_err(|e| convert_add_error(e, description))?;
        Ok(constraint)
    }

    /// Add `lhs == constant` at required strength.
    pub fn fix(
        &mut self,
        lhs: Expression,
        constant: f64,
        description: &str,
    ) -> Result<Constraint, SolverError> {
        let constraint = lhs | EQ(Strength::REQUIRED) | constant;
        self.solver
            .add_constraint(constraint.clone())
            .map_err(|e| convert_add_error(e, description))?;
        Ok(constraint)
    }

    /// Remove a previously installed constraint.
    pub fn remove(&mut self, constraint: &Constraint) -> Result<(), SolverError> {
        self.solver
            .remove_constraint(constraint)
            .map_err(|e| SolverError::Internal(format!("failed to remove constraint: {}", e)))
    }

    /// Suggest a value for a base property at the given hold strength.
    /// Switching strengths re-registers the edit variable.
    pub fn hold(
        &mut self,
        view: ViewId,
        kind: VarKind,
        value: f64,
        hold: HoldStrength,
    ) -> Result<(), SolverError> {
        let var = self.var(view, kind);
        match self.edits.get(&var).copied() {
            Some(current) if current == hold => {}
            Some(_) => {
                self.solver
                    .remove_edit_variable(var)
                    .map_err(|e| SolverError::Internal(format!("failed to remove edit variable: {}", e)))?;
                self.register_edit(var, hold)?;
            }
            None => self.register_edit(var, hold)?,
        }
        self.solver
            .suggest_value(var, value)
            .map_err(|e| SolverError::Internal(format!("failed to suggest value: {}", e)))
    }

    fn register_edit(&mut self, var: Variable, hold: HoldStrength) -> Result<(), SolverError> {
        self.solver
            .add_edit_variable(var, hold.strength())
            .map_err(|e| SolverError::Internal(format!("failed to add edit variable: {}", e)))?;
        self.edits.insert(var, hold);
        Ok(())
    }

    /// Pull pending changes out of kasuari into the persistent value table.
    pub fn flush(&mut self) {
        for &(var, value) in self.solver.fetch_changes() {
            self.values.insert(var, value);
        }
    }

    /// Last solved value for a base property. Defaults to 0.0 for
    /// variables the solver has never touched.
    pub fn value(&self, view: ViewId, kind: VarKind) -> f64 {
        self.variables
            .get(&(view, kind))
            .and_then(|var| self.values.get(var))
            .copied()
            .unwrap_or(0.0)
    }
}

impl Default for PinSolver {
    fn default() -> Self {
        Self::new()
    }
}

fn convert_add_error(e: kasuari::AddConstraintError, description: &str) -> SolverError {
    match e {
        kasuari::AddConstraintError::UnsatisfiableConstraint => SolverError::Unsatisfiable {
            description: description.to_string(),
        },
        kasuari::AddConstraintError::DuplicateConstraint => SolverError::Duplicate {
            description: description.to_string(),
        },
        kasuari::AddConstraintError::InternalSolverError(msg) => {
            SolverError::Internal(format!("{} ({})", msg, description))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{View, ViewTree};

    const TOLERANCE: f64 = 1e-3;

    fn two_views() -> (ViewId, ViewId) {
        let mut tree = ViewTree::new();
        let a = tree.insert(View::new());
        let b = tree.insert(View::new());
        (a, b)
    }

    #[test]
    fn fix_pins_a_dimension() {
        let (a, _) = two_views();
        let mut solver = PinSolver::new();
        let width = solver.anchor_expression(a, Anchor::Width, LayoutDirection::LeftToRight);
        solver.fix(width, 100.0, "a.width = 100").unwrap();
        solver.flush();
        assert!((solver.value(a, VarKind::Width) - 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn relate_with_offset() {
        let (a, b) = two_views();
        let mut solver = PinSolver::new();
        let a_top = solver.anchor_expression(a, Anchor::Top, LayoutDirection::LeftToRight);
        let b_top = solver.anchor_expression(b, Anchor::Top, LayoutDirection::LeftToRight);
        solver.relate(a_top, b_top, 1.0, 20.0, "a.top = b.top + 20").unwrap();
        solver.hold(b, VarKind::Y, 50.0, HoldStrength::Strong).unwrap();
        solver.flush();
        assert!((solver.value(a, VarKind::Y) - 70.0).abs() < TOLERANCE);
        assert!((solver.value(b, VarKind::Y) - 50.0).abs() < TOLERANCE);
    }

    #[test]
    fn relate_with_multiplier() {
        let (a, b) = two_views();
        let mut solver = PinSolver::new();
        let a_w = solver.anchor_expression(a, Anchor::Width, LayoutDirection::LeftToRight);
        let b_w = solver.anchor_expression(b, Anchor::Width, LayoutDirection::LeftToRight);
        solver.relate(a_w, b_w, 0.5, 0.0, "a.width = 0.5 * b.width").unwrap();
        solver.hold(b, VarKind::Width, 200.0, HoldStrength::Strong).unwrap();
        solver.flush();
        assert!((solver.value(a, VarKind::Width) - 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn center_is_derived_from_origin_and_size() {
        let (a, b) = two_views();
        let mut solver = PinSolver::new();
        let a_cx = solver.anchor_expression(a, Anchor::CenterX, LayoutDirection::LeftToRight);
        let b_cx = solver.anchor_expression(b, Anchor::CenterX, LayoutDirection::LeftToRight);
        solver.relate(a_cx, b_cx, 1.0, 0.0, "a.center_x = b.center_x").unwrap();
        let a_w = solver.anchor_expression(a, Anchor::Width, LayoutDirection::LeftToRight);
        solver.fix(a_w, 40.0, "a.width = 40").unwrap();
        solver.hold(b, VarKind::X, 0.0, HoldStrength::Strong).unwrap();
        solver.hold(b, VarKind::Width, 100.0, HoldStrength::Strong).unwrap();
        solver.flush();
        // b center = 50, so a.x = 50 - 20 = 30
        assert!((solver.value(a, VarKind::X) - 30.0).abs() < TOLERANCE);
    }

    #[test]
    fn leading_swaps_under_rtl() {
        let (a, _) = two_views();
        let mut solver = PinSolver::new();
        let leading = solver.anchor_expression(a, Anchor::Leading, LayoutDirection::RightToLeft);
        solver.fix(leading, 300.0, "a.leading = 300").unwrap();
        solver.hold(a, VarKind::Width, 100.0, HoldStrength::Strong).unwrap();
        solver.flush();
        // leading = x + width under RTL
        assert!((solver.value(a, VarKind::X) - 200.0).abs() < TOLERANCE);
    }

    #[test]
    fn removed_constraint_stops_binding() {
        let (a, _) = two_views();
        let mut solver = PinSolver::new();
        let width = solver.anchor_expression(a, Anchor::Width, LayoutDirection::LeftToRight);
        let constraint = solver.fix(width, 100.0, "a.width = 100").unwrap();
        solver.flush();
        solver.remove(&constraint).unwrap();
        solver.hold(a, VarKind::Width, 25.0, HoldStrength::Strong).unwrap();
        solver.flush();
        assert!((solver.value(a, VarKind::Width) - 25.0).abs() < TOLERANCE);
    }

    #[test]
    fn conflicting_required_constraints_error() {
        let (a, _) = two_views();
        let mut solver = PinSolver::new();
        let w1 = solver.anchor_expression(a, Anchor::Width, LayoutDirection::LeftToRight);
        solver.fix(w1, 100.0, "a.width = 100").unwrap();
        let w2 = solver.anchor_expression(a, Anchor::Width, LayoutDirection::LeftToRight);
        let result = solver.fix(w2, 200.0, "a.width = 200");
        match result {
            Err(SolverError::Unsatisfiable { description }) => {
                assert!(description.contains("a.width = 200"));
            }
            other => panic!("expected Unsatisfiable, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn hold_strength_can_change() {
        let (a, _) = two_views();
        let mut solver = PinSolver::new();
        solver.hold(a, VarKind::X, 10.0, HoldStrength::Strong).unwrap();
        solver.flush();
        assert!((solver.value(a, VarKind::X) - 10.0).abs() < TOLERANCE);
        // Re-register weak and make sure suggestions still land.
        solver.hold(a, VarKind::X, 30.0, HoldStrength::Weak).unwrap();
        solver.flush();
        assert!((solver.value(a, VarKind::X) - 30.0).abs() < TOLERANCE);
    }

    #[test]
    fn medium_hold_anchors_a_required_link_against_a_weak_hold() {
        // a.x = b.x - 8, a at a weak zero hold, b held medium at 100:
        // b must keep its value and a must move, not the other way round.
        let (a, b) = two_views();
        let mut solver = PinSolver::new();
        let a_x = solver.anchor_expression(a, Anchor::Leading, LayoutDirection::LeftToRight);
        let b_x = solver.anchor_expression(b, Anchor::Leading, LayoutDirection::LeftToRight);
        solver.relate(a_x, b_x, 1.0, -8.0, "a.x = b.x - 8").unwrap();
        solver.hold(a, VarKind::X, 0.0, HoldStrength::Weak).unwrap();
        solver.hold(b, VarKind::X, 100.0, HoldStrength::Medium).unwrap();
        solver.flush();
        assert!((solver.value(b, VarKind::X) - 100.0).abs() < TOLERANCE);
        assert!((solver.value(a, VarKind::X) - 92.0).abs() < TOLERANCE);
    }
}
