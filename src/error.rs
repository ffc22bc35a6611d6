//! Error types for the strict engine surface.
//!
//! Apply-family operations never return errors; they degrade to empty
//! records with a diagnostic. Everything that returns `Result` (layout
//! passes, handle maintenance, frame updates) uses [`LayoutError`].

use thiserror::Error;

use crate::constraint::ConstraintId;
use crate::solver::SolverError;
use crate::tree::ViewId;

/// Errors from the strict engine operations.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The view is no longer in the arena.
    #[error("view {view:?} is not in the tree")]
    DetachedView { view: ViewId },

    /// The constraint handle does not name a known constraint.
    #[error("unknown constraint handle {id:?}")]
    UnknownConstraint { id: ConstraintId },

    /// Constraint solver failure.
    #[error("constraint solver error: {0}")]
    Solver(#[from] SolverError),
}

impl LayoutError {
    pub fn detached(view: ViewId) -> Self {
        Self::DetachedView { view }
    }

    pub fn unknown_constraint(id: ConstraintId) -> Self {
        Self::UnknownConstraint { id }
    }
}
