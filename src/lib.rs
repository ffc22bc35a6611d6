//! cleat - fluent edge pinning over a Cassowary constraint solver
//!
//! This library lets a caller attach positional and sizing relationships
//! (top, leading, bottom, trailing, width, height, center-X, center-Y)
//! between a view and a reference view with single chained calls, instead
//! of building and activating each solver constraint by hand. Views live
//! in an arena owned by the [`LayoutEngine`]; every pin operation returns
//! a [`PinRecord`] that accumulates constraint handles across calls.
//!
//! # Example
//!
//! ```rust
//! use cleat::{LayoutEngine, PinOptions, Rect, Size, View};
//!
//! let mut engine = LayoutEngine::new();
//! let root = engine.add_view(View::named("root").with_frame(Rect::new(0.0, 0.0, 320.0, 240.0)));
//! let panel = engine.add_child(root, View::named("panel"));
//!
//! // Pin the panel 10 points inside its parent's top-leading corner,
//! // then chain a fixed size onto the same record.
//! let mut record = engine.apply(panel, None, PinOptions::new().top(10.0).leading(10.0));
//! record.apply_size(&mut engine, Size::new(300.0, 60.0));
//!
//! engine.layout().unwrap();
//! let frame = engine.frame(panel).unwrap();
//! assert!((frame.x - 10.0).abs() < 1e-3);
//! assert!((frame.width - 300.0).abs() < 1e-3);
//! ```

pub mod constraint;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod options;
pub mod record;
pub mod scene;
pub mod solver;
pub mod tree;

pub use constraint::{Anchor, ConstraintId, PinConstraint};
pub use engine::{EngineConfig, LayoutDirection, LayoutEngine};
pub use error::LayoutError;
pub use geometry::{Point, Rect, Size};
pub use options::PinOptions;
pub use record::PinRecord;
pub use scene::{frame_report, Scene, SceneError};
pub use solver::{HoldStrength, SolverError};
pub use tree::{View, ViewId, ViewTree};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_pin_and_solve() {
        let mut engine = LayoutEngine::new();
        let root = engine
            .add_view(View::named("root").with_frame(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let child = engine.add_child(root, View::named("child"));
        engine.apply(
            child,
            None,
            PinOptions::new().top(10.0).leading(10.0).bottom(-10.0).trailing(-10.0),
        );
        engine.layout().unwrap();
        let frame = engine.frame(child).unwrap();
        assert!((frame.x - 10.0).abs() < 1e-3);
        assert!((frame.y - 10.0).abs() < 1e-3);
        assert!((frame.width - 80.0).abs() < 1e-3);
        assert!((frame.height - 80.0).abs() < 1e-3);
    }

    #[test]
    fn smoke_chaining_accumulates() {
        let mut engine = LayoutEngine::new();
        let root = engine.add_view(View::named("root"));
        let child = engine.add_child(root, View::named("child"));
        let mut record = engine.apply(child, None, PinOptions::new().top(0.0));
        record.apply_size(&mut engine, Size::new(30.0, 40.0));
        assert!(record.top.is_some());
        assert!(record.width.is_some());
        assert!(record.height.is_some());
        assert!(record.leading.is_none());
    }
}
