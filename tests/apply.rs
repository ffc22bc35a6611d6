//! Integration tests for the apply operation: reference resolution,
//! slot population, the frame-translation side effect, and degrade
//! behavior on detached or unresolvable views.

use cleat::{Anchor, LayoutEngine, PinOptions, Rect, Size, View};

const TOLERANCE: f64 = 1e-3;

fn engine_with_parent_child() -> (LayoutEngine, cleat::ViewId, cleat::ViewId) {
    let mut engine = LayoutEngine::new();
    let root = engine.add_view(View::named("root").with_frame(Rect::new(0.0, 0.0, 320.0, 240.0)));
    let child = engine.add_child(root, View::named("child"));
    (engine, root, child)
}

fn translates(engine: &LayoutEngine, id: cleat::ViewId) -> bool {
    engine.view(id).expect("view should exist").translates_frame
}

#[test]
fn apply_disables_frame_translation() {
    let (mut engine, _root, child) = engine_with_parent_child();
    assert!(translates(&engine, child), "views start translated");
    engine.apply(child, None, PinOptions::new().top(10.0));
    assert!(!translates(&engine, child), "apply must disable translation");
}

#[test]
fn translation_disable_is_idempotent() {
    let (mut engine, _root, child) = engine_with_parent_child();
    engine.apply(child, None, PinOptions::new().top(10.0));
    engine.apply(child, None, PinOptions::new().leading(5.0));
    assert!(!translates(&engine, child), "flag stays false after a second call");
}

#[test]
fn zero_requests_touch_no_slots_but_still_flip_the_flag() {
    let (mut engine, _root, child) = engine_with_parent_child();
    let record = engine.apply(child, None, PinOptions::default());
    assert!(record.is_empty(), "no request means no slot");
    assert!(!translates(&engine, child));
}

#[test]
fn requested_slots_match_input_exactly() {
    let (mut engine, root, child) = engine_with_parent_child();
    let record = engine.apply(
        child,
        None,
        PinOptions::new().top(8.0).trailing(-12.0).height(44.0).center_x(),
    );

    let top = engine.constraint(record.top.expect("top requested")).unwrap();
    assert_eq!(top.constant, 8.0);
    assert_eq!(top.multiplier, 1.0);
    assert_eq!(top.reference, Some(root));
    assert!(top.active);

    let trailing = engine
        .constraint(record.trailing.expect("trailing requested"))
        .unwrap();
    assert_eq!(trailing.constant, -12.0);

    let height = engine
        .constraint(record.height.expect("height requested"))
        .unwrap();
    assert_eq!(height.constant, 44.0);
    assert_eq!(height.reference, None, "dimension constants are self-relative");

    let center = engine
        .constraint(record.center_x.expect("center_x requested"))
        .unwrap();
    assert_eq!(center.constant, 0.0);
    assert_eq!(center.multiplier, 1.0);

    // Everything not requested stays empty.
    for anchor in [Anchor::Leading, Anchor::Bottom, Anchor::Width, Anchor::CenterY] {
        assert_eq!(record.get(anchor), None, "{:?} was not requested", anchor);
    }
}

#[test]
fn missing_reference_falls_back_to_parent() {
    let (mut engine, root, child) = engine_with_parent_child();
    let record = engine.apply(child, None, PinOptions::new().bottom(0.0));
    let constraint = engine.constraint(record.bottom.unwrap()).unwrap();
    assert_eq!(constraint.reference, Some(root));
}

#[test]
fn explicit_reference_is_used_as_given() {
    let (mut engine, root, child) = engine_with_parent_child();
    let sibling = engine.add_child(root, View::named("sibling"));
    let record = engine.apply(child, Some(sibling), PinOptions::new().top(0.0));
    let constraint = engine.constraint(record.top.unwrap()).unwrap();
    assert_eq!(constraint.reference, Some(sibling));
}

#[test]
fn detached_source_degrades_to_empty_record() {
    let (mut engine, _root, child) = engine_with_parent_child();
    engine.remove_view(child);
    let record = engine.apply(child, None, PinOptions::new().top(10.0).width(50.0));
    assert!(record.is_empty(), "no constraints on a detached view");
}

#[test]
fn unresolvable_reference_degrades_to_empty_record() {
    let mut engine = LayoutEngine::new();
    let orphan = engine.add_view(View::named("orphan"));
    // Edge request with no reference and no parent: the whole call
    // degrades, width is not salvaged.
    let record = engine.apply(orphan, None, PinOptions::new().top(5.0).width(50.0));
    assert!(record.is_empty());
    // The flag side effect still applies to the live source.
    assert!(!translates(&engine, orphan));
}

#[test]
fn dead_explicit_reference_degrades() {
    let (mut engine, root, child) = engine_with_parent_child();
    let sibling = engine.add_child(root, View::named("sibling"));
    engine.remove_view(sibling);
    let record = engine.apply(child, Some(sibling), PinOptions::new().top(0.0));
    assert!(record.is_empty());
}

#[test]
fn rejected_slot_is_skipped_but_siblings_apply() {
    let (mut engine, root, child) = engine_with_parent_child();
    let anchor = engine.add_child(root, View::named("anchor"));
    engine.apply_size(anchor, Size::new(100.0, 30.0));
    // leading + trailing against a fixed-width anchor already force
    // child.width = 100; the explicit width = 60 cannot also hold.
    let record = engine.apply(
        child,
        Some(anchor),
        PinOptions::new().leading(0.0).trailing(0.0).width(60.0),
    );
    assert!(record.leading.is_some(), "satisfiable slot applies");
    assert!(record.trailing.is_some(), "satisfiable slot applies");
    assert_eq!(record.width, None, "the conflicting slot is skipped");

    engine.layout().expect("layout should succeed");
    let frame = engine.frame(child).unwrap();
    assert!(
        (frame.width - 100.0).abs() < TOLERANCE,
        "the edge pins govern the width, got {}",
        frame.width
    );
}

#[test]
fn apply_size_fixes_both_dimensions() {
    let (mut engine, _root, child) = engine_with_parent_child();
    let record = engine.apply_size(child, Size::new(30.0, 40.0));

    let width = engine.constraint(record.width.expect("width set")).unwrap();
    assert_eq!(width.constant, 30.0);
    assert_eq!(width.multiplier, 1.0);
    assert!(width.active);

    let height = engine.constraint(record.height.expect("height set")).unwrap();
    assert_eq!(height.constant, 40.0);
    assert_eq!(height.multiplier, 1.0);
    assert!(height.active);

    assert_eq!(record.top, None);
    assert_eq!(record.center_x, None);
}

#[test]
fn relative_width_sets_only_the_width_slot() {
    let (mut engine, root, child) = engine_with_parent_child();
    let record = engine.apply_relative_width(child, root, 0.5);
    let constraint = engine.constraint(record.width.expect("width set")).unwrap();
    assert_eq!(constraint.multiplier, 0.5);
    assert_eq!(constraint.constant, 0.0);
    assert_eq!(constraint.reference, Some(root));
    assert!(constraint.active);
    for anchor in Anchor::ALL {
        if anchor != Anchor::Width {
            assert_eq!(record.get(anchor), None);
        }
    }
    // The reference participates in layout too.
    assert!(!translates(&engine, root));
}

#[test]
fn relative_height_mirrors_relative_width() {
    let (mut engine, root, child) = engine_with_parent_child();
    let record = engine.apply_relative_height(child, root, 0.25);
    let constraint = engine.constraint(record.height.expect("height set")).unwrap();
    assert_eq!(constraint.multiplier, 0.25);
    assert_eq!(constraint.reference_anchor, Some(Anchor::Height));
    assert_eq!(record.width, None);
}

#[test]
fn solved_frames_satisfy_edge_insets() {
    let (mut engine, _root, child) = engine_with_parent_child();
    engine.apply(
        child,
        None,
        PinOptions::new().top(10.0).leading(10.0).bottom(-10.0).trailing(-10.0),
    );
    engine.layout().expect("layout should succeed");

    let frame = engine.frame(child).unwrap();
    assert!((frame.x - 10.0).abs() < TOLERANCE, "x should be 10, got {}", frame.x);
    assert!((frame.y - 10.0).abs() < TOLERANCE, "y should be 10, got {}", frame.y);
    assert!(
        (frame.width - 300.0).abs() < TOLERANCE,
        "width should be 300, got {}",
        frame.width
    );
    assert!(
        (frame.height - 220.0).abs() < TOLERANCE,
        "height should be 220, got {}",
        frame.height
    );
}

#[test]
fn relative_width_solves_to_half_the_reference() {
    let (mut engine, root, child) = engine_with_parent_child();
    engine.apply_relative_width(child, root, 0.5);
    engine.layout().expect("layout should succeed");
    let frame = engine.frame(child).unwrap();
    assert!(
        (frame.width - 160.0).abs() < TOLERANCE,
        "child width should be half of 320, got {}",
        frame.width
    );
}

#[test]
fn translated_views_hold_their_frames() {
    let (mut engine, root, child) = engine_with_parent_child();
    engine.apply(child, None, PinOptions::new().center_x().center_y());
    engine.layout().expect("layout should succeed");
    let frame = engine.frame(root).unwrap();
    assert!((frame.x - 0.0).abs() < TOLERANCE);
    assert!((frame.width - 320.0).abs() < TOLERANCE);
    assert!((frame.height - 240.0).abs() < TOLERANCE);
}

#[test]
fn centers_align_with_the_reference() {
    let (mut engine, _root, child) = engine_with_parent_child();
    engine.apply(child, None, PinOptions::new().center_x().center_y());
    engine.apply_size(child, Size::new(100.0, 50.0));
    engine.layout().expect("layout should succeed");
    let frame = engine.frame(child).unwrap();
    assert!((frame.x - 110.0).abs() < TOLERANCE, "center_x: got x={}", frame.x);
    assert!((frame.y - 95.0).abs() < TOLERANCE, "center_y: got y={}", frame.y);
}

#[test]
fn leading_resolves_to_the_right_edge_under_rtl() {
    use cleat::{EngineConfig, LayoutDirection};
    let mut engine =
        LayoutEngine::with_config(EngineConfig::new().with_direction(LayoutDirection::RightToLeft));
    let root = engine.add_view(View::named("root").with_frame(Rect::new(0.0, 0.0, 320.0, 240.0)));
    let child = engine.add_child(root, View::named("child"));
    engine.apply(child, None, PinOptions::new().leading(0.0).width(100.0));
    engine.layout().expect("layout should succeed");
    let frame = engine.frame(child).unwrap();
    // Under RTL the leading edge is x + width; pinning it to the root's
    // leading edge (320) puts the child at x = 220.
    assert!(
        (frame.x - 220.0).abs() < TOLERANCE,
        "rtl leading pin should place child at 220, got {}",
        frame.x
    );
}
