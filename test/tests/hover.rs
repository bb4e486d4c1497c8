//! Tests for hover transitions and cursor updates.
//!
//! These tests verify that:
//! - Moving between nodes produces `pointerout`, `pointerleave`,
//!   `pointerover`, `pointerenter` and `pointermove` in that order
//! - Enter and leave do not bubble and skip ancestors shared by both paths
//! - Leaving the surface clears hover state
//! - The hovered node's cursor is shown on the surface

use floem_federated_test::prelude::*;

const HOVER_EVENTS: &[&str] = &[
    types::POINTER_OVER,
    types::POINTER_OUT,
    types::POINTER_ENTER,
    types::POINTER_LEAVE,
    types::POINTER_MOVE,
];

// =============================================================================
// Transitions
// =============================================================================

/// Test that moving from one sprite to its sibling emits out, leave, over,
/// enter and move, in that order.
#[test]
fn test_move_between_siblings_order() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, HOVER_EVENTS);
    recorder.track(harness.scene_mut(), sprites.b, HOVER_EVENTS);

    harness.pointer_move(10.0, 10.0)?;
    assert_eq!(
        recorder.trace(),
        vec!["pointerover@a", "pointerenter@a", "pointermove@a"]
    );
    recorder.reset();

    harness.pointer_move(60.0, 10.0)?;
    assert_eq!(
        recorder.trace(),
        vec![
            "pointerout@a",
            "pointerleave@a",
            "pointerover@b",
            "pointerenter@b",
            "pointermove@b"
        ]
    );
    Ok(())
}

#[test]
fn test_move_within_node_is_move_only() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, HOVER_EVENTS);

    harness.pointer_move(10.0, 10.0)?;
    recorder.reset();
    harness.pointer_move(20.0, 20.0)?;
    harness.pointer_move(30.0, 30.0)?;

    assert_eq!(recorder.types(), vec!["pointermove", "pointermove"]);
    Ok(())
}

/// Test that `pointerover` and `pointerout` bubble to the root while
/// `pointerenter` fires on it only once.
#[test]
fn test_over_and_out_bubble_but_enter_and_leave_do_not() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.root, HOVER_EVENTS);

    harness.pointer_move(10.0, 10.0)?;
    harness.pointer_move(60.0, 10.0)?;

    // The root is entered once and never left while moving between children.
    assert_eq!(
        recorder.trace(),
        vec![
            "pointerover@root",
            "pointerenter@root",
            "pointermove@root",
            "pointerout@root",
            "pointerover@root",
            "pointermove@root"
        ]
    );
    let enter = &recorder.of_type(types::POINTER_ENTER)[0];
    assert_eq!(enter.phase, EventPhase::AtTarget);
    Ok(())
}

/// Test that entering a chain notifies the outermost node first and leaving
/// it notifies the innermost node first.
#[test]
fn test_enter_outermost_first_leave_innermost_first() -> Result<(), EventError> {
    let (scene, nodes) = build_chain(3);
    let mut harness = TestHarness::with_scene(scene, nodes[0]);
    let recorder = EventRecorder::new();
    for &node in &nodes {
        recorder.track(
            harness.scene_mut(),
            node,
            &[types::POINTER_ENTER, types::POINTER_LEAVE],
        );
    }

    harness.pointer_move(10.0, 10.0)?;
    harness.pointer_move(500.0, 500.0)?;

    assert_eq!(
        recorder.trace(),
        vec![
            "pointerenter@root",
            "pointerenter@n1",
            "pointerenter@n2",
            "pointerenter@n3",
            "pointerleave@n3",
            "pointerleave@n2",
            "pointerleave@n1",
            "pointerleave@root"
        ]
    );
    Ok(())
}

/// Test that moving from a node into its child does not send `pointerout` to
/// the parent, since it stays on the hover path.
#[test]
fn test_moving_into_child_keeps_parent_hovered() -> Result<(), EventError> {
    let (mut scene, sprites) = sprite_scene();
    let inner = scene.create_named("inner");
    scene.add_child(sprites.a, inner).unwrap();
    interactive_rect(&mut scene, inner, Rect::new(0.0, 0.0, 20.0, 20.0));
    let mut harness = TestHarness::with_scene(scene, sprites.root);
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, HOVER_EVENTS);
    recorder.track(harness.scene_mut(), inner, HOVER_EVENTS);

    harness.pointer_move(40.0, 40.0)?;
    recorder.reset();
    harness.pointer_move(10.0, 10.0)?;

    // `a` stays on the path, so it gets no `out`; `over` bubbles through it.
    assert_eq!(
        recorder.trace(),
        vec![
            "pointerover@inner",
            "pointerover@a",
            "pointerenter@inner",
            "pointermove@inner",
            "pointermove@a"
        ]
    );
    assert!(harness.is_hovered(sprites.a));
    assert!(harness.is_hovered(inner));
    Ok(())
}

#[test]
fn test_mouse_aliases_follow_pointer_events() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(
        harness.scene_mut(),
        sprites.a,
        &[
            types::MOUSE_OVER,
            types::MOUSE_ENTER,
            types::MOUSE_MOVE,
            types::MOUSE_OUT,
            types::MOUSE_LEAVE,
        ],
    );

    harness.pointer_move(10.0, 10.0)?;
    harness.pointer_move(300.0, 300.0)?;

    assert_eq!(
        recorder.types(),
        vec!["mouseover", "mouseenter", "mousemove", "mouseout", "mouseleave"]
    );
    Ok(())
}

/// Test that `globalpointermove` reaches every interactive node, even when
/// nothing is under the pointer.
#[test]
fn test_global_move_reaches_every_interactive_node() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    for node in [sprites.a, sprites.b] {
        recorder.track(
            harness.scene_mut(),
            node,
            &[types::GLOBAL_POINTER_MOVE, types::POINTER_MOVE],
        );
    }

    harness.pointer_move(300.0, 300.0)?;

    assert_eq!(
        recorder.trace(),
        vec!["globalpointermove@b", "globalpointermove@a"]
    );
    Ok(())
}

#[test]
fn test_global_move_can_be_disabled() -> Result<(), EventError> {
    let (scene, sprites) = sprite_scene();
    let mut harness = TestHarness::with_config(
        scene,
        sprites.root,
        BoundaryConfig::default(),
        EventSystemConfig::default().features(EventFeatures::CLICK | EventFeatures::MOVE),
    );
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, &[types::GLOBAL_POINTER_MOVE]);

    harness.pointer_move(10.0, 10.0)?;

    assert!(recorder.is_empty());
    Ok(())
}

// =============================================================================
// Surface enter / leave
// =============================================================================

#[test]
fn test_leaving_surface_clears_hover() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, HOVER_EVENTS);

    harness.pointer_move(10.0, 10.0)?;
    recorder.reset();
    harness.pointer_leave_surface(10.0, 10.0)?;

    assert_eq!(recorder.types(), vec!["pointerout", "pointerleave"]);
    assert!(!harness.is_hovered(sprites.a));
    Ok(())
}

#[test]
fn test_entering_surface_hovers_target() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.b, HOVER_EVENTS);

    harness.pointer_enter_surface(60.0, 10.0)?;

    assert_eq!(recorder.types(), vec!["pointerover", "pointerenter"]);
    assert!(harness.is_hovered(sprites.b));
    Ok(())
}

/// Test that a hovered node removed from the scene is skipped and the leave
/// walk starts at its deepest mounted ancestor.
#[test]
fn test_hovered_node_removed_gets_no_out() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, HOVER_EVENTS);
    recorder.track(harness.scene_mut(), sprites.root, &[types::POINTER_LEAVE]);

    harness.pointer_move(10.0, 10.0)?;
    recorder.reset();
    harness.scene_mut().detach(sprites.a);
    harness.pointer_move(300.0, 300.0)?;

    // The root is the deepest mounted node of the old hover path.
    assert_eq!(recorder.trace(), vec!["pointerleave@root"]);
    Ok(())
}

// =============================================================================
// Cursor
// =============================================================================

#[test]
fn test_cursor_follows_hovered_node() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    harness.scene_mut().set_cursor(sprites.a, Some("pointer"));
    harness.scene_mut().set_cursor(sprites.b, Some("grab"));

    harness.pointer_move(10.0, 10.0)?;
    assert_eq!(harness.surface().cursor(), Some("pointer"));

    harness.pointer_move(60.0, 10.0)?;
    assert_eq!(harness.surface().cursor(), Some("grab"));

    harness.pointer_move(300.0, 300.0)?;
    assert_eq!(harness.surface().cursor(), Some("inherit"));

    assert_eq!(
        harness.surface().cursor_history(),
        &["pointer".to_owned(), "grab".to_owned(), "inherit".to_owned()]
    );
    Ok(())
}

/// Test that the surface cursor is only written when it changes.
#[test]
fn test_cursor_set_once_per_change() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    harness.scene_mut().set_cursor(sprites.a, Some("pointer"));

    harness.pointer_move(10.0, 10.0)?;
    harness.pointer_move(20.0, 20.0)?;
    harness.pointer_move(30.0, 30.0)?;

    assert_eq!(harness.surface().cursor_history(), &["pointer".to_owned()]);
    Ok(())
}

#[test]
fn test_cursor_resets_when_leaving_surface() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    harness.scene_mut().set_cursor(sprites.a, Some("pointer"));

    harness.pointer_move(10.0, 10.0)?;
    harness.pointer_leave_surface(10.0, 10.0)?;

    assert_eq!(harness.boundary().cursor(), None);
    assert_eq!(harness.surface().cursor(), Some("inherit"));
    Ok(())
}
