//! Tests for press/release pairing and click synthesis.
//!
//! These tests verify that:
//! - A click fires on the pressed node only when the release lands on it or
//!   one of its descendants
//! - Releases elsewhere produce `pointerupoutside` on the pressed node and its
//!   ancestors instead
//! - `detail` counts clicks within the click interval on the same node
//! - Mouse, pen and touch pointers get their own click and alias types

use floem_federated::headless::create_pen_event;
use floem_federated_test::prelude::*;

const PRESS_EVENTS: &[&str] = &[
    types::POINTER_DOWN,
    types::POINTER_UP,
    types::POINTER_UP_OUTSIDE,
    types::MOUSE_UP_OUTSIDE,
    types::CLICK,
];

// =============================================================================
// Click counting
// =============================================================================

/// Test that clicks landing within the click interval of each other count up
/// in `detail`.
#[test]
fn test_detail_counts_rapid_clicks() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, &[types::CLICK]);

    harness.click(10.0, 10.0)?;
    harness.set_time(100.0);
    harness.click(10.0, 10.0)?;
    harness.set_time(150.0);
    harness.click(10.0, 10.0)?;

    let details: Vec<u32> = recorder.records().iter().map(|r| r.detail).collect();
    assert_eq!(details, vec![1, 2, 3]);
    Ok(())
}

/// Test that `detail` starts over once the interval has passed, including a
/// click exactly one interval after the last.
#[test]
fn test_detail_resets_after_interval() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, &[types::CLICK]);

    harness.click(10.0, 10.0)?;
    harness.set_time(250.0);
    harness.click(10.0, 10.0)?;
    // Exactly one interval later is already too late.
    harness.set_time(450.0);
    harness.click(10.0, 10.0)?;

    let details: Vec<u32> = recorder.records().iter().map(|r| r.detail).collect();
    assert_eq!(details, vec![1, 1, 1]);
    Ok(())
}

#[test]
fn test_detail_resets_on_other_target() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, &[types::CLICK]);
    recorder.track(harness.scene_mut(), sprites.b, &[types::CLICK]);

    harness.click(10.0, 10.0)?;
    harness.set_time(50.0);
    harness.click(60.0, 10.0)?;
    harness.set_time(100.0);
    harness.click(10.0, 10.0)?;

    let seen: Vec<_> = recorder
        .records()
        .into_iter()
        .map(|r| (r.node.unwrap_or_default(), r.detail))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("a".to_owned(), 1),
            ("b".to_owned(), 1),
            ("a".to_owned(), 1)
        ]
    );
    Ok(())
}

#[test]
fn test_custom_click_interval() -> Result<(), EventError> {
    let (scene, sprites) = sprite_scene();
    let mut harness = TestHarness::with_config(
        scene,
        sprites.root,
        BoundaryConfig::default().click_interval(std::time::Duration::from_millis(500)),
        EventSystemConfig::default(),
    );
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, &[types::CLICK]);

    harness.click(10.0, 10.0)?;
    harness.set_time(400.0);
    harness.click(10.0, 10.0)?;

    assert_eq!(recorder.records()[1].detail, 2);
    Ok(())
}

// =============================================================================
// Press / release pairing
// =============================================================================

/// Test that a click inside a non-interactive container is delivered once to
/// the pressed sprite and never to its sibling.
#[test]
fn test_click_inside_container_reaches_only_pressed_sprite() -> Result<(), EventError> {
    let mut scene = Scene::new();
    let root = scene.create_named("root");
    let container = scene.create_named("container");
    let sprite_a = scene.create_named("a");
    let sprite_b = scene.create_named("b");
    scene.add_child(root, container).unwrap();
    scene.add_child(container, sprite_a).unwrap();
    scene.add_child(container, sprite_b).unwrap();
    interactive_rect(&mut scene, sprite_a, Rect::new(0.0, 0.0, 50.0, 50.0));
    interactive_rect(&mut scene, sprite_b, Rect::new(60.0, 0.0, 110.0, 50.0));
    let mut harness = TestHarness::with_scene(scene, root);
    let on_a = EventRecorder::new();
    on_a.track(harness.scene_mut(), sprite_a, &[types::CLICK]);
    let on_b = EventRecorder::new();
    on_b.track(harness.scene_mut(), sprite_b, PRESS_EVENTS);

    harness.pointer_down(10.0, 10.0)?;
    harness.pointer_up(10.0, 10.0)?;

    let clicks = on_a.records();
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].detail, 1);
    assert!(on_b.is_empty());
    Ok(())
}

/// Test that pressing on one sprite and releasing on its sibling sends
/// `pointerupoutside` to the pressed sprite only.
///
/// The outside walk stops at the shared root and no click is produced.
#[test]
fn test_press_on_a_release_on_b_clicks_neither() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, PRESS_EVENTS);
    recorder.track(harness.scene_mut(), sprites.b, PRESS_EVENTS);
    let root = EventRecorder::new();
    root.track(
        harness.scene_mut(),
        sprites.root,
        &[types::POINTER_UP_OUTSIDE],
    );

    harness.pointer_down(10.0, 10.0)?;
    harness.pointer_up(60.0, 10.0)?;

    assert_eq!(
        recorder.trace(),
        vec![
            "pointerdown@a",
            "pointerup@b",
            "pointerupoutside@a",
            "mouseupoutside@a"
        ]
    );
    assert_eq!(recorder.count(types::CLICK), 0);
    // The root is shared by both paths, so the outside walk stops below it.
    assert!(root.is_empty());
    Ok(())
}

#[test]
fn test_move_away_and_back_still_clicks() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, &[types::CLICK]);

    harness.pointer_down(10.0, 10.0)?;
    assert!(harness.is_pressed(sprites.a));
    harness.pointer_move(60.0, 10.0)?;
    harness.pointer_move(20.0, 20.0)?;
    harness.pointer_up(20.0, 20.0)?;

    assert_eq!(recorder.count(types::CLICK), 1);
    assert!(!harness.is_pressed(sprites.a));
    Ok(())
}

/// Test that releasing on a child of the pressed node still counts as a click
/// on the pressed node.
#[test]
fn test_release_on_descendant_clicks_pressed_ancestor() -> Result<(), EventError> {
    let (mut scene, sprites) = sprite_scene();
    let inner = scene.create_named("inner");
    scene.add_child(sprites.a, inner).unwrap();
    interactive_rect(&mut scene, inner, Rect::new(0.0, 0.0, 20.0, 20.0));
    let mut harness = TestHarness::with_scene(scene, sprites.root);
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, &[types::CLICK]);

    // Press on `a` outside `inner`, release on `inner`.
    harness.pointer_down(40.0, 40.0)?;
    harness.pointer_up(10.0, 10.0)?;

    assert_eq!(recorder.trace(), vec!["click@a"]);
    Ok(())
}

/// Test that a release over empty space walks `pointerupoutside` from the
/// pressed node all the way up to the root, since no path is shared.
#[test]
fn test_release_on_empty_space_walks_to_root() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    for node in [sprites.root, sprites.a] {
        recorder.track(
            harness.scene_mut(),
            node,
            &[types::POINTER_UP_OUTSIDE, types::CLICK],
        );
    }

    harness.pointer_down(10.0, 10.0)?;
    harness.pointer_up(300.0, 300.0)?;

    assert_eq!(
        recorder.trace(),
        vec!["pointerupoutside@a", "pointerupoutside@root"]
    );
    Ok(())
}

/// Test that a release off the surface is treated as an outside release.
#[test]
fn test_release_off_surface_is_outside() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    for node in [sprites.root, sprites.a] {
        recorder.track(
            harness.scene_mut(),
            node,
            &[types::POINTER_UP, types::POINTER_UP_OUTSIDE, types::CLICK],
        );
    }

    harness.pointer_down(10.0, 10.0)?;
    // Reported over `a`'s position, but not on the surface.
    harness.pointer_up_outside(10.0, 10.0)?;

    assert_eq!(
        recorder.trace(),
        vec!["pointerupoutside@a", "pointerupoutside@root"]
    );
    assert!(!harness.is_pressed(sprites.a));
    Ok(())
}

/// Test that detaching the pressed node before release suppresses its click;
/// the outside release goes to its deepest mounted ancestor instead.
#[test]
fn test_detached_press_target_gets_no_click() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    for node in [sprites.root, sprites.a] {
        recorder.track(
            harness.scene_mut(),
            node,
            &[types::POINTER_UP_OUTSIDE, types::CLICK],
        );
    }

    harness.pointer_down(10.0, 10.0)?;
    harness.scene_mut().detach(sprites.a);
    harness.pointer_up(10.0, 10.0)?;

    // The deepest still-mounted node of the press path is the root.
    assert_eq!(recorder.trace(), vec!["pointerupoutside@root"]);
    Ok(())
}

#[test]
fn test_release_without_press_is_plain_pointerup() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, PRESS_EVENTS);

    harness.pointer_up(10.0, 10.0)?;

    assert_eq!(recorder.trace(), vec!["pointerup@a"]);
    Ok(())
}

// =============================================================================
// Pointer kinds
// =============================================================================

#[test]
fn test_secondary_click() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(
        harness.scene_mut(),
        sprites.a,
        &[
            types::MOUSE_DOWN,
            types::RIGHT_DOWN,
            types::RIGHT_UP,
            types::CLICK,
            types::RIGHT_CLICK,
            types::POINTER_TAP,
        ],
    );

    harness.secondary_click(10.0, 10.0)?;

    assert_eq!(
        recorder.types(),
        vec!["rightdown", "rightup", "rightclick", "pointertap"]
    );
    Ok(())
}

#[test]
fn test_primary_and_secondary_counted_separately() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(
        harness.scene_mut(),
        sprites.a,
        &[types::CLICK, types::RIGHT_CLICK],
    );

    harness.click(10.0, 10.0)?;
    harness.secondary_click(10.0, 10.0)?;
    harness.click(10.0, 10.0)?;

    let details: Vec<u32> = recorder.records().iter().map(|r| r.detail).collect();
    assert_eq!(details, vec![1, 1, 2]);
    Ok(())
}

/// Test that pen pointers get `pointertap` but no `click` or `tap`.
#[test]
fn test_pen_gets_pointertap_only() -> Result<(), EventError> {
    let (mut harness, sprites) = sprite_harness();
    let recorder = EventRecorder::new();
    recorder.track(
        harness.scene_mut(),
        sprites.a,
        &[
            types::MOUSE_DOWN,
            types::MOUSE_UP,
            types::CLICK,
            types::POINTER_TAP,
        ],
    );

    harness.dispatch(create_pen_event(types::POINTER_DOWN, 10.0, 10.0, 0.0))?;
    harness.dispatch(create_pen_event(types::POINTER_UP, 10.0, 10.0, 0.0))?;

    assert_eq!(recorder.types(), vec!["mousedown", "mouseup", "pointertap"]);
    assert_eq!(recorder.records()[2].detail, 1);
    Ok(())
}

fn touch_harness() -> (TestHarness, Sprites) {
    let (scene, sprites) = sprite_scene();
    let harness = TestHarness::with_config(
        scene,
        sprites.root,
        BoundaryConfig::default(),
        EventSystemConfig::default().supports_touch_events(true),
    );
    (harness, sprites)
}

#[test]
fn test_tap() -> Result<(), EventError> {
    let (mut harness, sprites) = touch_harness();
    let recorder = EventRecorder::new();
    recorder.track(
        harness.scene_mut(),
        sprites.a,
        &[
            types::POINTER_DOWN,
            types::TOUCH_START,
            types::MOUSE_DOWN,
            types::POINTER_UP,
            types::TOUCH_END,
            types::CLICK,
            types::TAP,
            types::POINTER_TAP,
        ],
    );

    harness.tap(10.0, 10.0)?;

    assert_eq!(
        recorder.types(),
        vec![
            "pointerdown",
            "touchstart",
            "pointerup",
            "touchend",
            "tap",
            "pointertap"
        ]
    );
    Ok(())
}

/// Test that two touch contacts each keep their own press and click state.
#[test]
fn test_simultaneous_touches_tap_independently() -> Result<(), EventError> {
    let (mut harness, sprites) = touch_harness();
    let recorder = EventRecorder::new();
    recorder.track(harness.scene_mut(), sprites.a, &[types::TAP]);
    recorder.track(harness.scene_mut(), sprites.b, &[types::TAP]);

    harness.touch_start(0, 10.0, 10.0)?;
    harness.touch_start(1, 60.0, 10.0)?;
    harness.touch_end(1, 60.0, 10.0)?;
    harness.touch_end(0, 10.0, 10.0)?;

    assert_eq!(recorder.trace(), vec!["tap@b", "tap@a"]);
    Ok(())
}

#[test]
fn test_touch_release_on_other_node_is_touchendoutside() -> Result<(), EventError> {
    let (mut harness, sprites) = touch_harness();
    let recorder = EventRecorder::new();
    recorder.track(
        harness.scene_mut(),
        sprites.a,
        &[types::POINTER_UP_OUTSIDE, types::TOUCH_END_OUTSIDE, types::TAP],
    );

    harness.touch_start(0, 10.0, 10.0)?;
    harness.touch_end(0, 60.0, 10.0)?;

    assert_eq!(recorder.types(), vec!["pointerupoutside", "touchendoutside"]);
    Ok(())
}

/// Test that `touchcancel` is delivered to the node the touch pressed, and
/// that a later `touchend` for the same contact produces no tap.
#[test]
fn test_touch_cancel_reaches_press_target() -> Result<(), EventError> {
    let (mut harness, sprites) = touch_harness();
    let recorder = EventRecorder::new();
    recorder.track(
        harness.scene_mut(),
        sprites.a,
        &[types::POINTER_CANCEL, types::TOUCH_CANCEL, types::TAP],
    );

    harness.touch_start(0, 10.0, 10.0)?;
    harness.touch_cancel(0, 10.0, 10.0)?;
    harness.touch_end(0, 10.0, 10.0)?;

    assert_eq!(recorder.types(), vec!["pointercancel", "touchcancel"]);
    Ok(())
}
