//! Built-in event mappers.
//!
//! Each mapper turns one incoming event type into the federated events
//! listeners see. Raw `pointerdown`/`pointermove`/`pointerup` are expanded
//! into hover transitions, outside releases and clicks, using the pointer's
//! [`TrackingRecord`](super::tracking::TrackingRecord) to remember what was
//! pressed and hovered.
//!
//! Mouse and pen pointers also get the legacy `mouse*` aliases, touch
//! pointers the `touch*` ones. Aliases are the same event dispatched again
//! under another type name.

use ui_events::pointer::PointerType;

use super::{EventBoundary, EventPhase, FederatedEvent, path::EventPath, types};
use crate::error::EventError;
use crate::scene::{NodeId, Scene};

pub(crate) fn register_defaults(boundary: &mut EventBoundary) {
    boundary.add_event_mapping(types::POINTER_DOWN, map_pointer_down);
    boundary.add_event_mapping(types::POINTER_MOVE, map_pointer_move);
    boundary.add_event_mapping(types::POINTER_OUT, map_pointer_out);
    boundary.add_event_mapping(types::POINTER_LEAVE, map_pointer_out);
    boundary.add_event_mapping(types::POINTER_OVER, map_pointer_over);
    boundary.add_event_mapping(types::POINTER_UP, map_pointer_up);
    boundary.add_event_mapping(types::POINTER_UP_OUTSIDE, map_pointer_up_outside);
    boundary.add_event_mapping(types::POINTER_CANCEL, map_pointer_cancel);
    boundary.add_event_mapping(types::WHEEL, map_wheel);
}

fn expect_pointer(from: &FederatedEvent) -> bool {
    let ok = from.pointer_data().is_some();
    if !ok {
        log::warn!("{} mapping received a non-pointer event", from.ty);
    }
    ok
}

/// A copy of `from` retyped to `ty` and aimed at whatever is under it.
fn hit_event(
    boundary: &mut EventBoundary,
    scene: &Scene,
    from: &FederatedEvent,
    ty: &'static str,
) -> FederatedEvent {
    let path = boundary.hit_test_path(scene, from.global);
    let target = path.as_ref().and_then(|p| p.last().copied());
    let mut event = boundary.create_event(from, ty, target);
    if let Some(path) = path {
        // Already root to target, so dispatch can reuse it.
        event.path = path;
    }
    event
}

/// Deliver `event` to `node` alone, as a non-bubbling event.
fn notify_at(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    event: &mut FederatedEvent,
    node: NodeId,
    ty: &str,
) {
    event.clear_propagation_flags();
    event.target = Some(node);
    event.current_target = Some(node);
    event.phase = EventPhase::AtTarget;
    boundary.notify_target(scene, event, ty);
}

fn cursor_of(scene: &Scene, target: Option<NodeId>) -> Option<String> {
    target.and_then(|t| scene.cursor(t)).map(str::to_owned)
}

/// The prefix of `path` that is still mounted, ending at `mounted`.
fn mounted_prefix(path: &[NodeId], mounted: NodeId) -> &[NodeId] {
    let len = path.iter().position(|&n| n == mounted).map_or(0, |i| i + 1);
    &path[..len]
}

// ============================================================================
// Aliases
// ============================================================================

fn down_alias(event: &FederatedEvent) -> Option<&'static str> {
    match event.pointer_type() {
        PointerType::Touch => Some(types::TOUCH_START),
        PointerType::Mouse | PointerType::Pen if event.button.is_secondary() => {
            Some(types::RIGHT_DOWN)
        }
        PointerType::Mouse | PointerType::Pen => Some(types::MOUSE_DOWN),
        _ => None,
    }
}

fn up_alias(event: &FederatedEvent) -> Option<&'static str> {
    match event.pointer_type() {
        PointerType::Touch => Some(types::TOUCH_END),
        PointerType::Mouse | PointerType::Pen if event.button.is_secondary() => {
            Some(types::RIGHT_UP)
        }
        PointerType::Mouse | PointerType::Pen => Some(types::MOUSE_UP),
        _ => None,
    }
}

fn up_outside_alias(event: &FederatedEvent) -> Option<&'static str> {
    match event.pointer_type() {
        PointerType::Touch => Some(types::TOUCH_END_OUTSIDE),
        PointerType::Mouse | PointerType::Pen if event.button.is_secondary() => {
            Some(types::RIGHT_UP_OUTSIDE)
        }
        PointerType::Mouse | PointerType::Pen => Some(types::MOUSE_UP_OUTSIDE),
        _ => None,
    }
}

fn move_aliases(event: &FederatedEvent) -> Option<(&'static str, &'static str)> {
    match event.pointer_type() {
        PointerType::Touch => Some((types::TOUCH_MOVE, types::GLOBAL_TOUCH_MOVE)),
        PointerType::Mouse | PointerType::Pen => Some((types::MOUSE_MOVE, types::GLOBAL_MOUSE_MOVE)),
        _ => None,
    }
}

// ============================================================================
// Hover transitions
// ============================================================================

/// `pointerleave` on each node of `hovered`, innermost first, stopping at the
/// first node that is also in `keep`.
fn leave_walk(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    from: &FederatedEvent,
    hovered: &[NodeId],
    keep: &[NodeId],
) {
    let mouse_like = from.is_mouse_like();
    let mut leave = boundary.create_event(from, types::POINTER_LEAVE, None);
    for &node in hovered.iter().rev() {
        if keep.contains(&node) {
            break;
        }
        notify_at(boundary, scene, &mut leave, node, types::POINTER_LEAVE);
        if mouse_like {
            notify_at(boundary, scene, &mut leave, node, types::MOUSE_LEAVE);
        }
    }
    boundary.free_event(leave);
}

/// `pointerenter` on each node of `path` that was not hovered before,
/// outermost first.
fn enter_walk(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    from: &FederatedEvent,
    path: &[NodeId],
    hovered: &[NodeId],
) {
    let mouse_like = from.is_mouse_like();
    let mut enter = boundary.create_event(from, types::POINTER_ENTER, None);
    for &node in path {
        if hovered.contains(&node) {
            continue;
        }
        notify_at(boundary, scene, &mut enter, node, types::POINTER_ENTER);
        if mouse_like {
            notify_at(boundary, scene, &mut enter, node, types::MOUSE_ENTER);
        }
    }
    boundary.free_event(enter);
}

// ============================================================================
// Mappers
// ============================================================================

fn map_pointer_down(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    from: &FederatedEvent,
) -> Result<(), EventError> {
    if !expect_pointer(from) {
        return Ok(());
    }
    let mut event = hit_event(boundary, scene, from, types::POINTER_DOWN);
    boundary.dispatch_event(scene, &mut event)?;
    if let Some(alias) = down_alias(&event) {
        boundary.dispatch_event_as(scene, &mut event, alias)?;
    }

    let pressed: EventPath = event.path.clone();
    let record = boundary.track(from);
    if !pressed.is_empty() {
        record.press_targets_by_button.insert(from.button, pressed);
    }
    boundary.free_event(event);
    Ok(())
}

fn map_pointer_move(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    from: &FederatedEvent,
) -> Result<(), EventError> {
    if !expect_pointer(from) {
        return Ok(());
    }
    let mouse_like = from.is_mouse_like();
    let mut event = hit_event(boundary, scene, from, types::POINTER_MOVE);
    let new_path = event.path.clone();
    let target = event.target;

    let old_path = boundary.track(from).over_targets.clone().unwrap_or_default();
    let out_target = boundary.find_mounted(scene, &old_path);
    let hovered = out_target.map_or(&[][..], |t| mounted_prefix(&old_path, t));

    // out, then leave
    if let Some(out_target) = out_target
        && !new_path.contains(&out_target)
    {
        let mut out = boundary.create_event(from, types::POINTER_OUT, Some(out_target));
        boundary.dispatch_event(scene, &mut out)?;
        if mouse_like {
            boundary.dispatch_event_as(scene, &mut out, types::MOUSE_OUT)?;
        }
        boundary.free_event(out);
        leave_walk(boundary, scene, from, hovered, &new_path);
    }

    // over, then enter
    if let Some(target) = target
        && out_target != Some(target)
    {
        let mut over = boundary.create_event(from, types::POINTER_OVER, Some(target));
        over.path = new_path.clone();
        boundary.dispatch_event(scene, &mut over)?;
        if mouse_like {
            boundary.dispatch_event_as(scene, &mut over, types::MOUSE_OVER)?;
        }
        boundary.free_event(over);
        enter_walk(boundary, scene, from, &new_path, hovered);
    }

    let move_on_all = boundary.config().move_on_all;
    let global = boundary.config().enable_global_move_events;
    let aliases = move_aliases(&event);

    if move_on_all {
        boundary.broadcast(scene, &mut event, types::POINTER_MOVE);
    } else {
        boundary.dispatch_event(scene, &mut event)?;
    }
    if global {
        boundary.broadcast(scene, &mut event, types::GLOBAL_POINTER_MOVE);
    }
    if let Some((local, global_alias)) = aliases {
        if move_on_all {
            boundary.broadcast(scene, &mut event, local);
        } else {
            boundary.dispatch_event_as(scene, &mut event, local)?;
        }
        if global {
            boundary.broadcast(scene, &mut event, global_alias);
        }
    }

    boundary.set_cursor(cursor_of(scene, target));
    boundary.track(from).over_targets = (!new_path.is_empty()).then_some(new_path);
    boundary.free_event(event);
    Ok(())
}

fn map_pointer_over(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    from: &FederatedEvent,
) -> Result<(), EventError> {
    if !expect_pointer(from) {
        return Ok(());
    }
    let mut event = hit_event(boundary, scene, from, types::POINTER_OVER);
    boundary.dispatch_event(scene, &mut event)?;
    if from.is_mouse_like() {
        boundary.dispatch_event_as(scene, &mut event, types::MOUSE_OVER)?;
    }

    let path = event.path.clone();
    boundary.set_cursor(cursor_of(scene, event.target));
    enter_walk(boundary, scene, from, &path, &[]);
    boundary.track(from).over_targets = (!path.is_empty()).then_some(path);
    boundary.free_event(event);
    Ok(())
}

fn map_pointer_out(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    from: &FederatedEvent,
) -> Result<(), EventError> {
    if !expect_pointer(from) {
        return Ok(());
    }
    if let Some(old_path) = boundary.track(from).over_targets.take()
        && let Some(out_target) = boundary.find_mounted(scene, &old_path)
    {
        let mut out = boundary.create_event(from, types::POINTER_OUT, Some(out_target));
        boundary.dispatch_event(scene, &mut out)?;
        if from.is_mouse_like() {
            boundary.dispatch_event_as(scene, &mut out, types::MOUSE_OUT)?;
        }
        boundary.free_event(out);
        leave_walk(
            boundary,
            scene,
            from,
            mounted_prefix(&old_path, out_target),
            &[],
        );
    }
    boundary.set_cursor(None);
    Ok(())
}

fn map_pointer_up(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    from: &FederatedEvent,
) -> Result<(), EventError> {
    if !expect_pointer(from) {
        return Ok(());
    }
    let mut event = hit_event(boundary, scene, from, types::POINTER_UP);
    boundary.dispatch_event(scene, &mut event)?;
    if let Some(alias) = up_alias(&event) {
        boundary.dispatch_event_as(scene, &mut event, alias)?;
    }

    let press_path = boundary
        .track(from)
        .press_targets_by_button
        .remove(&from.button);
    let press = press_path.and_then(|p| boundary.find_mounted(scene, &p));

    let mut click_target = press;
    if let Some(press) = press
        && !event.path.contains(&press)
    {
        let up_path = event.path.clone();
        outside_walk(boundary, scene, from, press, &up_path)?;
        click_target = None;
    }

    if let Some(target) = click_target {
        dispatch_click(boundary, scene, &event, target)?;
    }
    boundary.free_event(event);
    Ok(())
}

fn map_pointer_up_outside(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    from: &FederatedEvent,
) -> Result<(), EventError> {
    if !expect_pointer(from) {
        return Ok(());
    }
    let press_path = boundary
        .track(from)
        .press_targets_by_button
        .remove(&from.button);
    if let Some(press) = press_path.and_then(|p| boundary.find_mounted(scene, &p)) {
        outside_walk(boundary, scene, from, press, &[])?;
    }
    Ok(())
}

fn map_pointer_cancel(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    from: &FederatedEvent,
) -> Result<(), EventError> {
    if !expect_pointer(from) {
        return Ok(());
    }
    let press_path = boundary.tracking(from.pointer_id()).and_then(|record| {
        record
            .press_path(from.button)
            .or_else(|| record.press_targets_by_button.values().next())
            .cloned()
    });
    let target = press_path.and_then(|p| boundary.find_mounted(scene, &p));

    let mut event = boundary.create_event(from, types::POINTER_CANCEL, target);
    boundary.dispatch_event(scene, &mut event)?;
    if from.is_touch() {
        boundary.dispatch_event_as(scene, &mut event, types::TOUCH_CANCEL)?;
    }
    boundary.free_event(event);
    boundary.forget_pointer(from.pointer_id());
    Ok(())
}

fn map_wheel(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    from: &FederatedEvent,
) -> Result<(), EventError> {
    if from.wheel_data().is_none() {
        log::warn!("{} mapping received a non-wheel event", from.ty);
        return Ok(());
    }
    let mut event = hit_event(boundary, scene, from, types::WHEEL);
    boundary.dispatch_event(scene, &mut event)?;
    boundary.free_event(event);
    Ok(())
}

// ============================================================================
// Release helpers
// ============================================================================

/// `pointerupoutside` on `press` and its ancestors, stopping before the first
/// node in `stop_at`. With an empty `stop_at` the walk ends at the root.
fn outside_walk(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    from: &FederatedEvent,
    press: NodeId,
    stop_at: &[NodeId],
) -> Result<(), EventError> {
    let alias = up_outside_alias(from);
    let limit = boundary.config().propagation_limit;
    let root = boundary.root_target();
    let mut outside = boundary.create_event(from, types::POINTER_UP_OUTSIDE, Some(press));

    let mut current = Some(press);
    let mut hops = 0;
    while let Some(node) = current {
        if stop_at.contains(&node) {
            break;
        }
        if hops > limit {
            return Err(EventError::DisconnectedTarget {
                target: press,
                limit,
            });
        }
        notify_at(boundary, scene, &mut outside, node, types::POINTER_UP_OUTSIDE);
        if let Some(alias) = alias {
            notify_at(boundary, scene, &mut outside, node, alias);
        }
        if Some(node) == root {
            break;
        }
        current = scene.parent(node);
        hops += 1;
    }
    boundary.free_event(outside);
    Ok(())
}

/// Count and dispatch the click for a release on `target`.
fn dispatch_click(
    boundary: &mut EventBoundary,
    scene: &mut Scene,
    up: &FederatedEvent,
    target: NodeId,
) -> Result<(), EventError> {
    let interval = boundary.config().click_interval.as_secs_f64() * 1000.0;
    let detail = boundary
        .track(up)
        .register_click(up.button, target, up.timestamp, interval);

    let ty = match up.pointer_type() {
        PointerType::Mouse if up.button.is_secondary() => types::RIGHT_CLICK,
        PointerType::Mouse => types::CLICK,
        PointerType::Touch => types::TAP,
        _ => types::POINTER_TAP,
    };
    let mut click = boundary.create_event(up, ty, Some(target));
    click.detail = detail;
    if ty != types::POINTER_TAP {
        boundary.dispatch_event(scene, &mut click)?;
    }
    boundary.dispatch_event_as(scene, &mut click, types::POINTER_TAP)?;
    boundary.free_event(click);
    Ok(())
}
