//! # Federated events
//!
//! A [`FederatedEvent`] is the host-independent form of a pointer or wheel
//! event. It carries the DOM-like propagation state (target, current target,
//! phase, stop flags) alongside the pointer or wheel payload, and is delivered
//! to scene listeners by an [`EventBoundary`].
//!
//! The submodules split the pipeline the same way dispatch runs:
//! - [`hit_test`] finds the topmost interactive node under a point
//! - [`path`] builds the root-to-target propagation path
//! - [`boundary`] owns dispatch, the mapping table and per-pointer tracking
//! - `mapping` holds the built-in mappers that derive over/out, outside and
//!   click semantics from raw down/move/up events

pub mod boundary;
mod mapping;
pub mod path;
pub mod tracking;

pub use boundary::{BoundaryConfig, EventBoundary, EventMapper, EventObserver};
pub use path::EventPath;

use std::borrow::Cow;

use peniko::kurbo::{Point, Vec2};
use ui_events::{
    keyboard::Modifiers,
    pointer::{PointerId, PointerType},
};

use crate::pointer::{MouseButton, PointerButtons};
use crate::scene::NodeId;

/// Canonical event type names.
pub mod types {
    pub const POINTER_DOWN: &str = "pointerdown";
    pub const POINTER_UP: &str = "pointerup";
    pub const POINTER_UP_OUTSIDE: &str = "pointerupoutside";
    pub const POINTER_MOVE: &str = "pointermove";
    pub const POINTER_OVER: &str = "pointerover";
    pub const POINTER_OUT: &str = "pointerout";
    pub const POINTER_ENTER: &str = "pointerenter";
    pub const POINTER_LEAVE: &str = "pointerleave";
    pub const POINTER_CANCEL: &str = "pointercancel";
    pub const POINTER_TAP: &str = "pointertap";
    pub const GLOBAL_POINTER_MOVE: &str = "globalpointermove";

    pub const MOUSE_DOWN: &str = "mousedown";
    pub const MOUSE_UP: &str = "mouseup";
    pub const MOUSE_UP_OUTSIDE: &str = "mouseupoutside";
    pub const MOUSE_MOVE: &str = "mousemove";
    pub const MOUSE_OVER: &str = "mouseover";
    pub const MOUSE_OUT: &str = "mouseout";
    pub const MOUSE_ENTER: &str = "mouseenter";
    pub const MOUSE_LEAVE: &str = "mouseleave";
    pub const GLOBAL_MOUSE_MOVE: &str = "globalmousemove";
    pub const CLICK: &str = "click";

    pub const RIGHT_DOWN: &str = "rightdown";
    pub const RIGHT_UP: &str = "rightup";
    pub const RIGHT_UP_OUTSIDE: &str = "rightupoutside";
    pub const RIGHT_CLICK: &str = "rightclick";

    pub const TOUCH_START: &str = "touchstart";
    pub const TOUCH_END: &str = "touchend";
    pub const TOUCH_END_OUTSIDE: &str = "touchendoutside";
    pub const TOUCH_MOVE: &str = "touchmove";
    pub const TOUCH_CANCEL: &str = "touchcancel";
    pub const GLOBAL_TOUCH_MOVE: &str = "globaltouchmove";
    pub const TAP: &str = "tap";

    pub const WHEEL: &str = "wheel";
}

/// Where an event currently is in its propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventPhase {
    /// Not being dispatched.
    #[default]
    None,
    /// Travelling from the root down towards the target.
    Capturing,
    /// Being delivered to the target itself.
    AtTarget,
    /// Travelling from the target's parent back up to the root.
    Bubbling,
}

/// Pointer-specific fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerData {
    pub pointer_id: PointerId,
    pub pointer_type: PointerType,
    pub is_primary: bool,
    /// Contact width in CSS pixels.
    pub width: f64,
    /// Contact height in CSS pixels.
    pub height: f64,
    /// Normalized pressure in `[0, 1]`.
    pub pressure: f32,
    pub tangential_pressure: f32,
    pub tilt_x: f32,
    pub tilt_y: f32,
    pub twist: f32,
}

impl Default for PointerData {
    fn default() -> Self {
        Self {
            pointer_id: PointerId::PRIMARY,
            pointer_type: PointerType::Mouse,
            is_primary: true,
            width: 1.0,
            height: 1.0,
            pressure: 0.0,
            tangential_pressure: 0.0,
            tilt_x: 0.0,
            tilt_y: 0.0,
            twist: 0.0,
        }
    }
}

/// Unit of a wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Wheel-specific fields.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelData {
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_z: f64,
    pub delta_mode: DeltaMode,
}

/// The variant part of a [`FederatedEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventPayload {
    Pointer(PointerData),
    Wheel(WheelData),
}

impl Default for EventPayload {
    fn default() -> Self {
        EventPayload::Pointer(PointerData::default())
    }
}

/// A normalized pointer or wheel event travelling through a scene.
#[derive(Debug, Clone, Default)]
pub struct FederatedEvent {
    /// Event type name, e.g. `"pointerdown"`.
    pub ty: Cow<'static, str>,
    /// The node the event was dispatched to.
    pub target: Option<NodeId>,
    /// The node whose listeners are currently running.
    pub current_target: Option<NodeId>,
    pub phase: EventPhase,
    /// Cached composed path, root first.
    pub(crate) path: EventPath,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    default_prevented: bool,
    /// Milliseconds on the host clock.
    pub timestamp: f64,
    /// Whether the event came from real user input.
    pub trusted: bool,
    /// Click count for click-like events, otherwise `0`.
    pub detail: u32,
    /// Set when the normalizer synthesized the pointer fields from a legacy
    /// mouse or touch event.
    pub normalized: bool,
    pub button: MouseButton,
    pub buttons: PointerButtons,
    pub modifiers: Modifiers,
    /// Position in the host surface's client space.
    pub client: Point,
    /// Position in host screen space.
    pub screen: Point,
    /// Position in world space, used for hit testing.
    pub global: Point,
    pub movement: Vec2,
    pub payload: EventPayload,
}

impl FederatedEvent {
    /// A pointer event of type `ty` with mouse defaults.
    pub fn pointer(ty: impl Into<Cow<'static, str>>) -> Self {
        Self {
            ty: ty.into(),
            ..Self::default()
        }
    }

    /// A wheel event of type `ty`.
    pub fn wheel(ty: impl Into<Cow<'static, str>>, data: WheelData) -> Self {
        Self {
            ty: ty.into(),
            button: MouseButton::None,
            payload: EventPayload::Wheel(data),
            ..Self::default()
        }
    }

    pub fn with_global(mut self, global: impl Into<Point>) -> Self {
        self.global = global.into();
        self
    }

    pub fn with_client(mut self, client: impl Into<Point>) -> Self {
        self.client = client.into();
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the pointer identity. No effect on wheel events.
    pub fn with_pointer(mut self, pointer_id: PointerId, pointer_type: PointerType) -> Self {
        if let EventPayload::Pointer(data) = &mut self.payload {
            data.pointer_id = pointer_id;
            data.pointer_type = pointer_type;
            data.is_primary = pointer_id == PointerId::PRIMARY;
        }
        self
    }

    pub fn pointer_data(&self) -> Option<&PointerData> {
        match &self.payload {
            EventPayload::Pointer(data) => Some(data),
            EventPayload::Wheel(_) => None,
        }
    }

    pub fn pointer_data_mut(&mut self) -> Option<&mut PointerData> {
        match &mut self.payload {
            EventPayload::Pointer(data) => Some(data),
            EventPayload::Wheel(_) => None,
        }
    }

    pub fn wheel_data(&self) -> Option<&WheelData> {
        match &self.payload {
            EventPayload::Wheel(data) => Some(data),
            EventPayload::Pointer(_) => None,
        }
    }

    /// Pointer id; wheel events report the primary pointer.
    pub fn pointer_id(&self) -> PointerId {
        self.pointer_data()
            .map(|d| d.pointer_id)
            .unwrap_or(PointerId::PRIMARY)
    }

    /// Pointer kind; wheel events report a mouse.
    pub fn pointer_type(&self) -> PointerType {
        self.pointer_data()
            .map(|d| d.pointer_type)
            .unwrap_or(PointerType::Mouse)
    }

    pub fn is_primary(&self) -> bool {
        self.pointer_data().is_none_or(|d| d.is_primary)
    }

    /// Mouse and pen pointers receive the `mouse*` aliases.
    pub fn is_mouse_like(&self) -> bool {
        matches!(self.pointer_type(), PointerType::Mouse | PointerType::Pen)
    }

    pub fn is_touch(&self) -> bool {
        matches!(self.pointer_type(), PointerType::Touch)
    }

    /// The path the event travels, root first, as computed at dispatch.
    pub fn composed_path(&self) -> &[NodeId] {
        &self.path
    }

    /// Stop after the listeners of the current node have run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop immediately, skipping the remaining listeners of the current node.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub(crate) fn clear_propagation_flags(&mut self) {
        self.propagation_stopped = false;
        self.immediate_propagation_stopped = false;
    }

    /// Copy of this event that shares no dispatch state with it.
    ///
    /// The propagation flags, phase and cached path are cleared so the copy
    /// can be dispatched on its own.
    pub fn detached_clone(&self) -> Self {
        let mut clone = self.clone();
        clone.path.clear();
        clone.phase = EventPhase::None;
        clone.current_target = None;
        clone.clear_propagation_flags();
        clone.default_prevented = false;
        clone
    }

    /// Overwrite this event with a detached copy of `other`, keeping this
    /// event's path allocation.
    pub(crate) fn copy_from(&mut self, other: &Self) {
        let mut path = std::mem::take(&mut self.path);
        path.clear();
        *self = other.detached_clone();
        self.path = path;
    }

    /// Return to the default state while keeping the path allocation.
    pub(crate) fn reset(&mut self) {
        let mut path = std::mem::take(&mut self.path);
        path.clear();
        *self = Self {
            path,
            ..Self::default()
        };
    }
}
