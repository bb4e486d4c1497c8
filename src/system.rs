//! # Event system
//!
//! [`EventSystem`] is the entry point for host input. It normalizes
//! [`NativeEvent`]s into federated events and hands them to its
//! [`EventBoundary`]:
//!
//! 1. **Normalize**: mouse and touch input becomes pointer-event shaped data,
//!    with defaults for whatever the host left out
//! 2. **Map coordinates**: client positions become world positions using the
//!    surface's bounds, backing size and resolution
//! 3. **Rename**: legacy type names become the canonical `pointer*` names
//! 4. **Map**: the boundary derives and dispatches the federated events
//! 5. **Cursor**: the cursor the boundary settled on is applied to the surface
//!
//! The system also drives the [`EventsTicker`], replaying the last pointer
//! position while the pointer is stationary.

use std::{borrow::Cow, time::Duration};

use bitflags::bitflags;
use peniko::kurbo::{Point, Rect, Size};
use smallvec::SmallVec;
use ui_events::pointer::{PointerId, PointerType};

use crate::cursor::CursorStyles;
use crate::error::EventError;
use crate::event::{
    EventBoundary, EventPayload, FederatedEvent, PointerData, WheelData, types,
};
use crate::native::{
    NativeEvent, NativeMouseEvent, NativePointerEvent, NativeTouchEvent, NativeWheelEvent,
};
use crate::pointer::{MouseButton, PointerButtons};
use crate::scene::Scene;
use crate::ticker::EventsTicker;

/// Touch identifiers are shifted by this much so they never collide with the
/// mouse's [`PointerId::PRIMARY`].
pub const TOUCH_POINTER_ID_OFFSET: u64 = 2;

/// The render surface events are reported against.
pub trait HostSurface {
    /// Surface bounds in client space (CSS pixels).
    fn bounding_rect(&self) -> Rect;

    /// Size of the backing store in device pixels.
    fn backing_size(&self) -> Size;

    /// Set the CSS cursor shown over the surface.
    fn set_cursor(&mut self, cursor: &str);

    /// Apply one style property to the surface.
    fn apply_style(&mut self, property: &str, value: &str) {
        let _ = (property, value);
    }

    /// Surfaces without a style object (e.g. offscreen ones) return `false`.
    fn supports_styles(&self) -> bool {
        true
    }
}

bitflags! {
    /// Which kinds of input the system handles.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EventFeatures: u8 {
        /// Down, up, over and out, and with them clicks.
        const CLICK = 1;
        const MOVE = 1 << 1;
        const WHEEL = 1 << 2;
        /// `globalpointermove` broadcasts.
        const GLOBAL_MOVE = 1 << 3;
    }
}

impl Default for EventFeatures {
    fn default() -> Self {
        Self::all()
    }
}

/// What the host should do with the native event after handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultAction {
    #[default]
    Allow,
    /// Suppress the host's default action, e.g. scrolling or the compatibility
    /// mouse events a browser emits after touch input.
    Prevent,
}

impl DefaultAction {
    pub fn is_prevented(self) -> bool {
        self == DefaultAction::Prevent
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventSystemConfig {
    pub features: EventFeatures,
    /// Device pixels per world unit.
    pub resolution: f64,
    /// Prevent the host default for normalized (mouse or touch) input.
    pub auto_prevent_default: bool,
    /// The host reports touch events; pointer events of type touch are then
    /// ignored so a contact is not handled twice.
    pub supports_touch_events: bool,
    /// The host reports pointer events; legacy mouse events are then ignored.
    pub supports_pointer_events: bool,
    /// How long the pointer may stay still before its position is replayed.
    pub interaction_interval: Duration,
}

impl Default for EventSystemConfig {
    fn default() -> Self {
        Self {
            features: EventFeatures::default(),
            resolution: 1.0,
            auto_prevent_default: true,
            supports_touch_events: false,
            supports_pointer_events: true,
            // Ten frames at 60 Hz.
            interaction_interval: Duration::from_micros(166_667),
        }
    }
}

impl EventSystemConfig {
    pub fn features(mut self, features: EventFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn auto_prevent_default(mut self, auto_prevent_default: bool) -> Self {
        self.auto_prevent_default = auto_prevent_default;
        self
    }

    pub fn supports_touch_events(mut self, supported: bool) -> Self {
        self.supports_touch_events = supported;
        self
    }

    pub fn supports_pointer_events(mut self, supported: bool) -> Self {
        self.supports_pointer_events = supported;
        self
    }

    pub fn interaction_interval(mut self, interval: Duration) -> Self {
        self.interaction_interval = interval;
        self
    }
}

/// Canonical name for a host event type.
///
/// `mouse*` becomes `pointer*`, touch types become their pointer
/// counterparts, and enter/leave become over/out.
pub fn canonical_type(ty: &str) -> Cow<'static, str> {
    let canonical = match ty {
        types::POINTER_LEAVE | types::MOUSE_LEAVE | types::POINTER_OUT | types::MOUSE_OUT => {
            types::POINTER_OUT
        }
        types::POINTER_ENTER | types::MOUSE_ENTER | types::POINTER_OVER | types::MOUSE_OVER => {
            types::POINTER_OVER
        }
        types::POINTER_DOWN | types::MOUSE_DOWN | types::TOUCH_START => types::POINTER_DOWN,
        types::POINTER_UP | types::MOUSE_UP | types::TOUCH_END => types::POINTER_UP,
        types::POINTER_UP_OUTSIDE | types::MOUSE_UP_OUTSIDE | types::TOUCH_END_OUTSIDE => {
            types::POINTER_UP_OUTSIDE
        }
        types::POINTER_MOVE | types::MOUSE_MOVE | types::TOUCH_MOVE => types::POINTER_MOVE,
        types::POINTER_CANCEL | types::TOUCH_CANCEL => types::POINTER_CANCEL,
        types::WHEEL => types::WHEEL,
        other => match other.strip_prefix("mouse") {
            Some(rest) => return Cow::Owned(format!("pointer{rest}")),
            None => return Cow::Owned(other.to_owned()),
        },
    };
    Cow::Borrowed(canonical)
}

pub struct EventSystem<S: HostSurface> {
    surface: S,
    boundary: EventBoundary,
    config: EventSystemConfig,
    cursor_styles: CursorStyles,
    root_pointer_event: FederatedEvent,
    root_wheel_event: FederatedEvent,
    ticker: EventsTicker,
    primary_touch: Option<u64>,
    has_pointer: bool,
    /// Host time in milliseconds, advanced by real events and by `tick`.
    clock: f64,
}

impl<S: HostSurface> EventSystem<S> {
    pub fn new(surface: S, mut boundary: EventBoundary, config: EventSystemConfig) -> Self {
        boundary.config_mut().enable_global_move_events =
            config.features.contains(EventFeatures::GLOBAL_MOVE);
        let ticker = EventsTicker::new(config.interaction_interval);
        Self {
            surface,
            boundary,
            config,
            cursor_styles: CursorStyles::default(),
            root_pointer_event: FederatedEvent::default(),
            root_wheel_event: FederatedEvent::wheel(types::WHEEL, WheelData::default()),
            ticker,
            primary_touch: None,
            has_pointer: false,
            clock: 0.0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn boundary(&self) -> &EventBoundary {
        &self.boundary
    }

    pub fn boundary_mut(&mut self) -> &mut EventBoundary {
        &mut self.boundary
    }

    pub fn config(&self) -> &EventSystemConfig {
        &self.config
    }

    pub fn features(&self) -> EventFeatures {
        self.config.features
    }

    pub fn set_features(&mut self, features: EventFeatures) {
        self.config.features = features;
        self.boundary.config_mut().enable_global_move_events =
            features.contains(EventFeatures::GLOBAL_MOVE);
    }

    pub fn set_resolution(&mut self, resolution: f64) {
        self.config.resolution = resolution;
    }

    pub fn cursor_styles(&self) -> &CursorStyles {
        &self.cursor_styles
    }

    pub fn cursor_styles_mut(&mut self) -> &mut CursorStyles {
        &mut self.cursor_styles
    }

    pub fn ticker(&self) -> &EventsTicker {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut EventsTicker {
        &mut self.ticker
    }

    /// The last pointer event the system built, reused for every pointer input.
    pub fn last_pointer_event(&self) -> Option<&FederatedEvent> {
        self.has_pointer.then_some(&self.root_pointer_event)
    }

    /// Show `mode` on the surface, `None` meaning the default cursor.
    pub fn set_cursor(&mut self, mode: Option<&str>) {
        self.cursor_styles.apply(mode, &mut self.surface);
    }

    fn sync_cursor(&mut self) {
        let mode = self.boundary.cursor().map(str::to_owned);
        self.cursor_styles.apply(mode.as_deref(), &mut self.surface);
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Route a native event to the matching handler.
    pub fn handle_event(
        &mut self,
        scene: &mut Scene,
        event: &NativeEvent,
    ) -> Result<DefaultAction, EventError> {
        if let NativeEvent::Wheel(wheel) = event {
            return self.on_wheel(scene, wheel);
        }
        match canonical_type(event.ty()).as_ref() {
            types::POINTER_DOWN => self.on_pointer_down(scene, event),
            types::POINTER_MOVE => self.on_pointer_move(scene, event),
            types::POINTER_UP | types::POINTER_UP_OUTSIDE => self.on_pointer_up(scene, event),
            types::POINTER_OVER | types::POINTER_OUT => self.on_pointer_over_out(scene, event),
            types::POINTER_CANCEL => self.on_pointer_cancel(scene, event),
            other => {
                log::debug!("ignoring native event of type {other}");
                Ok(DefaultAction::Allow)
            }
        }
    }

    pub fn on_pointer_down(
        &mut self,
        scene: &mut Scene,
        event: &NativeEvent,
    ) -> Result<DefaultAction, EventError> {
        if !self.config.features.contains(EventFeatures::CLICK) {
            return Ok(DefaultAction::Allow);
        }
        let events = self.normalize_to_pointer_data(event);
        let action = if self.config.auto_prevent_default
            && events.first().is_some_and(|e| e.normalized)
        {
            DefaultAction::Prevent
        } else {
            DefaultAction::Allow
        };
        for native in &events {
            self.bootstrap_event(native, None);
            self.boundary.map_event(scene, &self.root_pointer_event)?;
        }
        self.sync_cursor();
        Ok(action)
    }

    pub fn on_pointer_move(
        &mut self,
        scene: &mut Scene,
        event: &NativeEvent,
    ) -> Result<DefaultAction, EventError> {
        if !self.config.features.contains(EventFeatures::MOVE) {
            return Ok(DefaultAction::Allow);
        }
        let events = self.normalize_to_pointer_data(event);
        if !events.is_empty() {
            self.ticker.did_move();
        }
        for native in &events {
            self.bootstrap_event(native, None);
            self.boundary.map_event(scene, &self.root_pointer_event)?;
        }
        self.sync_cursor();
        Ok(DefaultAction::Allow)
    }

    /// Releases reported away from the surface become `pointerupoutside`.
    pub fn on_pointer_up(
        &mut self,
        scene: &mut Scene,
        event: &NativeEvent,
    ) -> Result<DefaultAction, EventError> {
        if !self.config.features.contains(EventFeatures::CLICK) {
            return Ok(DefaultAction::Allow);
        }
        let events = self.normalize_to_pointer_data(event);
        for native in &events {
            let outside = !native.on_surface;
            let ty = outside.then_some(types::POINTER_UP_OUTSIDE);
            self.bootstrap_event(native, ty);
            self.boundary.map_event(scene, &self.root_pointer_event)?;
        }
        self.sync_cursor();
        Ok(DefaultAction::Allow)
    }

    pub fn on_pointer_over_out(
        &mut self,
        scene: &mut Scene,
        event: &NativeEvent,
    ) -> Result<DefaultAction, EventError> {
        if !self.config.features.contains(EventFeatures::CLICK) {
            return Ok(DefaultAction::Allow);
        }
        let events = self.normalize_to_pointer_data(event);
        for native in &events {
            self.bootstrap_event(native, None);
            self.boundary.map_event(scene, &self.root_pointer_event)?;
        }
        self.sync_cursor();
        Ok(DefaultAction::Allow)
    }

    pub fn on_pointer_cancel(
        &mut self,
        scene: &mut Scene,
        event: &NativeEvent,
    ) -> Result<DefaultAction, EventError> {
        if !self.config.features.contains(EventFeatures::CLICK) {
            return Ok(DefaultAction::Allow);
        }
        let events = self.normalize_to_pointer_data(event);
        for native in &events {
            self.bootstrap_event(native, None);
            self.boundary.map_event(scene, &self.root_pointer_event)?;
        }
        self.sync_cursor();
        Ok(DefaultAction::Allow)
    }

    pub fn on_wheel(
        &mut self,
        scene: &mut Scene,
        event: &NativeWheelEvent,
    ) -> Result<DefaultAction, EventError> {
        if !self.config.features.contains(EventFeatures::WHEEL) {
            return Ok(DefaultAction::Allow);
        }
        self.normalize_wheel_event(event);
        self.boundary.map_event(scene, &self.root_wheel_event)?;
        Ok(DefaultAction::Allow)
    }

    /// Advance the stationary-pointer ticker by one frame.
    ///
    /// Once the pointer has been still for the interaction interval, its last
    /// position is replayed as an untrusted `pointermove` so hover state
    /// catches up with anything that moved underneath it. Touch pointers are
    /// never replayed.
    pub fn tick(&mut self, scene: &mut Scene, delta: Duration) -> Result<(), EventError> {
        self.clock += delta.as_secs_f64() * 1000.0;
        if !self.config.features.contains(EventFeatures::MOVE) || !self.ticker.advance(delta) {
            return Ok(());
        }
        if !self.has_pointer || self.root_pointer_event.is_touch() {
            return Ok(());
        }
        let mut replay = self.root_pointer_event.detached_clone();
        replay.ty = Cow::Borrowed(types::POINTER_MOVE);
        replay.trusted = false;
        replay.normalized = false;
        replay.timestamp = self.clock;
        replay.button = MouseButton::None;
        replay.target = None;
        replay.global = self.map_position_to_point(replay.client);
        replay.screen = replay.global;
        log::trace!("replaying stationary pointer at {:?}", replay.client);
        self.boundary.map_event(scene, &replay)?;
        self.sync_cursor();
        Ok(())
    }

    // =========================================================================
    // Normalization
    // =========================================================================

    /// Map a client-space position into world space.
    pub fn map_position_to_point(&self, client: Point) -> Point {
        let rect = self.surface.bounding_rect();
        let backing = self.surface.backing_size();
        let scale_x = if rect.width() > 0.0 {
            backing.width / rect.width()
        } else {
            1.0
        };
        let scale_y = if rect.height() > 0.0 {
            backing.height / rect.height()
        } else {
            1.0
        };
        let resolution = if self.config.resolution > 0.0 {
            self.config.resolution
        } else {
            1.0
        };
        Point::new(
            (client.x - rect.x0) * scale_x / resolution,
            (client.y - rect.y0) * scale_y / resolution,
        )
    }

    /// Turn any native pointer-ish event into pointer-event shaped data.
    ///
    /// Touch events yield one entry per changed contact. Input the host also
    /// reports in another shape is dropped here: touch-typed pointer events
    /// when touch events are supported, mouse events when pointer events are.
    pub fn normalize_to_pointer_data(
        &mut self,
        event: &NativeEvent,
    ) -> SmallVec<[NativePointerEvent; 2]> {
        let mut out = SmallVec::new();
        match event {
            NativeEvent::Pointer(pointer) => {
                if self.config.supports_touch_events
                    && matches!(pointer.pointer_type, PointerType::Touch)
                {
                    log::debug!("dropping touch pointer event, touch events are handled");
                    return out;
                }
                out.push(pointer.clone());
            }
            NativeEvent::Mouse(mouse) => {
                if self.config.supports_pointer_events {
                    log::debug!("dropping mouse event, pointer events are handled");
                    return out;
                }
                out.push(normalize_mouse(mouse));
            }
            NativeEvent::Touch(touch) => {
                if !self.config.supports_touch_events {
                    log::debug!("dropping touch event, touch events are not enabled");
                    return out;
                }
                self.normalize_touch(touch, &mut out);
            }
            NativeEvent::Wheel(_) => {}
        }
        out
    }

    fn normalize_touch(
        &mut self,
        event: &NativeTouchEvent,
        out: &mut SmallVec<[NativePointerEvent; 2]>,
    ) {
        let canonical = canonical_type(&event.ty);
        let ending = matches!(
            canonical.as_ref(),
            types::POINTER_UP | types::POINTER_UP_OUTSIDE | types::POINTER_CANCEL
        );
        // Only a touch that starts alone becomes primary.
        if canonical == types::POINTER_DOWN
            && self.primary_touch.is_none()
            && event.active_touches == 1
            && let Some(first) = event.changed_touches.first()
        {
            self.primary_touch = Some(first.identifier);
        }

        for touch in &event.changed_touches {
            let is_primary = self.primary_touch == Some(touch.identifier);
            let mut native = NativePointerEvent::new(event.ty.clone(), touch.client);
            native.pointer_id = touch.identifier.saturating_add(TOUCH_POINTER_ID_OFFSET);
            native.pointer_type = PointerType::Touch;
            native.is_primary = is_primary;
            native.screen = touch.screen;
            native.button = 0;
            // Pressed while any contact is still down.
            native.buttons = u16::from(event.active_touches > 0);
            native.width = Some(touch.radius_x.filter(|r| *r > 0.0).unwrap_or(1.0));
            native.height = Some(touch.radius_y.filter(|r| *r > 0.0).unwrap_or(1.0));
            native.pressure = Some(touch.force.filter(|f| *f > 0.0).unwrap_or(0.5));
            native.modifiers = event.modifiers;
            native.timestamp = event.timestamp;
            native.on_surface = event.on_surface;
            native.normalized = true;
            out.push(native);

            if ending && is_primary {
                self.primary_touch = None;
            }
        }
    }

    fn normalize_wheel_event(&mut self, native: &NativeWheelEvent) {
        let global = self.map_position_to_point(native.client);
        let event = &mut self.root_wheel_event;
        event.reset();
        event.ty = Cow::Borrowed(types::WHEEL);
        event.trusted = true;
        event.timestamp = native.timestamp;
        event.button = MouseButton::None;
        event.buttons = PointerButtons::from_mask(native.buttons);
        event.modifiers = native.modifiers;
        event.client = native.client;
        event.screen = global;
        event.global = global;
        event.payload = EventPayload::Wheel(WheelData {
            delta_x: native.delta_x,
            delta_y: native.delta_y,
            delta_z: native.delta_z,
            delta_mode: native.delta_mode,
        });
        self.clock = native.timestamp;
    }

    /// Fill the shared pointer event from `native`.
    ///
    /// `ty` overrides the canonical type derived from the native one.
    fn bootstrap_event(&mut self, native: &NativePointerEvent, ty: Option<&'static str>) {
        let global = self.map_position_to_point(native.client);
        let buttons = PointerButtons::from_mask(native.buttons);
        let pointer_id = match native.pointer_type {
            PointerType::Mouse => PointerId::PRIMARY,
            _ => PointerId::new(native.pointer_id).unwrap_or(PointerId::PRIMARY),
        };
        let pressure = native
            .pressure
            .unwrap_or(if buttons.is_empty() { 0.0 } else { 0.5 });

        let event = &mut self.root_pointer_event;
        event.reset();
        event.ty = ty.map_or_else(|| canonical_type(&native.ty), Cow::Borrowed);
        event.trusted = true;
        event.timestamp = native.timestamp;
        event.normalized = native.normalized;
        event.button = MouseButton::from_index(native.button);
        event.buttons = buttons;
        event.modifiers = native.modifiers;
        event.client = native.client;
        event.screen = global;
        event.global = global;
        event.movement = native.movement;
        event.payload = EventPayload::Pointer(PointerData {
            pointer_id,
            pointer_type: native.pointer_type,
            is_primary: native.is_primary,
            width: native.width.unwrap_or(1.0),
            height: native.height.unwrap_or(1.0),
            pressure,
            tangential_pressure: native.tangential_pressure,
            tilt_x: native.tilt_x,
            tilt_y: native.tilt_y,
            twist: native.twist,
        });

        self.has_pointer = true;
        self.clock = native.timestamp;
    }
}

fn normalize_mouse(mouse: &NativeMouseEvent) -> NativePointerEvent {
    NativePointerEvent {
        ty: mouse.ty.clone(),
        pointer_id: 1,
        pointer_type: PointerType::Mouse,
        is_primary: true,
        client: mouse.client,
        screen: mouse.screen,
        movement: mouse.movement,
        button: mouse.button,
        buttons: mouse.buttons,
        modifiers: mouse.modifiers,
        width: Some(1.0),
        height: Some(1.0),
        pressure: Some(0.5),
        tangential_pressure: 0.0,
        tilt_x: 0.0,
        tilt_y: 0.0,
        twist: 0.0,
        timestamp: mouse.timestamp,
        on_surface: mouse.on_surface,
        normalized: true,
    }
}
