//! Raw input events as a host delivers them.
//!
//! Hosts report pointer input in several shapes: pointer events, legacy mouse
//! events, and touch events carrying a list of changed contacts. Each shape is
//! a variant of [`NativeEvent`]; the [`EventSystem`](crate::EventSystem)
//! normalizes all of them into [`NativePointerEvent`]s before building
//! federated events. Fields a host may leave out are `Option`s and get
//! defaults during normalization.

use std::borrow::Cow;

use peniko::kurbo::{Point, Vec2};
use smallvec::SmallVec;
use ui_events::{keyboard::Modifiers, pointer::PointerType};

use crate::event::DeltaMode;

/// A DOM-style pointer event.
///
/// This is also the normalized form of mouse and touch input, in which case
/// `normalized` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct NativePointerEvent {
    pub ty: Cow<'static, str>,
    /// Host pointer id. Touch contacts are offset away from the mouse id
    /// during normalization.
    pub pointer_id: u64,
    pub pointer_type: PointerType,
    pub is_primary: bool,
    /// Position in host client space (CSS pixels).
    pub client: Point,
    /// Position in host screen space, when reported.
    pub screen: Option<Point>,
    pub movement: Vec2,
    /// DOM button index, `-1` when no button changed.
    pub button: i16,
    /// DOM buttons mask.
    pub buttons: u16,
    pub modifiers: Modifiers,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub pressure: Option<f32>,
    pub tangential_pressure: f32,
    pub tilt_x: f32,
    pub tilt_y: f32,
    pub twist: f32,
    /// Milliseconds on the host clock.
    pub timestamp: f64,
    /// Whether the host reported the event on the render surface itself.
    pub on_surface: bool,
    /// Synthesized from a mouse or touch event.
    pub normalized: bool,
}

impl NativePointerEvent {
    /// A primary mouse pointer event at `client`.
    pub fn new(ty: impl Into<Cow<'static, str>>, client: impl Into<Point>) -> Self {
        Self {
            ty: ty.into(),
            pointer_id: 1,
            pointer_type: PointerType::Mouse,
            is_primary: true,
            client: client.into(),
            screen: None,
            movement: Vec2::ZERO,
            button: 0,
            buttons: 0,
            modifiers: Modifiers::default(),
            width: None,
            height: None,
            pressure: None,
            tangential_pressure: 0.0,
            tilt_x: 0.0,
            tilt_y: 0.0,
            twist: 0.0,
            timestamp: 0.0,
            on_surface: true,
            normalized: false,
        }
    }

    pub fn with_pointer(mut self, pointer_id: u64, pointer_type: PointerType) -> Self {
        self.pointer_id = pointer_id;
        self.pointer_type = pointer_type;
        self
    }

    pub fn with_button(mut self, button: i16) -> Self {
        self.button = button;
        self
    }

    pub fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Mark the event as reported somewhere other than the render surface.
    pub fn outside(mut self) -> Self {
        self.on_surface = false;
        self
    }
}

/// A legacy mouse event.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeMouseEvent {
    pub ty: Cow<'static, str>,
    pub client: Point,
    pub screen: Option<Point>,
    pub movement: Vec2,
    pub button: i16,
    pub buttons: u16,
    pub modifiers: Modifiers,
    pub timestamp: f64,
    pub on_surface: bool,
}

impl NativeMouseEvent {
    pub fn new(ty: impl Into<Cow<'static, str>>, client: impl Into<Point>) -> Self {
        Self {
            ty: ty.into(),
            client: client.into(),
            screen: None,
            movement: Vec2::ZERO,
            button: 0,
            buttons: 0,
            modifiers: Modifiers::default(),
            timestamp: 0.0,
            on_surface: true,
        }
    }

    pub fn with_button(mut self, button: i16) -> Self {
        self.button = button;
        self
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// One contact point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeTouch {
    pub identifier: u64,
    pub client: Point,
    pub screen: Option<Point>,
    pub radius_x: Option<f64>,
    pub radius_y: Option<f64>,
    pub force: Option<f32>,
}

impl NativeTouch {
    pub fn new(identifier: u64, client: impl Into<Point>) -> Self {
        Self {
            identifier,
            client: client.into(),
            screen: None,
            radius_x: None,
            radius_y: None,
            force: None,
        }
    }
}

/// A touch event reporting the contacts that changed.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTouchEvent {
    pub ty: Cow<'static, str>,
    pub changed_touches: SmallVec<[NativeTouch; 2]>,
    /// Contacts still on the surface after this event.
    pub active_touches: usize,
    pub modifiers: Modifiers,
    pub timestamp: f64,
    pub on_surface: bool,
}

impl NativeTouchEvent {
    pub fn new(
        ty: impl Into<Cow<'static, str>>,
        changed_touches: impl IntoIterator<Item = NativeTouch>,
        active_touches: usize,
    ) -> Self {
        Self {
            ty: ty.into(),
            changed_touches: changed_touches.into_iter().collect(),
            active_touches,
            modifiers: Modifiers::default(),
            timestamp: 0.0,
            on_surface: true,
        }
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A wheel event.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeWheelEvent {
    pub client: Point,
    pub screen: Option<Point>,
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_z: f64,
    pub delta_mode: DeltaMode,
    pub buttons: u16,
    pub modifiers: Modifiers,
    pub timestamp: f64,
}

impl NativeWheelEvent {
    pub fn new(client: impl Into<Point>, delta_x: f64, delta_y: f64) -> Self {
        Self {
            client: client.into(),
            screen: None,
            delta_x,
            delta_y,
            delta_z: 0.0,
            delta_mode: DeltaMode::Pixel,
            buttons: 0,
            modifiers: Modifiers::default(),
            timestamp: 0.0,
        }
    }
}

/// Any input event a host can deliver.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    Pointer(NativePointerEvent),
    Mouse(NativeMouseEvent),
    Touch(NativeTouchEvent),
    Wheel(NativeWheelEvent),
}

impl NativeEvent {
    pub fn ty(&self) -> &str {
        match self {
            NativeEvent::Pointer(e) => &e.ty,
            NativeEvent::Mouse(e) => &e.ty,
            NativeEvent::Touch(e) => &e.ty,
            NativeEvent::Wheel(_) => crate::event::types::WHEEL,
        }
    }

    pub fn timestamp(&self) -> f64 {
        match self {
            NativeEvent::Pointer(e) => e.timestamp,
            NativeEvent::Mouse(e) => e.timestamp,
            NativeEvent::Touch(e) => e.timestamp,
            NativeEvent::Wheel(e) => e.timestamp,
        }
    }
}

impl From<NativePointerEvent> for NativeEvent {
    fn from(event: NativePointerEvent) -> Self {
        NativeEvent::Pointer(event)
    }
}

impl From<NativeMouseEvent> for NativeEvent {
    fn from(event: NativeMouseEvent) -> Self {
        NativeEvent::Mouse(event)
    }
}

impl From<NativeTouchEvent> for NativeEvent {
    fn from(event: NativeTouchEvent) -> Self {
        NativeEvent::Touch(event)
    }
}

impl From<NativeWheelEvent> for NativeEvent {
    fn from(event: NativeWheelEvent) -> Self {
        NativeEvent::Wheel(event)
    }
}
