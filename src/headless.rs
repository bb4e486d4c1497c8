//! Headless host surface for testing and benchmarking.
//!
//! [`HeadlessSurface`] stands in for a real render surface: it reports fixed
//! bounds and records every cursor and style change instead of showing them.
//! The `create_*` functions build the native events a host would deliver.
//!
//! # Example
//!
//! ```rust
//! use floem_federated::headless::{HeadlessSurface, create_pointer_down};
//! use floem_federated::{EventBoundary, EventSystem, EventSystemConfig, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.create_node();
//! let mut boundary = EventBoundary::default();
//! boundary.set_root_target(Some(root));
//!
//! let mut system = EventSystem::new(
//!     HeadlessSurface::default(),
//!     boundary,
//!     EventSystemConfig::default(),
//! );
//! system
//!     .handle_event(&mut scene, &create_pointer_down(50.0, 50.0, 0.0))
//!     .unwrap();
//! assert_eq!(system.surface().cursor(), Some("inherit"));
//! ```

use peniko::kurbo::{Rect, Size};
use ui_events::pointer::PointerType;

use crate::event::types;
use crate::native::{
    NativeEvent, NativePointerEvent, NativeTouch, NativeTouchEvent, NativeWheelEvent,
};
use crate::system::HostSurface;

/// An in-memory render surface.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    rect: Rect,
    backing: Size,
    supports_styles: bool,
    cursor: Option<String>,
    cursor_history: Vec<String>,
    styles: Vec<(String, String)>,
}

impl Default for HeadlessSurface {
    /// An 800x600 surface at the client origin with a 1:1 backing store.
    fn default() -> Self {
        Self::new(Rect::new(0.0, 0.0, 800.0, 600.0), Size::new(800.0, 600.0))
    }
}

impl HeadlessSurface {
    pub fn new(rect: Rect, backing: Size) -> Self {
        Self {
            rect,
            backing,
            supports_styles: true,
            cursor: None,
            cursor_history: Vec::new(),
            styles: Vec::new(),
        }
    }

    pub fn with_style_support(mut self, supported: bool) -> Self {
        self.supports_styles = supported;
        self
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn set_backing_size(&mut self, backing: Size) {
        self.backing = backing;
    }

    /// The CSS cursor currently set.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Every CSS cursor set so far, oldest first.
    pub fn cursor_history(&self) -> &[String] {
        &self.cursor_history
    }

    /// Every style property applied so far, oldest first.
    pub fn styles(&self) -> &[(String, String)] {
        &self.styles
    }
}

impl HostSurface for HeadlessSurface {
    fn bounding_rect(&self) -> Rect {
        self.rect
    }

    fn backing_size(&self) -> Size {
        self.backing
    }

    fn set_cursor(&mut self, cursor: &str) {
        self.cursor = Some(cursor.to_owned());
        self.cursor_history.push(cursor.to_owned());
    }

    fn apply_style(&mut self, property: &str, value: &str) {
        self.styles.push((property.to_owned(), value.to_owned()));
    }

    fn supports_styles(&self) -> bool {
        self.supports_styles
    }
}

// ============================================================================
// Native event builders
// ============================================================================

/// Pointer id used by [`create_pen_event`]. Kept clear of the mouse id and of
/// the range touch contacts are mapped into.
pub const PEN_POINTER_ID: u64 = 64;

/// Create a primary button pointer down event at the given position.
pub fn create_pointer_down(x: f64, y: f64, timestamp: f64) -> NativeEvent {
    NativePointerEvent::new(types::POINTER_DOWN, (x, y))
        .with_button(0)
        .with_buttons(1)
        .with_pressure(0.5)
        .with_timestamp(timestamp)
        .into()
}

/// Create a primary button pointer up event at the given position.
pub fn create_pointer_up(x: f64, y: f64, timestamp: f64) -> NativeEvent {
    NativePointerEvent::new(types::POINTER_UP, (x, y))
        .with_button(0)
        .with_timestamp(timestamp)
        .into()
}

/// Create a pointer up event reported away from the surface.
pub fn create_pointer_up_outside(x: f64, y: f64, timestamp: f64) -> NativeEvent {
    NativePointerEvent::new(types::POINTER_UP, (x, y))
        .with_button(0)
        .with_timestamp(timestamp)
        .outside()
        .into()
}

/// Create a secondary (right) button pointer down event.
pub fn create_secondary_pointer_down(x: f64, y: f64, timestamp: f64) -> NativeEvent {
    NativePointerEvent::new(types::POINTER_DOWN, (x, y))
        .with_button(2)
        .with_buttons(2)
        .with_pressure(0.5)
        .with_timestamp(timestamp)
        .into()
}

/// Create a secondary (right) button pointer up event.
pub fn create_secondary_pointer_up(x: f64, y: f64, timestamp: f64) -> NativeEvent {
    NativePointerEvent::new(types::POINTER_UP, (x, y))
        .with_button(2)
        .with_timestamp(timestamp)
        .into()
}

/// Create a pointer move event with no button change.
pub fn create_pointer_move(x: f64, y: f64, timestamp: f64) -> NativeEvent {
    NativePointerEvent::new(types::POINTER_MOVE, (x, y))
        .with_button(-1)
        .with_timestamp(timestamp)
        .into()
}

/// Create the event a host sends when the pointer enters the surface.
pub fn create_pointer_over(x: f64, y: f64, timestamp: f64) -> NativeEvent {
    NativePointerEvent::new(types::POINTER_OVER, (x, y))
        .with_button(-1)
        .with_timestamp(timestamp)
        .into()
}

/// Create the event a host sends when the pointer leaves the surface.
pub fn create_pointer_leave(x: f64, y: f64, timestamp: f64) -> NativeEvent {
    NativePointerEvent::new(types::POINTER_LEAVE, (x, y))
        .with_button(-1)
        .with_timestamp(timestamp)
        .into()
}

/// Create a pen pointer event.
pub fn create_pen_event(ty: &'static str, x: f64, y: f64, timestamp: f64) -> NativeEvent {
    NativePointerEvent::new(ty, (x, y))
        .with_pointer(PEN_POINTER_ID, PointerType::Pen)
        .with_button(if ty == types::POINTER_MOVE { -1 } else { 0 })
        .with_timestamp(timestamp)
        .into()
}

/// Create a touch event for a single contact.
///
/// `active_touches` is the number of contacts left on the surface.
pub fn create_touch(
    ty: &'static str,
    identifier: u64,
    x: f64,
    y: f64,
    active_touches: usize,
    timestamp: f64,
) -> NativeEvent {
    NativeTouchEvent::new(ty, [NativeTouch::new(identifier, (x, y))], active_touches)
        .with_timestamp(timestamp)
        .into()
}

/// Create a wheel event with a pixel delta.
pub fn create_wheel(x: f64, y: f64, delta_x: f64, delta_y: f64, timestamp: f64) -> NativeEvent {
    let mut wheel = NativeWheelEvent::new((x, y), delta_x, delta_y);
    wheel.timestamp = timestamp;
    wheel.into()
}
