//! # Floem Federated
//! Floem Federated is a DOM-style pointer event system for retained scene
//! graphs. It turns raw host input (pointer, mouse, touch and wheel events)
//! into events that travel through a tree of nodes with capturing,
//! at-target and bubbling phases, the way browser events travel through
//! the DOM.
//!
//! ## Example: Click counting
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//!
//! use floem_federated::test_harness::TestHarness;
//! use floem_federated::{HitShape, event::types};
//!
//! let mut harness = TestHarness::new();
//! let root = harness.root();
//! let scene = harness.scene_mut();
//! let button = scene.create_named("button");
//! scene.add_child(root, button).unwrap();
//! scene.set_interactive(button, true);
//! scene.set_hit_area(button, Some(HitShape::rect(0.0, 0.0, 100.0, 40.0)));
//!
//! let clicks = Rc::new(Cell::new(0));
//! let seen = clicks.clone();
//! scene
//!     .on(button, types::CLICK, move |event, _| seen.set(event.detail))
//!     .unwrap();
//!
//! harness.click(10.0, 10.0).unwrap();
//! harness.click(10.0, 10.0).unwrap();
//! assert_eq!(clicks.get(), 2);
//! ```
//!
//! ## Scenes
//! A [`Scene`] is an arena of nodes addressed by [`NodeId`]. Nodes carry the
//! data hit testing needs: visibility, the `interactive` and
//! `interactive_children` flags, an optional hit area, an optional mask, a
//! cursor and a local transform. Listeners are registered per node and per
//! event type, for either the capturing or the bubbling phase, and receive
//! `&mut Scene` so they can restructure the tree while an event is in flight.
//!
//! ## Dispatch
//! An [`EventBoundary`] sits on one scene root. Incoming events are looked up
//! in its mapping table; the built-in mappers hit test, then derive the
//! events listeners see:
//!
//! - `pointerdown` / `pointerup` plus the `mouse*`, `right*` and `touch*`
//!   aliases
//! - `pointerover` / `pointerout` and the non-bubbling `pointerenter` /
//!   `pointerleave` when the hovered node changes
//! - `pointerupoutside` when a press is released somewhere else
//! - `click`, `rightclick`, `tap` and `pointertap` with a multi-click count
//!   in [`FederatedEvent::detail`]
//!
//! New event kinds can be added with [`EventBoundary::add_event_mapping`].
//!
//! ## Host input
//! [`EventSystem`] normalizes [`NativeEvent`]s against a [`HostSurface`]:
//! legacy mouse and touch input becomes pointer input, client coordinates
//! become world coordinates, and after each event the boundary's cursor is
//! applied to the surface. [`headless::HeadlessSurface`] and
//! [`test_harness::TestHarness`] provide a surface and driver for tests.

pub mod cursor;
pub mod error;
pub mod event;
pub mod headless;
pub mod native;
pub mod pointer;
pub mod scene;
pub mod system;
pub mod test_harness;
pub mod ticker;

pub use cursor::{CursorStyle, CursorStyles};
pub use error::{EventError, SceneError};
pub use event::{
    BoundaryConfig, EventBoundary, EventPhase, EventPath, FederatedEvent, PointerData, WheelData,
};
pub use native::NativeEvent;
pub use peniko;
pub use peniko::kurbo;
pub use pointer::{MouseButton, PointerButtons};
pub use scene::{HitShape, ListenerId, ListenerOptions, NodeId, Scene, SceneNode};
pub use system::{DefaultAction, EventFeatures, EventSystem, EventSystemConfig, HostSurface};
pub use ticker::EventsTicker;
pub use ui_events;
