//! Test harness for headless event testing.
//!
//! This module drives an [`EventSystem`] over a [`HeadlessSurface`] with a
//! manual clock, so tests can simulate user input against a [`Scene`] and
//! check what listeners saw.
//!
//! # Example
//!
//! ```rust
//! use floem_federated::test_harness::TestHarness;
//! use floem_federated::HitShape;
//!
//! let mut harness = TestHarness::new();
//! let root = harness.root();
//! let button = harness.scene_mut().create_named("button");
//! harness.scene_mut().add_child(root, button).unwrap();
//! harness.scene_mut().set_interactive(button, true);
//! harness
//!     .scene_mut()
//!     .set_hit_area(button, Some(HitShape::rect(0.0, 0.0, 100.0, 40.0)));
//!
//! harness.click(10.0, 10.0).unwrap();
//! assert_eq!(harness.node_at(10.0, 10.0), Some(button));
//! ```

use std::time::Duration;

use peniko::kurbo::Point;
use ui_events::pointer::PointerId;

use crate::error::EventError;
use crate::event::{BoundaryConfig, EventBoundary, types};
use crate::headless::{self, HeadlessSurface};
use crate::native::NativeEvent;
use crate::pointer::MouseButton;
use crate::scene::{NodeId, Scene};
use crate::system::{DefaultAction, EventSystem, EventSystemConfig};

/// A scene, an event system and a clock.
pub struct TestHarness {
    scene: Scene,
    root: NodeId,
    system: EventSystem<HeadlessSurface>,
    /// Milliseconds.
    now: f64,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// A harness with an empty root node and default configuration.
    pub fn new() -> Self {
        let mut scene = Scene::new();
        let root = scene.create_named("root");
        Self::with_scene(scene, root)
    }

    /// A harness over an existing scene.
    pub fn with_scene(scene: Scene, root: NodeId) -> Self {
        Self::with_config(
            scene,
            root,
            BoundaryConfig::default(),
            EventSystemConfig::default(),
        )
    }

    pub fn with_config(
        scene: Scene,
        root: NodeId,
        boundary: BoundaryConfig,
        system: EventSystemConfig,
    ) -> Self {
        let boundary = EventBoundary::with_root(root, boundary);
        let system = EventSystem::new(HeadlessSurface::default(), boundary, system);
        Self {
            scene,
            root,
            system,
            now: 0.0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn system(&self) -> &EventSystem<HeadlessSurface> {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut EventSystem<HeadlessSurface> {
        &mut self.system
    }

    pub fn boundary(&self) -> &EventBoundary {
        self.system.boundary()
    }

    pub fn boundary_mut(&mut self) -> &mut EventBoundary {
        self.system.boundary_mut()
    }

    pub fn surface(&self) -> &HeadlessSurface {
        self.system.surface()
    }

    /// Current time in milliseconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Move the clock without running any frames.
    pub fn set_time(&mut self, now: f64) {
        self.now = now;
    }

    /// Run one frame of `ms` milliseconds, ticking the event system.
    pub fn advance(&mut self, ms: f64) -> Result<(), EventError> {
        self.now += ms;
        self.system
            .tick(&mut self.scene, Duration::from_secs_f64(ms.max(0.0) / 1000.0))
    }

    /// Deliver a native event to the event system.
    pub fn dispatch(&mut self, event: NativeEvent) -> Result<DefaultAction, EventError> {
        self.system.handle_event(&mut self.scene, &event)
    }

    /// Simulate a pointer down event at the given position.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<DefaultAction, EventError> {
        self.dispatch(headless::create_pointer_down(x, y, self.now))
    }

    /// Simulate a pointer up event at the given position.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<DefaultAction, EventError> {
        self.dispatch(headless::create_pointer_up(x, y, self.now))
    }

    /// Simulate a release reported away from the surface.
    pub fn pointer_up_outside(&mut self, x: f64, y: f64) -> Result<DefaultAction, EventError> {
        self.dispatch(headless::create_pointer_up_outside(x, y, self.now))
    }

    /// Simulate a pointer move event to the given position.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<DefaultAction, EventError> {
        self.dispatch(headless::create_pointer_move(x, y, self.now))
    }

    /// Simulate the pointer entering the surface at the given position.
    pub fn pointer_enter_surface(&mut self, x: f64, y: f64) -> Result<DefaultAction, EventError> {
        self.dispatch(headless::create_pointer_over(x, y, self.now))
    }

    /// Simulate the pointer leaving the surface.
    pub fn pointer_leave_surface(&mut self, x: f64, y: f64) -> Result<DefaultAction, EventError> {
        self.dispatch(headless::create_pointer_leave(x, y, self.now))
    }

    /// Simulate a click (pointer down + pointer up) at the given position.
    pub fn click(&mut self, x: f64, y: f64) -> Result<DefaultAction, EventError> {
        self.pointer_down(x, y)?;
        self.pointer_up(x, y)
    }

    /// Simulate a secondary (right) click at the given position.
    pub fn secondary_click(&mut self, x: f64, y: f64) -> Result<DefaultAction, EventError> {
        self.dispatch(headless::create_secondary_pointer_down(x, y, self.now))?;
        self.dispatch(headless::create_secondary_pointer_up(x, y, self.now))
    }

    /// Simulate a touch contact starting. `identifier` names the contact.
    pub fn touch_start(
        &mut self,
        identifier: u64,
        x: f64,
        y: f64,
    ) -> Result<DefaultAction, EventError> {
        let event = headless::create_touch(types::TOUCH_START, identifier, x, y, 1, self.now);
        self.dispatch(event)
    }

    pub fn touch_move(
        &mut self,
        identifier: u64,
        x: f64,
        y: f64,
    ) -> Result<DefaultAction, EventError> {
        let event = headless::create_touch(types::TOUCH_MOVE, identifier, x, y, 1, self.now);
        self.dispatch(event)
    }

    pub fn touch_end(
        &mut self,
        identifier: u64,
        x: f64,
        y: f64,
    ) -> Result<DefaultAction, EventError> {
        let event = headless::create_touch(types::TOUCH_END, identifier, x, y, 0, self.now);
        self.dispatch(event)
    }

    pub fn touch_cancel(
        &mut self,
        identifier: u64,
        x: f64,
        y: f64,
    ) -> Result<DefaultAction, EventError> {
        let event = headless::create_touch(types::TOUCH_CANCEL, identifier, x, y, 0, self.now);
        self.dispatch(event)
    }

    /// Simulate a tap (touch start + touch end) at the given position.
    pub fn tap(&mut self, x: f64, y: f64) -> Result<DefaultAction, EventError> {
        self.touch_start(0, x, y)?;
        self.touch_end(0, x, y)
    }

    /// Simulate a scroll wheel event with pixel deltas.
    pub fn wheel(
        &mut self,
        x: f64,
        y: f64,
        delta_x: f64,
        delta_y: f64,
    ) -> Result<DefaultAction, EventError> {
        self.dispatch(headless::create_wheel(x, y, delta_x, delta_y, self.now))
    }

    /// The node a pointer at this world position would hit.
    pub fn node_at(&mut self, x: f64, y: f64) -> Option<NodeId> {
        self.system
            .boundary_mut()
            .hit_test(&self.scene, Point::new(x, y))
    }

    /// Whether `id` is in the mouse pointer's hover chain.
    pub fn is_hovered(&self, id: NodeId) -> bool {
        self.boundary()
            .tracking(PointerId::PRIMARY)
            .and_then(|record| record.over_path())
            .is_some_and(|path| path.contains(&id))
    }

    /// Whether `id` was pressed by the mouse's primary button and not yet
    /// released.
    pub fn is_pressed(&self, id: NodeId) -> bool {
        self.boundary()
            .tracking(PointerId::PRIMARY)
            .and_then(|record| record.press_path(MouseButton::Primary))
            .is_some_and(|path| path.last() == Some(&id))
    }
}
