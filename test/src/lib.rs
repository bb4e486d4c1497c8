//! Testing utilities for federated event dispatch.
//!
//! This crate provides scene builders and an [`EventRecorder`] that logs what
//! listeners saw, so integration tests can assert on event order.
//!
//! # Example
//!
//! ```rust
//! use floem_federated_test::prelude::*;
//!
//! let (mut harness, sprites) = sprite_harness();
//! let recorder = EventRecorder::new();
//! recorder.track(harness.scene_mut(), sprites.a, &[types::CLICK]);
//!
//! harness.click(10.0, 10.0).unwrap();
//! assert_eq!(recorder.types(), vec!["click"]);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use floem_federated::kurbo::Rect;
use floem_federated::test_harness::TestHarness;
use floem_federated::{EventPhase, FederatedEvent, HitShape, NodeId, Scene};

pub use floem_federated::test_harness::*;

/// Prelude module for convenient imports in tests.
pub mod prelude {
    pub use super::{
        EventRecorder, Recorded, Sprites, build_chain, interactive_rect, sprite_harness,
        sprite_scene,
    };
    pub use floem_federated::event::types;
    pub use floem_federated::kurbo::{Affine, Point, Rect};
    pub use floem_federated::test_harness::*;
    pub use floem_federated::{
        BoundaryConfig, DefaultAction, EventBoundary, EventError, EventFeatures, EventPhase,
        EventSystemConfig, FederatedEvent, HitShape, MouseButton, NodeId, Scene,
    };
}

/// One listener invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub ty: String,
    /// Label of the node whose listener ran.
    pub node: Option<String>,
    pub phase: EventPhase,
    pub detail: u32,
}

/// Records every event delivered to the nodes it tracks.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = EventRecorder::new();
/// recorder.track(scene, node, &[types::POINTER_DOWN, types::CLICK]);
/// // ... drive the harness ...
/// assert_eq!(recorder.types(), vec!["pointerdown", "click"]);
/// ```
#[derive(Clone, Default)]
pub struct EventRecorder {
    log: Rc<RefCell<Vec<Recorded>>>,
}

impl EventRecorder {
    /// Create a new, empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `events` reaching `node` in the at-target or bubbling phase.
    pub fn track(&self, scene: &mut Scene, node: NodeId, events: &[&'static str]) {
        self.register(scene, node, events, false);
    }

    /// Record `events` passing through `node` in the capturing phase.
    pub fn track_capture(&self, scene: &mut Scene, node: NodeId, events: &[&'static str]) {
        self.register(scene, node, events, true);
    }

    fn register(&self, scene: &mut Scene, node: NodeId, events: &[&'static str], capture: bool) {
        for &ty in events {
            let log = self.log.clone();
            let callback = move |event: &mut FederatedEvent, scene: &mut Scene| {
                log.borrow_mut().push(Recorded {
                    ty: ty.to_owned(),
                    node: event
                        .current_target
                        .and_then(|id| scene.label(id))
                        .map(str::to_owned),
                    phase: event.phase,
                    detail: event.detail,
                });
            };
            let result = if capture {
                scene.on_capture(node, ty, callback)
            } else {
                scene.on(node, ty, callback)
            };
            result.expect("tracked node must exist");
        }
    }

    /// Every recorded invocation in order.
    pub fn records(&self) -> Vec<Recorded> {
        self.log.borrow().clone()
    }

    /// Just the event types, in order.
    pub fn types(&self) -> Vec<String> {
        self.log.borrow().iter().map(|r| r.ty.clone()).collect()
    }

    /// `"type@label"` for each invocation, in order.
    pub fn trace(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .map(|r| format!("{}@{}", r.ty, r.node.as_deref().unwrap_or("?")))
            .collect()
    }

    /// Recorded invocations of one event type.
    pub fn of_type(&self, ty: &str) -> Vec<Recorded> {
        self.log
            .borrow()
            .iter()
            .filter(|r| r.ty == ty)
            .cloned()
            .collect()
    }

    pub fn count(&self, ty: &str) -> usize {
        self.log.borrow().iter().filter(|r| r.ty == ty).count()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Clear all recorded invocations.
    pub fn reset(&self) {
        self.log.borrow_mut().clear();
    }
}

/// Make `id` interactive with a rectangular hit area in its local space.
pub fn interactive_rect(scene: &mut Scene, id: NodeId, rect: Rect) {
    scene.set_interactive(id, true);
    scene.set_hit_area(
        id,
        Some(HitShape::rect(rect.x0, rect.y0, rect.width(), rect.height())),
    );
}

/// Node handles of [`sprite_harness`].
///
/// ```text
/// root
/// ├── a  (0,0)..(50,50)
/// └── b  (50,0)..(100,50)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Sprites {
    pub root: NodeId,
    pub a: NodeId,
    pub b: NodeId,
}

/// A root with two side by side interactive children.
pub fn sprite_scene() -> (Scene, Sprites) {
    let mut scene = Scene::new();
    let root = scene.create_named("root");
    let a = scene.create_named("a");
    let b = scene.create_named("b");
    scene.add_child(root, a).expect("fresh nodes");
    scene.add_child(root, b).expect("fresh nodes");
    interactive_rect(&mut scene, a, Rect::new(0.0, 0.0, 50.0, 50.0));
    interactive_rect(&mut scene, b, Rect::new(50.0, 0.0, 100.0, 50.0));
    (scene, Sprites { root, a, b })
}

/// [`sprite_scene`] inside a harness with default configuration.
pub fn sprite_harness() -> (TestHarness, Sprites) {
    let (scene, sprites) = sprite_scene();
    (TestHarness::with_scene(scene, sprites.root), sprites)
}

/// A chain `root -> n1 -> ... -> n{depth}` where only the leaf is interactive
/// and covers (0,0)..(100,100). Returns the scene and the nodes root first.
pub fn build_chain(depth: usize) -> (Scene, Vec<NodeId>) {
    let mut scene = Scene::new();
    let root = scene.create_named("root");
    let mut nodes = vec![root];
    for i in 1..=depth {
        let node = scene.create_named(format!("n{i}"));
        let parent = nodes[nodes.len() - 1];
        scene.add_child(parent, node).expect("fresh nodes");
        nodes.push(node);
    }
    if let Some(&leaf) = nodes.last()
        && depth > 0
    {
        interactive_rect(&mut scene, leaf, Rect::new(0.0, 0.0, 100.0, 100.0));
    }
    (scene, nodes)
}
