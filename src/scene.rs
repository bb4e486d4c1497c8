//! # Scene graph
//!
//! A [`Scene`] is an arena of [`SceneNode`]s addressed by [`NodeId`] handles.
//! Each node stores a non-owning parent handle and an ordered child list
//! (paint order: later children are drawn, and therefore hit, on top).
//!
//! The event system only reads the tree: parents and children, the
//! `interactive` / `interactive_children` flags, visibility, hit areas, masks,
//! cursors and world transforms. Listeners live here too, keyed per node.
//!
//! Every mutation that can change a hit-test answer bumps
//! [`Scene::generation`], which hit-test caches use for invalidation.

mod listeners;
mod shape;

pub use listeners::{EventCallback, ListenerId, ListenerOptions};
pub use shape::HitShape;

use peniko::kurbo::{Affine, Point, Rect};
use slotmap::{SecondaryMap, SlotMap, new_key_type};

use crate::error::SceneError;
use listeners::ListenerMap;

new_key_type! {
    /// A small unique identifier for a node in a [`Scene`].
    pub struct NodeId;
}

/// Data stored for one node of the scene.
#[derive(Debug, Clone)]
pub struct SceneNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    label: Option<String>,
    visible: bool,
    interactive: bool,
    interactive_children: bool,
    hit_area: Option<HitShape>,
    mask: Option<HitShape>,
    bounds: Option<Rect>,
    cursor: Option<String>,
    transform: Affine,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            label: None,
            visible: true,
            interactive: false,
            interactive_children: true,
            hit_area: None,
            mask: None,
            bounds: None,
            cursor: None,
            transform: Affine::IDENTITY,
        }
    }
}

impl SceneNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn interactive_children(&self) -> bool {
        self.interactive_children
    }

    /// Hit area in local space.
    pub fn hit_area(&self) -> Option<&HitShape> {
        self.hit_area.as_ref()
    }

    /// Mask in world space.
    pub fn mask(&self) -> Option<&HitShape> {
        self.mask.as_ref()
    }

    /// Local geometry used when no hit area is declared.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Transform from this node's space into its parent's space.
    pub fn transform(&self) -> Affine {
        self.transform
    }
}

/// Arena-backed scene graph.
#[derive(Default)]
pub struct Scene {
    nodes: SlotMap<NodeId, SceneNode>,
    listeners: SecondaryMap<NodeId, ListenerMap>,
    listener_nodes: SlotMap<ListenerId, NodeId>,
    generation: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter bumped by every change that can affect hit testing.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Create a detached node with default flags.
    pub fn create_node(&mut self) -> NodeId {
        self.touch();
        self.nodes.insert(SceneNode::default())
    }

    /// Create a detached node carrying a debug label.
    pub fn create_named(&mut self, label: impl Into<String>) -> NodeId {
        self.touch();
        self.nodes.insert(SceneNode {
            label: Some(label.into()),
            ..SceneNode::default()
        })
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Whether `id` is still alive in this scene.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.label.as_deref())
    }

    /// First node carrying `label`, in arena order.
    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.label.as_deref() == Some(label))
            .map(|(id, _)| id)
    }

    pub fn cursor(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.cursor.as_deref())
    }

    /// Number of ancestors above `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Whether `id` is alive and reaches `root` through its parent chain.
    pub fn is_mounted(&self, root: NodeId, id: NodeId) -> bool {
        self.contains(id) && self.is_ancestor_or_self(root, id)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append `child` to `parent`'s children, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let index = self.children(parent).len();
        self.add_child_at(parent, child, index)
    }

    /// Insert `child` at `index` (clamped) in `parent`'s children.
    pub fn add_child_at(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(SceneError::UnknownNode(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::WouldCycle { parent, child });
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        self.touch();
        Ok(())
    }

    /// Remove `child` from `parent` without destroying it.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if self.parent(child) != Some(parent) {
            return Err(SceneError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    /// Detach `id` from its parent, if it has one. The subtree stays alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
        self.touch();
    }

    /// Destroy `id` and its whole subtree, including their listeners.
    pub fn remove(&mut self, id: NodeId) {
        if !self.nodes.contains_key(id) {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
            if let Some(map) = self.listeners.remove(current) {
                for listener in map.ids() {
                    self.listener_nodes.remove(listener);
                }
            }
        }
        self.touch();
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn update(&mut self, id: NodeId, f: impl FnOnce(&mut SceneNode)) {
        if let Some(node) = self.nodes.get_mut(id) {
            f(node);
            self.touch();
        }
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) {
        let label = label.into();
        if let Some(node) = self.nodes.get_mut(id) {
            node.label = Some(label);
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.update(id, |n| n.visible = visible);
    }

    pub fn set_interactive(&mut self, id: NodeId, interactive: bool) {
        self.update(id, |n| n.interactive = interactive);
    }

    pub fn set_interactive_children(&mut self, id: NodeId, interactive_children: bool) {
        self.update(id, |n| n.interactive_children = interactive_children);
    }

    pub fn set_hit_area(&mut self, id: NodeId, hit_area: Option<HitShape>) {
        self.update(id, |n| n.hit_area = hit_area);
    }

    pub fn set_mask(&mut self, id: NodeId, mask: Option<HitShape>) {
        self.update(id, |n| n.mask = mask);
    }

    pub fn set_bounds(&mut self, id: NodeId, bounds: Option<Rect>) {
        self.update(id, |n| n.bounds = bounds);
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Affine) {
        self.update(id, |n| n.transform = transform);
    }

    /// Set the cursor label shown while this node is hovered.
    ///
    /// Cursor changes never affect hit testing, so the generation is kept.
    pub fn set_cursor(&mut self, id: NodeId, cursor: Option<&str>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.cursor = cursor.map(str::to_owned);
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Transform from `id`'s local space to world space.
    pub fn world_transform(&self, id: NodeId) -> Affine {
        let mut transform = Affine::IDENTITY;
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            transform = node.transform * transform;
            current = node.parent.and_then(|p| self.nodes.get(p));
        }
        transform
    }

    /// Map a world-space point into `id`'s local space.
    pub fn to_local(&self, id: NodeId, world: Point) -> Point {
        self.world_transform(id).inverse() * world
    }

    /// Map a local point of `id` into world space.
    pub fn to_global(&self, id: NodeId, local: Point) -> Point {
        self.world_transform(id) * local
    }

    /// Geometric containment of a local point, used when no hit area is set.
    pub fn contains_point(&self, id: NodeId, local: Point) -> bool {
        self.nodes
            .get(id)
            .and_then(|n| n.bounds)
            .is_some_and(|bounds| bounds.contains(local))
    }
}
