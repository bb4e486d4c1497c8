//! # Event boundary
//!
//! An [`EventBoundary`] connects one scene root to the event pipeline. It
//! owns everything that is per-root rather than per-scene:
//!
//! - the root target, updated by the host each time it renders a new root
//! - the cursor the hovered node asks for
//! - the table mapping incoming event types to mapper functions
//! - per-pointer [`TrackingStore`] state (press targets, hover chain, clicks)
//! - a hit test cache and a small pool of reusable events
//!
//! Incoming events enter through [`EventBoundary::map_event`]. The mappers
//! registered for the event's type hit test, derive higher-level events and
//! deliver them with [`EventBoundary::dispatch_event`], which runs the
//! capturing, at-target and bubbling phases over the event's composed path.

use std::{borrow::Cow, rc::Rc, time::Duration};

use peniko::kurbo::Point;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use ui_events::pointer::PointerId;

use super::{
    EventPayload, EventPhase, FederatedEvent,
    hit_test::{hit_test_path, interactive_nodes},
    mapping,
    path::{EventPath, HitTestCache, PROPAGATION_LIMIT, propagation_path},
    tracking::{TrackingRecord, TrackingStore},
};
use crate::error::EventError;
use crate::scene::{NodeId, Scene};

/// A function deriving federated events from one incoming event type.
pub type EventMapper =
    Rc<dyn Fn(&mut EventBoundary, &mut Scene, &FederatedEvent) -> Result<(), EventError>>;

/// Callback receiving every event after it has been dispatched, with the type
/// it was dispatched as.
pub type EventObserver = Box<dyn FnMut(&str, &FederatedEvent)>;

/// Freed events kept for reuse.
const EVENT_POOL_LIMIT: usize = 32;

/// Tunables for an [`EventBoundary`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryConfig {
    /// Two clicks on the same node closer than this count as a multi-click.
    pub click_interval: Duration,
    /// Maximum parent hops when building a propagation path.
    pub propagation_limit: usize,
    /// Broadcast `pointermove` to every interactive node instead of
    /// dispatching it to the hit target.
    pub move_on_all: bool,
    /// Send `globalpointermove` to every interactive node on each move.
    pub enable_global_move_events: bool,
    /// Idle time after which a released touch pointer's record is dropped.
    pub tracking_idle_timeout: Duration,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            click_interval: Duration::from_millis(200),
            propagation_limit: PROPAGATION_LIMIT,
            move_on_all: false,
            enable_global_move_events: true,
            tracking_idle_timeout: Duration::from_secs(1),
        }
    }
}

impl BoundaryConfig {
    pub fn click_interval(mut self, interval: Duration) -> Self {
        self.click_interval = interval;
        self
    }

    pub fn propagation_limit(mut self, limit: usize) -> Self {
        self.propagation_limit = limit;
        self
    }

    pub fn move_on_all(mut self, move_on_all: bool) -> Self {
        self.move_on_all = move_on_all;
        self
    }

    pub fn enable_global_move_events(mut self, enable: bool) -> Self {
        self.enable_global_move_events = enable;
        self
    }

    pub fn tracking_idle_timeout(mut self, timeout: Duration) -> Self {
        self.tracking_idle_timeout = timeout;
        self
    }
}

pub struct EventBoundary {
    root_target: Option<NodeId>,
    cursor: Option<String>,
    config: BoundaryConfig,
    mappings: FxHashMap<Cow<'static, str>, SmallVec<[EventMapper; 2]>>,
    tracking: TrackingStore,
    observers: Vec<EventObserver>,
    hit_cache: HitTestCache,
    pool: Vec<FederatedEvent>,
}

impl Default for EventBoundary {
    fn default() -> Self {
        Self::new(BoundaryConfig::default())
    }
}

impl EventBoundary {
    /// A boundary with the built-in pointer and wheel mappings installed.
    pub fn new(config: BoundaryConfig) -> Self {
        let mut boundary = Self {
            root_target: None,
            cursor: None,
            config,
            mappings: FxHashMap::default(),
            tracking: TrackingStore::default(),
            observers: Vec::new(),
            hit_cache: HitTestCache::new(),
            pool: Vec::new(),
        };
        mapping::register_defaults(&mut boundary);
        boundary
    }

    /// A boundary already attached to `root`.
    pub fn with_root(root: NodeId, config: BoundaryConfig) -> Self {
        let mut boundary = Self::new(config);
        boundary.root_target = Some(root);
        boundary
    }

    pub fn root_target(&self) -> Option<NodeId> {
        self.root_target
    }

    /// Point the boundary at the root that was last rendered.
    pub fn set_root_target(&mut self, root: Option<NodeId>) {
        if self.root_target != root {
            self.hit_cache.clear();
        }
        self.root_target = root;
    }

    /// Cursor requested by the node under the pointer, if any.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub(crate) fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }

    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut BoundaryConfig {
        &mut self.config
    }

    // =========================================================================
    // Mapping table
    // =========================================================================

    /// Run `mapper` for every incoming event of type `ty`.
    ///
    /// Mappers for the same type run in registration order.
    pub fn add_event_mapping(
        &mut self,
        ty: impl Into<Cow<'static, str>>,
        mapper: impl Fn(&mut EventBoundary, &mut Scene, &FederatedEvent) -> Result<(), EventError>
        + 'static,
    ) {
        self.mappings
            .entry(ty.into())
            .or_default()
            .push(Rc::new(mapper));
    }

    /// Drop every mapper registered for `ty`.
    pub fn remove_event_mappings(&mut self, ty: &str) {
        self.mappings.remove(ty);
    }

    pub fn has_event_mapping(&self, ty: &str) -> bool {
        self.mappings.contains_key(ty)
    }

    /// Derive and dispatch federated events from an incoming event.
    ///
    /// Does nothing until a root target is set. Events whose type has no
    /// mapping are logged and dropped.
    pub fn map_event(&mut self, scene: &mut Scene, event: &FederatedEvent) -> Result<(), EventError> {
        if self.root_target.is_none() {
            return Ok(());
        }
        let Some(mappers) = self.mappings.get(event.ty.as_ref()).cloned() else {
            log::warn!("[EventBoundary]: event mapping not defined for {}", event.ty);
            return Ok(());
        };
        if matches!(event.payload, EventPayload::Pointer(_)) {
            let idle = self.config.tracking_idle_timeout.as_secs_f64() * 1000.0;
            self.tracking.evict_idle(event.timestamp, idle);
        }
        for mapper in mappers {
            mapper(self, scene, event)?;
        }
        Ok(())
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Receive every dispatched event, after its listeners have run.
    pub fn observe(&mut self, observer: impl FnMut(&str, &FederatedEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    // =========================================================================
    // Hit testing
    // =========================================================================

    /// Root-to-target chain of the topmost interactive node under `point`.
    pub fn hit_test_path(&mut self, scene: &Scene, point: Point) -> Option<EventPath> {
        let root = self.root_target?;
        let generation = scene.generation();
        if let Some(cached) = self.hit_cache.lookup(root, point, generation) {
            return cached;
        }
        let result = hit_test_path(scene, root, point);
        self.hit_cache.insert(root, point, generation, result.clone());
        result
    }

    /// The topmost interactive node under `point`.
    pub fn hit_test(&mut self, scene: &Scene, point: Point) -> Option<NodeId> {
        self.hit_test_path(scene, point)
            .and_then(|path| path.last().copied())
    }

    // =========================================================================
    // Propagation
    // =========================================================================

    /// Path from the root target down to `target`.
    pub fn propagation_path(&self, scene: &Scene, target: NodeId) -> Result<EventPath, EventError> {
        let Some(root) = self.root_target else {
            return Err(EventError::DisconnectedTarget {
                target,
                limit: self.config.propagation_limit,
            });
        };
        propagation_path(scene, root, target, self.config.propagation_limit)
    }

    /// Dispatch `event` under its own type.
    pub fn dispatch_event(
        &mut self,
        scene: &mut Scene,
        event: &mut FederatedEvent,
    ) -> Result<(), EventError> {
        let ty = event.ty.clone();
        self.dispatch_inner(scene, event, &ty)
    }

    /// Dispatch `event` as if its type were `ty`, leaving `event.ty` unchanged.
    pub fn dispatch_event_as(
        &mut self,
        scene: &mut Scene,
        event: &mut FederatedEvent,
        ty: &str,
    ) -> Result<(), EventError> {
        self.dispatch_inner(scene, event, ty)
    }

    fn dispatch_inner(
        &mut self,
        scene: &mut Scene,
        event: &mut FederatedEvent,
        ty: &str,
    ) -> Result<(), EventError> {
        event.clear_propagation_flags();
        self.propagate(scene, event, ty)?;
        for observer in &mut self.observers {
            observer(ty, &*event);
        }
        Ok(())
    }

    /// Run the capturing, at-target and bubbling phases for `event`.
    ///
    /// The composed path is computed once (or reused when the event already
    /// carries one ending at its target) and then followed as a snapshot,
    /// even if listeners restructure the scene while it runs.
    pub fn propagate(
        &mut self,
        scene: &mut Scene,
        event: &mut FederatedEvent,
        ty: &str,
    ) -> Result<(), EventError> {
        let Some(target) = event.target else {
            return Ok(());
        };
        if event.path.last() != Some(&target) {
            event.path = self.propagation_path(scene, target)?;
        }
        let path = event.path.clone();
        let ancestors = &path[..path.len() - 1];
        log::trace!("dispatching {ty} along {} nodes", path.len());

        event.phase = EventPhase::Capturing;
        for &node in ancestors {
            event.current_target = Some(node);
            scene.notify_listeners(node, ty, true, event);
            if event.is_propagation_stopped() {
                Self::finish(event);
                return Ok(());
            }
        }

        event.phase = EventPhase::AtTarget;
        event.current_target = Some(target);
        scene.notify_listeners(target, ty, false, event);
        if event.is_propagation_stopped() {
            Self::finish(event);
            return Ok(());
        }

        event.phase = EventPhase::Bubbling;
        for &node in ancestors.iter().rev() {
            event.current_target = Some(node);
            scene.notify_listeners(node, ty, false, event);
            if event.is_propagation_stopped() {
                break;
            }
        }
        Self::finish(event);
        Ok(())
    }

    fn finish(event: &mut FederatedEvent) {
        event.phase = EventPhase::None;
        event.current_target = None;
    }

    /// Invoke the listeners of `event.current_target` for `ty`.
    ///
    /// Capture-keyed listeners are used while the event is in the capturing
    /// phase, plain ones otherwise.
    pub fn notify_target(&mut self, scene: &mut Scene, event: &mut FederatedEvent, ty: &str) {
        let Some(node) = event.current_target else {
            return;
        };
        let capture = event.phase == EventPhase::Capturing;
        scene.notify_listeners(node, ty, capture, event);
    }

    /// Deliver `event` as `ty` to every visible interactive node, in reverse
    /// tree order, without hit testing.
    pub fn broadcast(&mut self, scene: &mut Scene, event: &mut FederatedEvent, ty: &str) {
        let Some(root) = self.root_target else {
            return;
        };
        event.phase = EventPhase::Bubbling;
        for node in interactive_nodes(scene, root) {
            // An earlier listener may have removed it.
            if !scene.contains(node) {
                continue;
            }
            event.current_target = Some(node);
            self.notify_target(scene, event, ty);
        }
        Self::finish(event);
    }

    /// The deepest node of `path` that is still mounted under the root.
    ///
    /// The path must start at the current root; from there each following
    /// entry is accepted while it is still a child of the previous one.
    pub fn find_mounted(&self, scene: &Scene, path: &[NodeId]) -> Option<NodeId> {
        let (&first, rest) = path.split_first()?;
        if Some(first) != self.root_target || !scene.contains(first) {
            return None;
        }
        let mut current = first;
        for &node in rest {
            if scene.parent(node) != Some(current) {
                break;
            }
            current = node;
        }
        Some(current)
    }

    // =========================================================================
    // Event pool
    // =========================================================================

    /// A blank event, reused from the pool when one is available.
    pub fn allocate_event(&mut self) -> FederatedEvent {
        self.pool.pop().unwrap_or_default()
    }

    /// Return `event` to the pool.
    pub fn free_event(&mut self, mut event: FederatedEvent) {
        if self.pool.len() < EVENT_POOL_LIMIT {
            event.reset();
            self.pool.push(event);
        }
    }

    /// A pooled copy of `from`, retyped to `ty` and aimed at `target`.
    pub fn create_event(
        &mut self,
        from: &FederatedEvent,
        ty: &'static str,
        target: Option<NodeId>,
    ) -> FederatedEvent {
        let mut event = self.allocate_event();
        event.copy_from(from);
        event.ty = Cow::Borrowed(ty);
        event.target = target;
        event
    }

    // =========================================================================
    // Tracking
    // =========================================================================

    pub fn tracking(&self, pointer_id: PointerId) -> Option<&TrackingRecord> {
        self.tracking.get(pointer_id)
    }

    pub fn tracked_pointers(&self) -> usize {
        self.tracking.len()
    }

    /// The tracking record for `event`'s pointer, refreshed with its type and
    /// timestamp.
    pub(crate) fn track(&mut self, event: &FederatedEvent) -> &mut TrackingRecord {
        let record = self.tracking.entry(event.pointer_id());
        record.pointer_type = event.pointer_type();
        record.last_seen = event.timestamp;
        record
    }

    pub(crate) fn forget_pointer(&mut self, pointer_id: PointerId) {
        if self.tracking.remove(pointer_id).is_some() {
            log::debug!("dropped tracking record for {pointer_id:?}");
        }
    }

    /// Clear all per-pointer state, e.g. when the root is replaced.
    pub fn reset_tracking(&mut self) {
        self.tracking.clear();
        self.cursor = None;
    }
}
