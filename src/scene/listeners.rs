//! Per-node listener registries.
//!
//! Listeners are keyed by event type and by whether they run during the
//! capturing phase. Invocation always works from a snapshot of the list, so a
//! callback can add or remove listeners (or mutate the tree) while an event is
//! being delivered.

use std::{borrow::Cow, cell::RefCell, rc::Rc};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::{NodeId, Scene};
use crate::event::FederatedEvent;

slotmap::new_key_type! {
    /// Handle returned when registering a listener, used to remove it again.
    pub struct ListenerId;
}

/// Callback type for scene listeners.
///
/// Listeners receive the event being delivered and mutable access to the
/// scene, so they may detach or reparent nodes mid-dispatch.
pub type EventCallback = dyn FnMut(&mut FederatedEvent, &mut Scene);

/// Options for [`Scene::add_listener`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Run while the event travels from the root down to the target.
    pub capture: bool,
    /// Remove the listener right before its first invocation.
    pub once: bool,
}

impl ListenerOptions {
    pub fn capture() -> Self {
        Self {
            capture: true,
            once: false,
        }
    }

    pub fn once() -> Self {
        Self {
            capture: false,
            once: true,
        }
    }
}

#[derive(Clone)]
pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) once: bool,
    pub(crate) callback: Rc<RefCell<Box<EventCallback>>>,
}

pub(crate) type ListenerSnapshot = SmallVec<[Listener; 4]>;

#[derive(Default)]
pub(crate) struct ListenerMap {
    bubble: FxHashMap<Cow<'static, str>, SmallVec<[Listener; 2]>>,
    capture: FxHashMap<Cow<'static, str>, SmallVec<[Listener; 2]>>,
}

impl ListenerMap {
    fn table(&self, capture: bool) -> &FxHashMap<Cow<'static, str>, SmallVec<[Listener; 2]>> {
        if capture { &self.capture } else { &self.bubble }
    }

    fn table_mut(
        &mut self,
        capture: bool,
    ) -> &mut FxHashMap<Cow<'static, str>, SmallVec<[Listener; 2]>> {
        if capture {
            &mut self.capture
        } else {
            &mut self.bubble
        }
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        for table in [&mut self.bubble, &mut self.capture] {
            let found = table.iter_mut().find_map(|(ty, listeners)| {
                let index = listeners.iter().position(|l| l.id == id)?;
                listeners.remove(index);
                Some((ty.clone(), listeners.is_empty()))
            });
            if let Some((ty, emptied)) = found {
                if emptied {
                    table.remove(ty.as_ref());
                }
                return true;
            }
        }
        false
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.bubble
            .values()
            .chain(self.capture.values())
            .flat_map(|listeners| listeners.iter().map(|l| l.id))
    }
}

impl Scene {
    /// Register `callback` for events of type `ty` reaching `node`.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        ty: impl Into<Cow<'static, str>>,
        options: ListenerOptions,
        callback: impl FnMut(&mut FederatedEvent, &mut Scene) + 'static,
    ) -> Result<ListenerId, crate::SceneError> {
        if !self.nodes.contains_key(node) {
            return Err(crate::SceneError::UnknownNode(node));
        }
        let id = self.listener_nodes.insert(node);
        let listener = Listener {
            id,
            once: options.once,
            callback: Rc::new(RefCell::new(Box::new(callback))),
        };
        if !self.listeners.contains_key(node) {
            self.listeners.insert(node, ListenerMap::default());
        }
        if let Some(map) = self.listeners.get_mut(node) {
            map.table_mut(options.capture)
                .entry(ty.into())
                .or_default()
                .push(listener);
        }
        Ok(id)
    }

    /// Register a bubbling/at-target listener.
    pub fn on(
        &mut self,
        node: NodeId,
        ty: impl Into<Cow<'static, str>>,
        callback: impl FnMut(&mut FederatedEvent, &mut Scene) + 'static,
    ) -> Result<ListenerId, crate::SceneError> {
        self.add_listener(node, ty, ListenerOptions::default(), callback)
    }

    /// Register a capturing-phase listener.
    pub fn on_capture(
        &mut self,
        node: NodeId,
        ty: impl Into<Cow<'static, str>>,
        callback: impl FnMut(&mut FederatedEvent, &mut Scene) + 'static,
    ) -> Result<ListenerId, crate::SceneError> {
        self.add_listener(node, ty, ListenerOptions::capture(), callback)
    }

    /// Register a listener that is removed after its first invocation.
    pub fn once(
        &mut self,
        node: NodeId,
        ty: impl Into<Cow<'static, str>>,
        callback: impl FnMut(&mut FederatedEvent, &mut Scene) + 'static,
    ) -> Result<ListenerId, crate::SceneError> {
        self.add_listener(node, ty, ListenerOptions::once(), callback)
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let Some(node) = self.listener_nodes.remove(id) else {
            return false;
        };
        self.listeners
            .get_mut(node)
            .is_some_and(|map| map.remove(id))
    }

    /// Whether `node` has any listener for `ty` in the given phase table.
    pub fn has_listener(&self, node: NodeId, ty: &str, capture: bool) -> bool {
        self.listeners
            .get(node)
            .and_then(|map| map.table(capture).get(ty))
            .is_some_and(|listeners| !listeners.is_empty())
    }

    /// Invoke `node`'s plain listeners for `ty`, as an emitter would.
    ///
    /// `current_target` is set to `node`; the event's phase is left untouched.
    pub fn emit(&mut self, node: NodeId, ty: &str, event: &mut FederatedEvent) {
        event.current_target = Some(node);
        self.notify_listeners(node, ty, false, event);
    }

    pub(crate) fn listeners_for(&self, node: NodeId, ty: &str, capture: bool) -> ListenerSnapshot {
        self.listeners
            .get(node)
            .and_then(|map| map.table(capture).get(ty))
            .map(|listeners| listeners.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Run listeners in registration order, stopping once
    /// `stop_immediate_propagation` has been called.
    pub(crate) fn notify_listeners(
        &mut self,
        node: NodeId,
        ty: &str,
        capture: bool,
        event: &mut FederatedEvent,
    ) {
        let snapshot = self.listeners_for(node, ty, capture);
        for listener in snapshot {
            if event.is_immediate_propagation_stopped() {
                break;
            }
            // Removed by an earlier listener in this same snapshot.
            if !self.listener_nodes.contains_key(listener.id) {
                continue;
            }
            if listener.once {
                self.off(listener.id);
            }
            match listener.callback.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(event, self),
                Err(_) => log::trace!("skipping re-entrant listener {:?} for {ty}", listener.id),
            }
        }
    }
}
