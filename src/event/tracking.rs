//! Per-pointer interaction state.
//!
//! Each pointer id that has interacted with a boundary gets a
//! [`TrackingRecord`]. Targets are stored as full propagation paths rather
//! than single nodes, so a later event can recover the deepest node of the
//! chain that is still mounted when the original target has been removed.

use rustc_hash::FxHashMap;
use ui_events::pointer::{PointerId, PointerType};

use super::path::EventPath;
use crate::pointer::MouseButton;
use crate::scene::NodeId;

/// Last click on a given button, used for multi-click counting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickRecord {
    pub count: u32,
    pub target: NodeId,
    /// Host timestamp of the click, in milliseconds.
    pub timestamp: f64,
}

#[derive(Debug, Clone)]
pub struct TrackingRecord {
    pub(crate) press_targets_by_button: FxHashMap<MouseButton, EventPath>,
    pub(crate) clicks_by_button: FxHashMap<MouseButton, ClickRecord>,
    pub(crate) over_targets: Option<EventPath>,
    pub(crate) pointer_type: PointerType,
    /// Timestamp of the last event seen for this pointer.
    pub(crate) last_seen: f64,
}

impl Default for TrackingRecord {
    fn default() -> Self {
        Self {
            press_targets_by_button: FxHashMap::default(),
            clicks_by_button: FxHashMap::default(),
            over_targets: None,
            pointer_type: PointerType::Mouse,
            last_seen: 0.0,
        }
    }
}

impl TrackingRecord {
    /// The path captured when `button` went down, if it is still held.
    pub fn press_path(&self, button: MouseButton) -> Option<&EventPath> {
        self.press_targets_by_button.get(&button)
    }

    /// The path currently hovered by this pointer.
    pub fn over_path(&self) -> Option<&EventPath> {
        self.over_targets.as_ref()
    }

    pub fn last_click(&self, button: MouseButton) -> Option<&ClickRecord> {
        self.clicks_by_button.get(&button)
    }

    pub fn has_pressed_buttons(&self) -> bool {
        !self.press_targets_by_button.is_empty()
    }

    /// Record a click on `target` and return its click count.
    ///
    /// The count grows when the previous click on the same button hit the
    /// same target strictly less than `interval_ms` earlier, and restarts at
    /// one otherwise.
    pub(crate) fn register_click(
        &mut self,
        button: MouseButton,
        target: NodeId,
        timestamp: f64,
        interval_ms: f64,
    ) -> u32 {
        let count = match self.clicks_by_button.get(&button) {
            Some(prev) if prev.target == target && timestamp - prev.timestamp < interval_ms => {
                prev.count + 1
            }
            _ => 1,
        };
        self.clicks_by_button.insert(
            button,
            ClickRecord {
                count,
                target,
                timestamp,
            },
        );
        count
    }
}

/// All tracking records of one boundary.
#[derive(Debug, Default)]
pub struct TrackingStore {
    records: FxHashMap<PointerId, TrackingRecord>,
}

impl TrackingStore {
    pub fn get(&self, pointer_id: PointerId) -> Option<&TrackingRecord> {
        self.records.get(&pointer_id)
    }

    /// The record for `pointer_id`, created on first use.
    pub fn entry(&mut self, pointer_id: PointerId) -> &mut TrackingRecord {
        self.records.entry(pointer_id).or_default()
    }

    pub fn remove(&mut self, pointer_id: PointerId) -> Option<TrackingRecord> {
        self.records.remove(&pointer_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop touch records that hold no presses and have been idle for longer
    /// than `idle_ms` at time `now`.
    ///
    /// Mouse and pen records always survive, since their hover chain has to
    /// outlive any pause in movement.
    pub(crate) fn evict_idle(&mut self, now: f64, idle_ms: f64) {
        self.records.retain(|id, record| {
            let stale = matches!(record.pointer_type, PointerType::Touch)
                && !record.has_pressed_buttons()
                && now - record.last_seen > idle_ms;
            if stale {
                log::debug!("evicting idle tracking record for {id:?}");
            }
            !stale
        });
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
