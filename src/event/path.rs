//! Propagation paths and the hit test result cache.
//!
//! A propagation path lists the nodes an event visits, root first and target
//! last. It is built once per dispatch and then treated as immutable, so
//! listeners that reparent nodes mid-dispatch do not change which nodes the
//! remaining phases visit.

use smallvec::SmallVec;

use crate::error::EventError;
use crate::scene::{NodeId, Scene};

/// Nodes from the root (index 0) to the target (last index).
pub type EventPath = SmallVec<[NodeId; 16]>;

/// Default bound on the number of parent hops in [`propagation_path`].
pub const PROPAGATION_LIMIT: usize = 2048;

/// Build the path from `root` down to `target`.
///
/// Walks `target`'s parents until `root` is reached. Fails with
/// [`EventError::DisconnectedTarget`] if the chain ends elsewhere or takes more
/// than `limit` hops; the path is never silently truncated.
pub fn propagation_path(
    scene: &Scene,
    root: NodeId,
    target: NodeId,
    limit: usize,
) -> Result<EventPath, EventError> {
    let mut path = EventPath::new();
    path.push(target);
    let mut current = target;
    let mut hops = 0;
    while current != root {
        if hops >= limit {
            return Err(EventError::DisconnectedTarget { target, limit });
        }
        match scene.parent(current) {
            Some(parent) => {
                path.push(parent);
                current = parent;
            }
            None => return Err(EventError::DisconnectedTarget { target, limit }),
        }
        hops += 1;
    }
    path.reverse();
    Ok(path)
}

// ============================================================================
// Hit Test Result Cache
// ============================================================================
//
// Two entries, round-robin, like Blink's HIT_TEST_CACHE_SIZE. Down, up and
// click usually arrive at the same point, and move events alternate between
// two nearby positions often enough for the second slot to pay off.
//
// Entries are keyed by the scene generation as well as root and point, so any
// structural or hit-relevant change to the scene invalidates them.

#[derive(Clone)]
struct HitTestCacheEntry {
    root: NodeId,
    x_bits: u64,
    y_bits: u64,
    generation: u64,
    result: Option<EventPath>,
}

/// 2-entry hit test result cache.
#[derive(Default)]
pub struct HitTestCache {
    entries: [Option<HitTestCacheEntry>; 2],
    /// Index of next slot to write (round-robin)
    next_slot: usize,
}

impl HitTestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached hit path.
    /// Returns `Some(result)` on a hit, `None` on a miss.
    #[inline]
    pub fn lookup(
        &self,
        root: NodeId,
        point: peniko::kurbo::Point,
        generation: u64,
    ) -> Option<Option<EventPath>> {
        self.entries.iter().flatten().find_map(|e| {
            // Bitwise comparison, exact match only.
            (e.root == root
                && e.x_bits == point.x.to_bits()
                && e.y_bits == point.y.to_bits()
                && e.generation == generation)
                .then(|| e.result.clone())
        })
    }

    #[inline]
    pub fn insert(
        &mut self,
        root: NodeId,
        point: peniko::kurbo::Point,
        generation: u64,
        result: Option<EventPath>,
    ) {
        self.entries[self.next_slot] = Some(HitTestCacheEntry {
            root,
            x_bits: point.x.to_bits(),
            y_bits: point.y.to_bits(),
            generation,
            result,
        });
        self.next_slot = (self.next_slot + 1) % 2;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries = [None, None];
    }
}
