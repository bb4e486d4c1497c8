//! Error types for scene mutation and event dispatch.

use crate::scene::NodeId;

/// Errors surfaced while mapping or dispatching federated events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// Walking parents from `target` never reached the boundary's root.
    ///
    /// Either the chain ended at a node that is not the root, or it exceeded
    /// `limit` steps. Dispatch cannot continue safely, since hover and click
    /// state would no longer match the tree.
    #[error("cannot find propagation path to disconnected target {target:?} (limit {limit})")]
    DisconnectedTarget { target: NodeId, limit: usize },
}

/// Errors returned by [`Scene`](crate::scene::Scene) mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("node {0:?} does not exist in this scene")]
    UnknownNode(NodeId),
    #[error("adding {child:?} under {parent:?} would create a cycle")]
    WouldCycle { parent: NodeId, child: NodeId },
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}
