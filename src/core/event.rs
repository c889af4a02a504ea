use super::types::NodeId;

/// Membership changes observed during a simulation, published on the
/// [`Network`](crate::Network)'s broadcast channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A node was registered, joining through `introducer` if there was one.
    NodeJoined {
        node: NodeId,
        introducer: Option<NodeId>,
    },
    /// A node left voluntarily and was deregistered.
    NodeLeft { node: NodeId },
    /// `by` started suspecting `suspect`.
    NodeSuspected {
        by: NodeId,
        suspect: NodeId,
        incarnation: u64,
    },
    /// `by` stopped suspecting `recovered`.
    NodeRecovered {
        by: NodeId,
        recovered: NodeId,
        incarnation: u64,
    },
    /// `by` removed `deceased` from its membership view.
    NodeDeceased { by: NodeId, deceased: NodeId },
    /// A node heard of its own death and stopped participating.
    NodeConfirmedDead { node: NodeId },
}
