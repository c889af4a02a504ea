use super::rumor::Rumor;
use super::types::{ActionId, ActionType, NodeId, Tick};

/// Protocol payload of an action, carrying only the fields its type needs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Direct probe. `on_behalf_of` is set when the ping relays a ping-req.
    Ping { on_behalf_of: Option<NodeId> },
    /// Answer to a ping. `on_behalf_of` asks the receiver to relay the ack to the
    /// original requester; `original_from` names the probed node in a relayed ack.
    Ack {
        on_behalf_of: Option<NodeId>,
        original_from: Option<NodeId>,
    },
    /// Request to probe `target` on the sender's behalf.
    PingReq { target: NodeId },
    Join,
    MulticastJoin { subject: NodeId },
    MulticastLeave { subject: NodeId },
    MulticastDeath { subject: NodeId },
}

impl ActionKind {
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionKind::Ping { .. } => ActionType::Ping,
            ActionKind::Ack { .. } => ActionType::Ack,
            ActionKind::PingReq { .. } => ActionType::PingReq,
            ActionKind::Join => ActionType::Join,
            ActionKind::MulticastJoin { .. } => ActionType::MulticastJoin,
            ActionKind::MulticastLeave { .. } => ActionType::MulticastLeave,
            ActionKind::MulticastDeath { .. } => ActionType::MulticastDeath,
        }
    }

    /// Whether rumors may be piggybacked on this kind of action.
    pub fn carries_gossip(&self) -> bool {
        matches!(
            self,
            ActionKind::Ping { .. } | ActionKind::Ack { .. } | ActionKind::PingReq { .. }
        )
    }
}

/// An action requested by a node, not yet dispatched onto the network.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodeAction {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: ActionKind,
}

impl NodeAction {
    pub fn new(from: NodeId, to: NodeId, kind: ActionKind) -> Self {
        Self { from, to, kind }
    }
}

/// A message in transit between two nodes.
///
/// Only the loss flag and the piggybacked gossip change after dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    id: ActionId,
    from: NodeId,
    to: NodeId,
    kind: ActionKind,
    completion_tick: Tick,
    lost: bool,
    gossip: Vec<Rumor>,
}

impl Action {
    pub fn new(
        id: ActionId,
        from: NodeId,
        to: NodeId,
        kind: ActionKind,
        completion_tick: Tick,
    ) -> Self {
        Self {
            id,
            from,
            to,
            kind,
            completion_tick,
            lost: false,
            gossip: Vec::new(),
        }
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn action_type(&self) -> ActionType {
        self.kind.action_type()
    }

    pub fn completion_tick(&self) -> Tick {
        self.completion_tick
    }

    pub fn gossip(&self) -> &[Rumor] {
        &self.gossip
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn is_done(&self, tick: Tick) -> bool {
        tick >= self.completion_tick
    }

    /// Lost actions stay in flight until done but are never delivered.
    pub fn is_deliverable(&self) -> bool {
        !self.lost
    }

    pub(crate) fn mark_lost(&mut self) {
        self.lost = true;
    }

    pub(crate) fn attach_gossip(&mut self, gossip: Vec<Rumor>) {
        self.gossip = gossip;
    }
}

#[cfg(test)]
mod tests {
    use crate::core::types::ActionType;

    use super::{Action, ActionKind};

    #[test]
    fn test_action_is_done_at_completion_tick() {
        let action = Action::new(1, 1, 2, ActionKind::Join, 31);

        assert!(!action.is_done(30));
        assert!(action.is_done(31));
        assert!(action.is_done(32));
    }

    #[test]
    fn test_action_lost_is_not_deliverable() {
        let mut action = Action::new(1, 1, 2, ActionKind::PingReq { target: 3 }, 31);
        assert!(action.is_deliverable());

        action.mark_lost();

        assert!(action.is_lost());
        assert!(!action.is_deliverable());
        assert!(!action.is_done(30));
    }

    #[test]
    fn test_action_kind_types() {
        let ack = ActionKind::Ack {
            on_behalf_of: Some(1),
            original_from: None,
        };

        assert_eq!(ack.action_type(), ActionType::Ack);
        assert!(ack.carries_gossip());
        assert!(!ActionKind::MulticastDeath { subject: 2 }.carries_gossip());
        assert!(!ActionKind::Join.carries_gossip());
    }
}
