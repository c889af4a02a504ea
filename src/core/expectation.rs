use super::types::{NodeId, Tick};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExpectationKind {
    /// A direct ping must be acked.
    ReceiveAck,
    /// An indirect probe must produce an ack, or the target is unreachable.
    ReceiveAckOrDeath,
    /// A suspicion must be refuted, or the target is declared dead.
    ClearSuspicion,
}

/// A timeout: by `deadline`, `target` must have satisfied the condition of `kind`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Expectation {
    pub kind: ExpectationKind,
    pub target: NodeId,
    pub deadline: Tick,
}

impl Expectation {
    pub fn new(kind: ExpectationKind, target: NodeId, deadline: Tick) -> Self {
        Self {
            kind,
            target,
            deadline,
        }
    }

    pub fn is_broken(&self, tick: Tick) -> bool {
        self.deadline <= tick
    }
}
