use super::types::NodeId;

/// What a rumor claims about its subject.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RumorType {
    Alive,
    Suspect,
    Dead,
}

impl RumorType {
    pub const ALL: [RumorType; 3] = [RumorType::Alive, RumorType::Suspect, RumorType::Dead];

    /// Share weight added each time a rumor of this type is piggybacked, in quarter shares.
    /// Cheaper rumors stay in circulation longer.
    pub(crate) fn share_cost(&self) -> u32 {
        match self {
            RumorType::Alive => 4,
            RumorType::Suspect => 2,
            RumorType::Dead => 1,
        }
    }
}

/// A piece of membership gossip about a single node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rumor {
    pub subject: NodeId,
    pub incarnation: u64,
    pub originator: NodeId,
    pub kind: RumorType,
}

impl Rumor {
    pub fn alive(subject: NodeId, incarnation: u64, originator: NodeId) -> Self {
        Self {
            subject,
            incarnation,
            originator,
            kind: RumorType::Alive,
        }
    }

    pub fn suspect(subject: NodeId, incarnation: u64, originator: NodeId) -> Self {
        Self {
            subject,
            incarnation,
            originator,
            kind: RumorType::Suspect,
        }
    }

    pub fn dead(subject: NodeId, incarnation: u64, originator: NodeId) -> Self {
        Self {
            subject,
            incarnation,
            originator,
            kind: RumorType::Dead,
        }
    }

    /// Returns `true` if `self` should replace `incumbent`, a rumor about the same subject.
    ///
    /// A dead rumor beats any other type regardless of incarnation, otherwise the
    /// higher incarnation wins, and at equal incarnation a suspicion beats an alive
    /// rumor. Ties keep the incumbent.
    pub fn is_hotter_than(&self, incumbent: &Rumor) -> bool {
        use RumorType::*;

        match (self.kind, incumbent.kind) {
            (Dead, Dead) => self.incarnation > incumbent.incarnation,
            (_, Dead) => false,
            (Dead, _) => true,
            (kind, incumbent_kind) => match self.incarnation.cmp(&incumbent.incarnation) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Less => false,
                std::cmp::Ordering::Equal => kind == Suspect && incumbent_kind == Alive,
            },
        }
    }
}
