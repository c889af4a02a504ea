use super::rumor::{Rumor, RumorType};
use super::types::NodeId;

/// Number of share-weight units that make up one full share.
const SHARE_UNITS: u32 = 4;

#[derive(Clone, Debug)]
struct RumorEntry {
    rumor: Rumor,
    /// Whether the owning node has acted on the rumor.
    heeded: bool,
    /// Accumulated share weight in quarter shares, see [`RumorType::share_cost`].
    share_weight: u32,
}

impl RumorEntry {
    fn new(rumor: Rumor) -> Self {
        Self {
            rumor,
            heeded: false,
            share_weight: 0,
        }
    }
}

/// Bounded store of gossip for a single node, holding at most one rumor per subject.
///
/// Entries are kept in insertion order; selection for sharing always prefers the
/// least shared entries, falling back to the oldest among equals.
#[derive(Clone, Debug)]
pub struct RumorBuffer {
    entries: Vec<RumorEntry>,
    max_size: usize,
    max_share_weight: u32,
}

impl RumorBuffer {
    pub fn new(max_size: usize, max_shares: u32) -> Self {
        Self {
            entries: Vec::new(),
            max_size: max_size.max(1),
            max_share_weight: max_shares.max(1) * SHARE_UNITS,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Inserts a rumor about a subject the buffer does not hold yet.
    ///
    /// Returns `false` if a rumor about the subject already exists; superseding is
    /// the caller's job via [`RumorBuffer::forget_rumors_about`].
    pub fn add_rumor(&mut self, rumor: Rumor) -> bool {
        if self.rumor_about(rumor.subject).is_some() {
            return false;
        }

        self.entries.push(RumorEntry::new(rumor));

        if self.entries.len() > self.max_size {
            self.evict_most_shared();
        }

        true
    }

    pub fn rumor_about(&self, subject: NodeId) -> Option<&Rumor> {
        self.entries
            .iter()
            .find(|entry| entry.rumor.subject == subject)
            .map(|entry| &entry.rumor)
    }

    pub fn has_dead_rumor_about(&self, subject: NodeId) -> bool {
        self.rumor_about(subject)
            .is_some_and(|rumor| rumor.kind == RumorType::Dead)
    }

    pub fn forget_rumors_about(&mut self, subject: NodeId) {
        self.entries.retain(|entry| entry.rumor.subject != subject);
    }

    pub fn peek_at_rumors(&self) -> Vec<Rumor> {
        self.entries.iter().map(|entry| entry.rumor).collect()
    }

    pub fn peek_at_unheeded_rumors(&self) -> Vec<Rumor> {
        self.entries
            .iter()
            .filter(|entry| !entry.heeded)
            .map(|entry| entry.rumor)
            .collect()
    }

    /// Marks every entry as heeded and returns the rumors that were not yet.
    pub fn heed_all_rumors(&mut self) -> Vec<Rumor> {
        self.entries
            .iter_mut()
            .filter(|entry| !entry.heeded)
            .map(|entry| {
                entry.heeded = true;
                entry.rumor
            })
            .collect()
    }

    /// Selects up to `n` rumors to piggyback on an outgoing action.
    ///
    /// The first pass aims for an even split across rumor types, taking at most
    /// `n / 3` of each. If that leaves free slots, the second pass fills them from
    /// whatever is left. Entries at the share ceiling are never selected, and heeded
    /// entries that reach it afterwards are forgotten.
    pub fn talk_about_n_rumors(&mut self, n: usize) -> Vec<Rumor> {
        let target_per_type = n / RumorType::ALL.len();

        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by_key(|&i| self.entries[i].share_weight);

        let mut selected: Vec<usize> = Vec::with_capacity(n);
        let mut per_type = [0usize; 3];

        for &i in &order {
            if selected.len() >= n {
                break;
            }

            let entry = &self.entries[i];
            if entry.share_weight >= self.max_share_weight {
                continue;
            }

            let slot = type_slot(entry.rumor.kind);
            if per_type[slot] < target_per_type {
                per_type[slot] += 1;
                selected.push(i);
            }
        }

        if selected.len() < n {
            for &i in &order {
                if selected.len() >= n {
                    break;
                }

                if self.entries[i].share_weight >= self.max_share_weight || selected.contains(&i) {
                    continue;
                }

                selected.push(i);
            }
        }

        let gossip = selected
            .iter()
            .map(|&i| {
                let entry = &mut self.entries[i];
                entry.share_weight += entry.rumor.kind.share_cost();
                entry.rumor
            })
            .collect();

        let max_share_weight = self.max_share_weight;
        self.entries
            .retain(|entry| !(entry.heeded && entry.share_weight >= max_share_weight));

        gossip
    }

    /// Drops the most shared entry; among equals the oldest one goes first.
    fn evict_most_shared(&mut self) {
        let most_shared = self
            .entries
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, entry)| entry.share_weight)
            .map(|(i, _)| i);

        if let Some(i) = most_shared {
            let evicted = self.entries.remove(i);
            tracing::trace!("evicting rumor {:?} from full buffer", evicted.rumor);
        }
    }
}

fn type_slot(kind: RumorType) -> usize {
    match kind {
        RumorType::Alive => 0,
        RumorType::Suspect => 1,
        RumorType::Dead => 2,
    }
}
