use crate::api::config::SwimConfig;

use super::action::Action;
use super::disseminate::RumorBuffer;
use super::rumor::Rumor;
use super::types::NodeId;

/// Per-node gossip intake and outtake.
///
/// Incoming rumors are merged by precedence (see [`Rumor::is_hotter_than`]) and
/// queued until the node heeds them; outgoing actions get the least shared rumors
/// piggybacked.
#[derive(Clone, Debug)]
pub struct RumorMill {
    rumors: RumorBuffer,
    max_gossip_per_action: usize,
    buffer_size: usize,
    max_shares: u32,
}

impl RumorMill {
    pub fn new(config: &SwimConfig) -> Self {
        Self::with_limits(
            config.gossip_buffer_size(),
            config.max_shares(),
            config.max_gossip_per_action(),
        )
    }

    pub fn with_limits(buffer_size: usize, max_shares: u32, max_gossip_per_action: usize) -> Self {
        Self {
            rumors: RumorBuffer::new(buffer_size, max_shares),
            max_gossip_per_action,
            buffer_size,
            max_shares,
        }
    }

    pub fn rumors(&self) -> &RumorBuffer {
        &self.rumors
    }

    /// Takes on the gossip piggybacked on a received action.
    pub fn listen_to_gossip(&mut self, action: &Action) {
        self.consume_rumors(action.gossip());
    }

    /// Accepts a rumor originated by the owning node.
    pub fn add_rumor(&mut self, rumor: Rumor) {
        self.consume_rumors(&[rumor]);
    }

    /// Drains the unheeded rumors for the owning node to act on, each exactly once.
    pub fn heed_rumors(&mut self) -> Vec<Rumor> {
        self.rumors.heed_all_rumors()
    }

    /// Piggybacks the most relevant rumors onto an outgoing action.
    pub fn spread_gossip(&mut self, action: &mut Action) {
        let gossip = self.rumors.talk_about_n_rumors(self.max_gossip_per_action);
        action.attach_gossip(gossip);
    }

    pub fn forget_rumors_about(&mut self, subject: NodeId) {
        self.rumors.forget_rumors_about(subject);
    }

    pub fn reset_buffers(&mut self) {
        self.rumors = RumorBuffer::new(self.buffer_size, self.max_shares);
    }

    fn consume_rumors(&mut self, rumors: &[Rumor]) {
        for rumor in rumors {
            let is_relevant = match self.rumors.rumor_about(rumor.subject) {
                Some(incumbent) => rumor.is_hotter_than(incumbent),
                None => true,
            };

            if is_relevant {
                self.rumors.forget_rumors_about(rumor.subject);
                self.rumors.add_rumor(*rumor);
            }
        }
    }
}
