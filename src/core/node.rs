use std::collections::{BTreeMap, BTreeSet};

use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, RngCore};

use crate::api::config::SwimConfig;
use crate::error::{Error, Result};

use super::action::{Action, ActionKind, NodeAction};
use super::config::NetworkConfig;
use super::event::Event;
use super::expectation::{Expectation, ExpectationKind};
use super::mill::RumorMill;
use super::render::{ElementId, NodeStyle, RenderSink};
use super::rumor::{Rumor, RumorType};
use super::types::{DisseminationApproach, NodeId, OverlayMode, PingApproach, Tick};

/// Everything a node may touch while handling a tick or an action.
pub(crate) struct NodeContext<'a> {
    pub(crate) tick: Tick,
    pub(crate) config: &'a SwimConfig,
    pub(crate) settings: &'a NetworkConfig,
    pub(crate) rng: &'a mut dyn RngCore,
    pub(crate) outbox: &'a mut Vec<NodeAction>,
    pub(crate) events: &'a mut Vec<Event>,
}

/// A single participant of the SWIM protocol.
///
/// A node only ever talks to its peers through the actions it puts into the
/// outbox of its [`NodeContext`]; the [`Network`](crate::Network) routes them.
#[derive(Clone, Debug)]
pub struct SwimNode {
    id: NodeId,
    label: String,
    known_peers: BTreeSet<NodeId>,
    suspected_peers: BTreeSet<NodeId>,
    incarnations: BTreeMap<NodeId, u64>,
    incarnation: u64,
    faulty: bool,
    left: bool,
    has_heard_of_own_death: bool,
    phase_offset: u64,
    round_robin: Vec<NodeId>,
    round_robin_cursor: usize,
    expectations: Vec<Expectation>,
    rumor_mill: RumorMill,
}

impl SwimNode {
    pub(crate) fn new(
        id: NodeId,
        label: impl Into<String>,
        config: &SwimConfig,
        rng: &mut dyn RngCore,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            known_peers: BTreeSet::new(),
            suspected_peers: BTreeSet::new(),
            incarnations: BTreeMap::new(),
            incarnation: 0,
            faulty: false,
            left: false,
            has_heard_of_own_death: false,
            phase_offset: rng.gen_range(0..config.ping_interval()),
            round_robin: Vec::new(),
            round_robin_cursor: 0,
            expectations: Vec::new(),
            rumor_mill: RumorMill::new(config),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn known_peers(&self) -> &BTreeSet<NodeId> {
        &self.known_peers
    }

    pub fn suspected_peers(&self) -> &BTreeSet<NodeId> {
        &self.suspected_peers
    }

    /// The highest incarnation heard of for `peer`, `0` if none.
    pub fn incarnation_of(&self, peer: NodeId) -> u64 {
        self.incarnations.get(&peer).copied().unwrap_or_default()
    }

    pub fn incarnation(&self) -> u64 {
        self.incarnation
    }

    pub fn is_faulty(&self) -> bool {
        self.faulty
    }

    pub fn has_left(&self) -> bool {
        self.left
    }

    pub fn has_heard_of_own_death(&self) -> bool {
        self.has_heard_of_own_death
    }

    pub fn is_disabled(&self) -> bool {
        self.faulty || self.left || self.has_heard_of_own_death
    }

    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    pub fn rumor_mill(&self) -> &RumorMill {
        &self.rumor_mill
    }

    /// Returns `true` if the flag actually changed. Expectations that went stale
    /// while the node was faulty are dropped on recovery.
    pub(crate) fn set_faulty(&mut self, faulty: bool) -> bool {
        if self.faulty == faulty {
            return false;
        }

        if !faulty {
            self.expectations.clear();
        }
        self.faulty = faulty;
        true
    }

    pub(crate) fn join_network(&mut self, introducer: NodeId, ctx: &mut NodeContext<'_>) {
        if introducer == self.id {
            return;
        }

        tracing::info!("[{}] joining through {}", self.id, introducer);
        self.known_peers.insert(introducer);
        self.send(ctx, introducer, ActionKind::Join);

        if ctx.settings.dissemination_approach().is_gossip() {
            self.rumor_mill
                .add_rumor(Rumor::alive(self.id, self.incarnation, self.id));
            self.heed_rumors(ctx);
        }
    }

    pub(crate) fn leave_network(&mut self, ctx: &mut NodeContext<'_>) {
        if self.left {
            return;
        }

        tracing::info!("[{}] leaving the network", self.id);
        self.expectations.clear();
        self.left = true;

        if self.faulty {
            return;
        }

        if ctx.settings.dissemination_approach() == DisseminationApproach::Multicast {
            for peer in self.known_peers.clone() {
                self.send(ctx, peer, ActionKind::MulticastLeave { subject: self.id });
            }
        }
    }

    pub(crate) fn tick(&mut self, ctx: &mut NodeContext<'_>) {
        if self.is_disabled() {
            return;
        }

        if (ctx.tick + self.phase_offset) % ctx.config.ping_interval() == 0 {
            self.probe(ctx);
        }

        if ctx.tick % ctx.config.expectation_check_interval() == 0 {
            self.check_expectations(ctx);
        }

        self.heed_rumors(ctx);
    }

    pub(crate) fn receive_action(
        &mut self,
        action: &Action,
        ctx: &mut NodeContext<'_>,
    ) -> Result<()> {
        if self.is_disabled() {
            return Ok(());
        }

        if action.to() != self.id {
            return Err(Error::MalformedPayload {
                message: format!(
                    "[{}] received action {} addressed to {}",
                    self.id,
                    action.id(),
                    action.to()
                ),
                location: snafu::location!(),
            });
        }

        self.rumor_mill.listen_to_gossip(action);

        let from = action.from();
        let result = match *action.kind() {
            ActionKind::Ping { on_behalf_of } => {
                self.handle_ping(from, on_behalf_of, ctx);
                Ok(())
            }
            ActionKind::Ack {
                on_behalf_of,
                original_from,
            } => {
                self.handle_ack(from, on_behalf_of, original_from, ctx);
                Ok(())
            }
            ActionKind::PingReq { target } => self.handle_ping_req(from, target, ctx),
            ActionKind::Join => {
                self.handle_join(from, ctx);
                Ok(())
            }
            ActionKind::MulticastJoin { subject } => {
                if subject != self.id {
                    self.accept_peer(subject, ctx);
                }
                Ok(())
            }
            ActionKind::MulticastLeave { subject } => {
                self.handle_multicast_leave(subject);
                Ok(())
            }
            ActionKind::MulticastDeath { subject } => {
                self.handle_multicast_death(subject, ctx);
                Ok(())
            }
        };

        self.heed_rumors(ctx);
        result
    }

    /// Piggybacks gossip on an outgoing action if the dissemination approach uses it.
    pub(crate) fn spread_gossip(&mut self, action: &mut Action, settings: &NetworkConfig) {
        if settings.dissemination_approach().is_gossip() && action.kind().carries_gossip() {
            self.rumor_mill.spread_gossip(action);
        }
    }

    pub(crate) fn reset_round_robin(&mut self) {
        self.round_robin.clear();
        self.round_robin_cursor = 0;
    }

    /// Drops everything that belongs to the previous dissemination approach.
    pub(crate) fn reset_dissemination_state(&mut self) {
        self.expectations.clear();
        self.rumor_mill.reset_buffers();
    }

    pub(crate) fn render(&self, sink: &mut dyn RenderSink, overlay: OverlayMode) {
        let style = if self.has_heard_of_own_death {
            NodeStyle::Dead
        } else if self.left {
            NodeStyle::Left
        } else if self.faulty {
            NodeStyle::Faulty
        } else {
            NodeStyle::Active
        };

        let label = match overlay {
            OverlayMode::None => self.label.clone(),
            OverlayMode::Incarnation => format!("{} (inc {})", self.label, self.incarnation),
            OverlayMode::Membership => format!(
                "{} [{} known, {} suspected]",
                self.label,
                self.known_peers.len(),
                self.suspected_peers.len()
            ),
        };

        sink.upsert_node(ElementId::Node(self.id), &label, style);
    }

    fn send(&self, ctx: &mut NodeContext<'_>, to: NodeId, kind: ActionKind) {
        tracing::debug!("[{}] sending {} to {}", self.id, kind.action_type(), to);
        ctx.outbox.push(NodeAction::new(self.id, to, kind));
    }

    fn probe(&mut self, ctx: &mut NodeContext<'_>) {
        for target in self.select_probe_targets(ctx) {
            self.send(ctx, target, ActionKind::Ping { on_behalf_of: None });
            self.expect(
                ExpectationKind::ReceiveAck,
                target,
                ctx.tick + ctx.config.ping_timeout(),
            );
        }
    }

    fn select_probe_targets(&mut self, ctx: &mut NodeContext<'_>) -> Vec<NodeId> {
        match ctx.settings.ping_approach() {
            PingApproach::All => self.known_peers.iter().copied().collect(),
            PingApproach::Random => self
                .known_peers
                .iter()
                .copied()
                .choose(&mut *ctx.rng)
                .into_iter()
                .collect(),
            PingApproach::RoundRobin => self
                .next_round_robin_target(&mut *ctx.rng)
                .into_iter()
                .collect(),
        }
    }

    /// Walks a shuffled snapshot of the known peers, reshuffling once it is exhausted.
    fn next_round_robin_target(&mut self, rng: &mut dyn RngCore) -> Option<NodeId> {
        if self.known_peers.is_empty() {
            return None;
        }

        loop {
            if self.round_robin_cursor >= self.round_robin.len() {
                self.round_robin = self.known_peers.iter().copied().collect();
                self.round_robin.shuffle(rng);
                self.round_robin_cursor = 0;
            }

            let candidate = self.round_robin[self.round_robin_cursor];
            self.round_robin_cursor += 1;

            if self.known_peers.contains(&candidate) {
                return Some(candidate);
            }
        }
    }

    /// Registers an expectation unless an equivalent one is already pending.
    ///
    /// A pending `receive_ack_or_death` also covers a new `receive_ack` for the
    /// same target.
    fn expect(&mut self, kind: ExpectationKind, target: NodeId, deadline: Tick) -> bool {
        let is_covered = self.expectations.iter().any(|e| {
            e.target == target
                && (e.kind == kind
                    || (kind == ExpectationKind::ReceiveAck
                        && e.kind == ExpectationKind::ReceiveAckOrDeath))
        });

        if is_covered {
            return false;
        }

        self.expectations
            .push(Expectation::new(kind, target, deadline));
        true
    }

    fn clear_expectations(&mut self, target: NodeId, kinds: &[ExpectationKind]) {
        self.expectations
            .retain(|e| !(e.target == target && kinds.contains(&e.kind)));
    }

    fn check_expectations(&mut self, ctx: &mut NodeContext<'_>) {
        let (broken, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.expectations)
            .into_iter()
            .partition(|e| e.is_broken(ctx.tick));
        self.expectations = pending;

        for expectation in broken {
            if !self.known_peers.contains(&expectation.target) {
                continue;
            }

            match expectation.kind {
                ExpectationKind::ReceiveAck => self.on_missing_ack(expectation.target, ctx),
                ExpectationKind::ReceiveAckOrDeath => {
                    self.on_unreachable(expectation.target, ctx)
                }
                ExpectationKind::ClearSuspicion => {
                    self.on_unrefuted_suspicion(expectation.target, ctx)
                }
            }
        }
    }

    /// A direct probe timed out: ask a few other peers to probe the target.
    fn on_missing_ack(&mut self, target: NodeId, ctx: &mut NodeContext<'_>) {
        let helpers = self
            .known_peers
            .iter()
            .copied()
            .filter(|peer| *peer != target)
            .choose_multiple(&mut *ctx.rng, ctx.config.ping_req_group_size());

        tracing::debug!(
            "[{}] no ACK from {}, asking {:?} to probe it",
            self.id,
            target,
            helpers
        );

        for helper in helpers {
            self.send(ctx, helper, ActionKind::PingReq { target });
        }

        self.expect(
            ExpectationKind::ReceiveAckOrDeath,
            target,
            ctx.tick + ctx.config.ping_req_timeout(),
        );
    }

    /// Direct and indirect probes timed out.
    fn on_unreachable(&mut self, target: NodeId, ctx: &mut NodeContext<'_>) {
        match ctx.settings.dissemination_approach() {
            DisseminationApproach::Multicast => {
                if self.forget_peer(target) {
                    tracing::info!("[{}] declaring {} as deceased", self.id, target);
                    ctx.events.push(Event::NodeDeceased {
                        by: self.id,
                        deceased: target,
                    });
                }

                for peer in self.known_peers.clone() {
                    self.send(ctx, peer, ActionKind::MulticastDeath { subject: target });
                }
            }
            DisseminationApproach::Gossip | DisseminationApproach::GossipWithSuspicion => {
                let incarnation = self.incarnation_of(target);
                self.suspect_peer(target, incarnation, ctx);
                self.rumor_mill
                    .add_rumor(Rumor::suspect(target, incarnation, self.id));
            }
        }
    }

    fn on_unrefuted_suspicion(&mut self, target: NodeId, ctx: &mut NodeContext<'_>) {
        if !self.suspected_peers.contains(&target) {
            return;
        }

        let rumor = Rumor::dead(target, self.incarnation_of(target), self.id);
        self.rumor_mill.add_rumor(rumor);
        self.handle_dead(&rumor, ctx);
    }

    fn handle_ping(
        &mut self,
        from: NodeId,
        on_behalf_of: Option<NodeId>,
        ctx: &mut NodeContext<'_>,
    ) {
        self.accept_peer(from, ctx);
        self.send(
            ctx,
            from,
            ActionKind::Ack {
                on_behalf_of,
                original_from: None,
            },
        );
    }

    fn handle_ack(
        &mut self,
        from: NodeId,
        on_behalf_of: Option<NodeId>,
        original_from: Option<NodeId>,
        ctx: &mut NodeContext<'_>,
    ) {
        self.accept_peer(from, ctx);

        match on_behalf_of {
            Some(requester) if requester != self.id => {
                self.send(
                    ctx,
                    requester,
                    ActionKind::Ack {
                        on_behalf_of: None,
                        original_from: Some(from),
                    },
                );
            }
            _ => {
                let peer = original_from.unwrap_or(from);
                self.clear_expectations(
                    peer,
                    &[
                        ExpectationKind::ReceiveAck,
                        ExpectationKind::ReceiveAckOrDeath,
                    ],
                );
                if peer != self.id {
                    self.accept_peer(peer, ctx);
                }
            }
        }
    }

    fn handle_ping_req(
        &mut self,
        from: NodeId,
        target: NodeId,
        ctx: &mut NodeContext<'_>,
    ) -> Result<()> {
        if target == self.id || target == from {
            return Err(Error::MalformedPayload {
                message: format!(
                    "[{}] PING_REQ from {} names {} as target",
                    self.id, from, target
                ),
                location: snafu::location!(),
            });
        }

        self.accept_peer(from, ctx);
        self.send(
            ctx,
            target,
            ActionKind::Ping {
                on_behalf_of: Some(from),
            },
        );

        Ok(())
    }

    fn handle_join(&mut self, from: NodeId, ctx: &mut NodeContext<'_>) {
        self.accept_peer(from, ctx);

        let others: Vec<NodeId> = self
            .known_peers
            .iter()
            .copied()
            .filter(|peer| *peer != from)
            .collect();

        for peer in &others {
            self.send(ctx, from, ActionKind::MulticastJoin { subject: *peer });
        }

        if ctx.settings.dissemination_approach() == DisseminationApproach::Multicast {
            for peer in &others {
                self.send(ctx, *peer, ActionKind::MulticastJoin { subject: from });
            }
        } else {
            self.rumor_mill
                .add_rumor(Rumor::alive(from, self.incarnation_of(from), self.id));
        }
    }

    fn handle_multicast_leave(&mut self, subject: NodeId) {
        if subject == self.id {
            tracing::debug!("[{}] ignoring a leave notice about itself", self.id);
            return;
        }

        if self.forget_peer(subject) {
            tracing::info!("[{}] {} has left", self.id, subject);
        }
    }

    fn handle_multicast_death(&mut self, subject: NodeId, ctx: &mut NodeContext<'_>) {
        if subject == self.id {
            self.confirm_own_death(ctx);
        } else if self.forget_peer(subject) {
            tracing::info!("[{}] {} was declared deceased", self.id, subject);
            ctx.events.push(Event::NodeDeceased {
                by: self.id,
                deceased: subject,
            });
        }
    }

    fn heed_rumors(&mut self, ctx: &mut NodeContext<'_>) {
        for rumor in self.rumor_mill.heed_rumors() {
            match rumor.kind {
                RumorType::Alive => self.handle_alive(&rumor, ctx),
                RumorType::Suspect => self.handle_suspect(&rumor, ctx),
                RumorType::Dead => self.handle_dead(&rumor, ctx),
            }
        }
    }

    fn handle_alive(&mut self, rumor: &Rumor, ctx: &mut NodeContext<'_>) {
        if rumor.subject == self.id {
            return;
        }

        if let Some(&known) = self.incarnations.get(&rumor.subject) {
            let is_suspected = self.suspected_peers.contains(&rumor.subject);
            if rumor.incarnation < known || (is_suspected && rumor.incarnation == known) {
                return;
            }
        }

        self.incarnations.insert(rumor.subject, rumor.incarnation);
        self.accept_peer(rumor.subject, ctx);
    }

    fn handle_suspect(&mut self, rumor: &Rumor, ctx: &mut NodeContext<'_>) {
        if rumor.subject == self.id {
            self.refute(rumor);
            return;
        }

        if rumor.incarnation < self.incarnation_of(rumor.subject) {
            return;
        }

        self.suspect_peer(rumor.subject, rumor.incarnation, ctx);
    }

    fn handle_dead(&mut self, rumor: &Rumor, ctx: &mut NodeContext<'_>) {
        if rumor.subject == self.id {
            self.confirm_own_death(ctx);
            return;
        }

        if self.forget_peer(rumor.subject) {
            tracing::info!(
                "[{}] {} is dead according to {}",
                self.id,
                rumor.subject,
                rumor.originator
            );
            ctx.events.push(Event::NodeDeceased {
                by: self.id,
                deceased: rumor.subject,
            });
        }
    }

    /// Outranks a suspicion about this node with a fresh alive rumor.
    fn refute(&mut self, rumor: &Rumor) {
        if rumor.incarnation >= self.incarnation {
            self.incarnation = rumor.incarnation + 1;
        }

        tracing::info!(
            "[{}] refuting suspicion by {} with incarnation {}",
            self.id,
            rumor.originator,
            self.incarnation
        );
        self.rumor_mill
            .add_rumor(Rumor::alive(self.id, self.incarnation, self.id));
    }

    fn confirm_own_death(&mut self, ctx: &mut NodeContext<'_>) {
        if self.has_heard_of_own_death {
            return;
        }

        tracing::warn!("[{}] heard of its own death, shutting down", self.id);
        self.has_heard_of_own_death = true;
        self.expectations.clear();
        ctx.events.push(Event::NodeConfirmedDead { node: self.id });
    }

    /// Direct evidence that `peer` is alive.
    fn accept_peer(&mut self, peer: NodeId, ctx: &mut NodeContext<'_>) {
        if peer == self.id {
            return;
        }

        if self.known_peers.insert(peer) {
            tracing::info!("[{}] added {} to its known peers", self.id, peer);
        }

        if self.suspected_peers.remove(&peer) {
            tracing::info!("[{}] no longer suspects {}", self.id, peer);
            ctx.events.push(Event::NodeRecovered {
                by: self.id,
                recovered: peer,
                incarnation: self.incarnation_of(peer),
            });
        }

        self.clear_expectations(peer, &[ExpectationKind::ClearSuspicion]);
    }

    fn suspect_peer(&mut self, peer: NodeId, incarnation: u64, ctx: &mut NodeContext<'_>) {
        if peer == self.id {
            return;
        }

        self.known_peers.insert(peer);
        let recorded = self.incarnations.entry(peer).or_default();
        *recorded = (*recorded).max(incarnation);

        if self.suspected_peers.insert(peer) {
            tracing::info!("[{}] suspects {} at incarnation {}", self.id, peer, incarnation);
            ctx.events.push(Event::NodeSuspected {
                by: self.id,
                suspect: peer,
                incarnation,
            });
        }

        if ctx.settings.dissemination_approach() == DisseminationApproach::GossipWithSuspicion {
            self.expect(
                ExpectationKind::ClearSuspicion,
                peer,
                ctx.tick + ctx.config.suspect_timeout(),
            );
        }
    }

    /// Removes every trace of `peer`. Returns whether it was known.
    fn forget_peer(&mut self, peer: NodeId) -> bool {
        let was_known = self.known_peers.remove(&peer);
        self.suspected_peers.remove(&peer);
        self.incarnations.remove(&peer);
        self.expectations.retain(|e| e.target != peer);
        was_known
    }
}
