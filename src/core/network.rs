use std::collections::BTreeMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, RngCore, SeedableRng};
use tokio::sync::broadcast::{self, Receiver, Sender};

use crate::api::config::SwimConfig;
use crate::error::Result;

use super::action::{Action, NodeAction};
use super::config::{ConfigChanged, NetworkConfig};
use super::event::Event;
use super::node::{NodeContext, SwimNode};
use super::partition::{Partition, PositionSource, StaticPositions};
use super::render::{EdgeStyle, ElementId, NoopRenderSink, RenderSink};
use super::types::{
    ActionId, ActionType, DisseminationApproach, NodeId, OverlayMode, PartitionId, PingApproach,
    Tick,
};

/// Capacity of the membership event channel.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Builder for a [`Network`] with a custom random source, render sink or layout.
pub struct NetworkBuilder {
    config: SwimConfig,
    settings: NetworkConfig,
    rng: Option<Box<dyn RngCore + Send>>,
    render_sink: Box<dyn RenderSink + Send>,
    position_source: Box<dyn PositionSource + Send>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> Network {
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(StdRng::from_entropy()));
        let (events, _) = broadcast::channel::<Event>(EVENT_CHANNEL_CAPACITY);

        Network {
            config: self.config,
            settings: self.settings,
            nodes: BTreeMap::new(),
            partitions: BTreeMap::new(),
            in_flight: Vec::new(),
            current_tick: 0,
            last_action_id: 0,
            rng,
            render_sink: self.render_sink,
            position_source: self.position_source,
            events,
        }
    }

    pub fn with_config(mut self, config: SwimConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_settings(mut self, settings: NetworkConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Makes the simulation reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Some(Box::new(StdRng::seed_from_u64(seed)));
        self
    }

    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn with_render_sink(mut self, render_sink: impl RenderSink + Send + 'static) -> Self {
        self.render_sink = Box::new(render_sink);
        self
    }

    pub fn with_position_source(
        mut self,
        position_source: impl PositionSource + Send + 'static,
    ) -> Self {
        self.position_source = Box::new(position_source);
        self
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self {
            config: SwimConfig::default(),
            settings: NetworkConfig::default(),
            rng: None,
            render_sink: Box::new(NoopRenderSink),
            position_source: Box::new(StaticPositions::new()),
        }
    }
}

/// The simulated network: owns every node, the actions in transit and the
/// partitions, and advances them one tick at a time.
///
/// Nodes never reach each other directly. Every action they emit is dispatched
/// through [`Network::dispatch_action`] and delivered once its completion tick is
/// reached, unless it got lost on the way.
pub struct Network {
    config: SwimConfig,
    settings: NetworkConfig,
    nodes: BTreeMap<NodeId, SwimNode>,
    partitions: BTreeMap<PartitionId, Partition>,
    in_flight: Vec<Action>,
    current_tick: Tick,
    last_action_id: ActionId,
    rng: Box<dyn RngCore + Send>,
    render_sink: Box<dyn RenderSink + Send>,
    position_source: Box<dyn PositionSource + Send>,
    events: Sender<Event>,
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("config", &self.config)
            .field("settings", &self.settings)
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("partitions", &self.partitions)
            .field("in_flight", &self.in_flight.len())
            .field("current_tick", &self.current_tick)
            .finish_non_exhaustive()
    }
}

impl Default for Network {
    fn default() -> Self {
        NetworkBuilder::new().build()
    }
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::new()
    }

    pub fn config(&self) -> &SwimConfig {
        &self.config
    }

    pub fn settings(&self) -> &NetworkConfig {
        &self.settings
    }

    pub fn get_current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn get_node(&self, id: NodeId) -> Option<&SwimNode> {
        self.nodes.get(&id)
    }

    pub fn get_all_node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn get_partition(&self, id: PartitionId) -> Option<&Partition> {
        self.partitions.get(&id)
    }

    /// Direct access to a partition; use [`Network::set_partition_active`] to
    /// have the change rendered.
    pub fn get_partition_mut(&mut self, id: PartitionId) -> Option<&mut Partition> {
        self.partitions.get_mut(&id)
    }

    pub fn in_flight_actions(&self) -> &[Action] {
        &self.in_flight
    }

    pub fn subscribe(&self) -> Receiver<Event> {
        self.events.subscribe()
    }

    pub(crate) fn event_sender(&self) -> Sender<Event> {
        self.events.clone()
    }

    /// Registers a node that joins through a random active node, if there is one.
    ///
    /// An already registered id is returned as is.
    pub fn add_node(&mut self, id: NodeId) -> &SwimNode {
        if !self.nodes.contains_key(&id) {
            let introducer = self
                .nodes
                .values()
                .filter(|node| !node.is_disabled())
                .map(SwimNode::id)
                .choose(&mut *self.rng);
            self.register_node(id, introducer);
        }

        &self.nodes[&id]
    }

    /// Registers a node that joins through `introducer`.
    ///
    /// An unknown or disabled introducer is ignored and the node starts alone.
    pub fn add_node_with_introducer(&mut self, id: NodeId, introducer: NodeId) -> &SwimNode {
        if !self.nodes.contains_key(&id) {
            let is_available = introducer != id
                && self
                    .nodes
                    .get(&introducer)
                    .is_some_and(|node| !node.is_disabled());

            if !is_available {
                tracing::warn!("[{}] introducer {} is not available", id, introducer);
            }

            self.register_node(id, is_available.then_some(introducer));
        }

        &self.nodes[&id]
    }

    /// Lets a node leave voluntarily and deregisters it.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }

        self.with_node(id, |node, ctx| node.leave_network(ctx));
        self.deregister_node(id);
        self.publish(Event::NodeLeft { node: id });
        true
    }

    /// Crashes or revives a node. Returns `false` for unknown ids and unchanged flags.
    pub fn set_node_faulty(&mut self, id: NodeId, faulty: bool) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };

        if !node.set_faulty(faulty) {
            return false;
        }

        tracing::info!("[{}] faulty: {}", id, faulty);
        self.render_node(id);
        true
    }

    /// Puts an action on the wire and returns its id.
    pub fn dispatch_action(&mut self, node_action: NodeAction) -> ActionId {
        self.last_action_id += 1;
        let mut action = Action::new(
            self.last_action_id,
            node_action.from,
            node_action.to,
            node_action.kind,
            self.current_tick + self.config.network_latency(),
        );

        if let Some(sender) = self.nodes.get_mut(&action.from()) {
            sender.spread_gossip(&mut action, &self.settings);
        }

        let positions = &*self.position_source;
        let crosses_partition = self
            .partitions
            .values()
            .any(|partition| partition.action_intersects_with_partition(&action, positions));

        if crosses_partition || self.rng.gen_bool(self.settings.packet_loss()) {
            tracing::debug!(
                "[{}] {} to {} is lost",
                action.from(),
                action.action_type(),
                action.to()
            );
            action.mark_lost();
        }

        render_action(&mut *self.render_sink, &self.settings, &action);
        let id = action.id();
        self.in_flight.push(action);
        id
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self) {
        self.current_tick += 1;

        for id in self.get_all_node_ids() {
            let is_active = self
                .nodes
                .get(&id)
                .is_some_and(|node| !node.is_disabled());

            if is_active {
                self.with_node(id, |node, ctx| node.tick(ctx));
            }
        }

        let tick = self.current_tick;
        let (done, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.in_flight)
            .into_iter()
            .partition(|action| action.is_done(tick));
        self.in_flight = pending;

        for action in done {
            self.render_sink.remove_edge(ElementId::Action(action.id()));

            if action.is_deliverable() {
                self.deliver(&action);
            } else {
                tracing::debug!(
                    "[{}] dropping lost {} from {}",
                    action.to(),
                    action.action_type(),
                    action.from()
                );
            }
        }

        let confirmed_dead: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.has_heard_of_own_death())
            .map(SwimNode::id)
            .collect();

        for id in confirmed_dead {
            tracing::info!("[{}] deregistering confirmed dead node", id);
            self.deregister_node(id);
        }
    }

    /// Registers an inactive partition; an existing one is returned as is.
    pub fn add_partition(&mut self, id: PartitionId) -> &Partition {
        if !self.partitions.contains_key(&id) {
            let partition = Partition::new(id);
            partition.render(&mut *self.render_sink);
            self.partitions.insert(id, partition);
        }

        &self.partitions[&id]
    }

    pub fn remove_partition(&mut self, id: PartitionId) -> Option<Partition> {
        let partition = self.partitions.remove(&id)?;
        partition.remove(&mut *self.render_sink);
        Some(partition)
    }

    /// Returns `true` if the partition exists and its state changed.
    pub fn set_partition_active(&mut self, id: PartitionId, active: bool) -> bool {
        let Some(partition) = self.partitions.get_mut(&id) else {
            return false;
        };

        if !partition.set_active(active) {
            return false;
        }

        tracing::info!("[partition {}] active: {}", id, active);
        partition.render(&mut *self.render_sink);
        true
    }

    pub fn set_ping_approach(&mut self, ping_approach: PingApproach) {
        let change = self.settings.set_ping_approach(ping_approach);
        self.on_config_changed(change);
    }

    pub fn set_dissemination_approach(&mut self, dissemination_approach: DisseminationApproach) {
        let change = self
            .settings
            .set_dissemination_approach(dissemination_approach);
        self.on_config_changed(change);
    }

    pub fn set_packet_loss(&mut self, packet_loss: f64) -> Result<()> {
        let change = self.settings.set_packet_loss(packet_loss)?;
        self.on_config_changed(change);
        Ok(())
    }

    pub fn set_simulation_speed(&mut self, simulation_speed: f64) -> Result<()> {
        let change = self.settings.set_simulation_speed(simulation_speed)?;
        self.on_config_changed(change);
        Ok(())
    }

    pub fn add_event_filter(&mut self, action_type: ActionType) {
        let change = self.settings.add_event_filter(action_type);
        self.on_config_changed(change);
    }

    pub fn remove_event_filter(&mut self, action_type: ActionType) {
        let change = self.settings.remove_event_filter(action_type);
        self.on_config_changed(change);
    }

    pub fn clear_event_filter(&mut self) {
        let change = self.settings.clear_event_filter();
        self.on_config_changed(change);
    }

    pub fn set_overlay_mode(&mut self, overlay_mode: OverlayMode) {
        let change = self.settings.set_overlay_mode(overlay_mode);
        self.on_config_changed(change);
    }

    pub fn set_physics_enabled(&mut self, physics_enabled: bool) {
        let change = self.settings.set_physics_enabled(physics_enabled);
        self.on_config_changed(change);
    }

    fn on_config_changed(&mut self, change: Option<ConfigChanged>) {
        let Some(change) = change else {
            return;
        };

        tracing::debug!("[network] {:?} changed", change);

        match change {
            ConfigChanged::PingApproach => {
                for node in self.nodes.values_mut() {
                    node.reset_round_robin();
                }
            }
            ConfigChanged::DisseminationApproach => {
                for node in self.nodes.values_mut() {
                    node.reset_dissemination_state();
                }
            }
            ConfigChanged::EventFilter => {
                for action in &self.in_flight {
                    render_action(&mut *self.render_sink, &self.settings, action);
                }
            }
            ConfigChanged::OverlayMode => {
                for id in self.get_all_node_ids() {
                    self.render_node(id);
                }
            }
            ConfigChanged::PacketLoss
            | ConfigChanged::SimulationSpeed
            | ConfigChanged::Physics => {}
        }
    }

    fn register_node(&mut self, id: NodeId, introducer: Option<NodeId>) {
        let node = SwimNode::new(id, format!("Node id {id}"), &self.config, &mut *self.rng);
        self.nodes.insert(id, node);

        tracing::info!("[{}] registered, introducer: {:?}", id, introducer);
        self.publish(Event::NodeJoined {
            node: id,
            introducer,
        });

        match introducer {
            Some(introducer) => {
                self.with_node(id, |node, ctx| node.join_network(introducer, ctx));
            }
            None => self.render_node(id),
        }
    }

    fn deregister_node(&mut self, id: NodeId) {
        if self.nodes.remove(&id).is_some() {
            self.render_sink.remove_node(ElementId::Node(id));
        }
    }

    fn deliver(&mut self, action: &Action) {
        let outcome = self.with_node(action.to(), |node, ctx| node.receive_action(action, ctx));

        match outcome {
            Some(Ok(())) => {}
            Some(Err(e)) => tracing::warn!("[{}] {e}", action.to()),
            None => tracing::debug!(
                "[network] {} for unknown node {} dropped",
                action.action_type(),
                action.to()
            ),
        }
    }

    /// Runs `f` against node `id`, then dispatches what it sent and publishes what it observed.
    fn with_node<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut SwimNode, &mut NodeContext<'_>) -> R,
    ) -> Option<R> {
        let mut outbox = Vec::new();
        let mut events = Vec::new();

        let node = self.nodes.get_mut(&id)?;
        let mut ctx = NodeContext {
            tick: self.current_tick,
            config: &self.config,
            settings: &self.settings,
            rng: &mut *self.rng,
            outbox: &mut outbox,
            events: &mut events,
        };
        let result = f(node, &mut ctx);

        for node_action in outbox {
            self.dispatch_action(node_action);
        }
        for event in events {
            self.publish(event);
        }
        self.render_node(id);

        Some(result)
    }

    fn render_node(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get(&id) {
            node.render(&mut *self.render_sink, self.settings.overlay_mode());
        }
    }

    fn publish(&self, event: Event) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}

fn render_action(sink: &mut dyn RenderSink, settings: &NetworkConfig, action: &Action) {
    let id = ElementId::Action(action.id());

    if settings.is_filtered(action.action_type()) {
        sink.remove_edge(id);
        return;
    }

    sink.upsert_edge(
        id,
        ElementId::Node(action.from()),
        ElementId::Node(action.to()),
        action.action_type().as_str(),
        EdgeStyle::Action {
            action_type: action.action_type(),
            lost: action.is_lost(),
        },
    );
}

#[cfg(test)]
mod tests {
    use crate::api::config::SwimConfig;
    use crate::core::action::{ActionKind, NodeAction};
    use crate::core::event::Event;
    use crate::core::partition::{Position, StaticPositions};
    use crate::core::render::{EdgeStyle, ElementId, NodeStyle};
    use crate::core::types::{ActionType, DisseminationApproach, OverlayMode};
    use crate::test_utils::mocks::{MockRenderSink, RenderCommand};

    use super::Network;

    fn create_network(sink: &MockRenderSink) -> Network {
        Network::builder()
            .with_seed(42)
            .with_render_sink(sink.clone())
            .build()
    }

    fn ping(from: u64, to: u64) -> NodeAction {
        NodeAction::new(from, to, ActionKind::Ping { on_behalf_of: None })
    }

    #[test]
    fn test_network_add_node_is_idempotent() {
        let mut network = Network::builder().with_seed(1).build();
        let mut rx = network.subscribe();

        network.add_node(1);
        network.add_node(1);

        assert_eq!(network.get_all_node_ids(), vec![1]);
        assert!(network.in_flight_actions().is_empty());
        assert_eq!(
            rx.try_recv().unwrap(),
            Event::NodeJoined {
                node: 1,
                introducer: None
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_network_add_node_joins_through_introducer() {
        let mut network = Network::builder().with_seed(1).build();

        network.add_node(1);
        let node = network.add_node(2);
        assert_eq!(node.known_peers().iter().copied().collect::<Vec<_>>(), vec![1]);

        let in_flight = network.in_flight_actions();
        assert_eq!(in_flight.len(), 1);
        assert_eq!(in_flight[0].from(), 2);
        assert_eq!(in_flight[0].to(), 1);
        assert_eq!(in_flight[0].action_type(), ActionType::Join);
        assert_eq!(in_flight[0].completion_tick(), 30);
    }

    #[test]
    fn test_network_unavailable_introducer_is_ignored() {
        let mut network = Network::builder().with_seed(1).build();
        network.add_node(1);
        network.set_node_faulty(1, true);

        let node = network.add_node_with_introducer(2, 1);
        assert!(node.known_peers().is_empty());

        let node = network.add_node_with_introducer(3, 9);
        assert!(node.known_peers().is_empty());
        assert!(network.in_flight_actions().is_empty());
    }

    #[test]
    fn test_network_dispatch_assigns_ids_and_completion_ticks() {
        let sink = MockRenderSink::new();
        let mut network = create_network(&sink);

        let first = network.dispatch_action(ping(1, 2));
        network.tick();
        let second = network.dispatch_action(ping(2, 1));

        assert!(second > first);
        let in_flight = network.in_flight_actions();
        assert_eq!(in_flight[0].completion_tick(), 30);
        assert_eq!(in_flight[1].completion_tick(), 31);
        assert_eq!(
            sink.edges()[&ElementId::Action(first)],
            EdgeStyle::Action {
                action_type: ActionType::Ping,
                lost: false
            }
        );
    }

    #[test]
    fn test_network_same_tick_actions_complete_in_dispatch_order() {
        let sink = MockRenderSink::new();
        let mut network = create_network(&sink);

        let first = network.dispatch_action(ping(1, 2));
        let second = network.dispatch_action(ping(2, 1));
        let third = network.dispatch_action(ping(1, 3));
        for _ in 0..30 {
            network.tick();
        }

        let removed: Vec<_> = sink
            .commands()
            .into_iter()
            .filter_map(|command| match command {
                RenderCommand::RemoveEdge { id } => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(
            removed,
            vec![
                ElementId::Action(first),
                ElementId::Action(second),
                ElementId::Action(third)
            ]
        );
        assert!(network.in_flight_actions().is_empty());
    }

    #[test]
    fn test_network_removing_faulty_node_sends_nothing() {
        let mut network = Network::builder().with_seed(1).build();
        network.set_dissemination_approach(DisseminationApproach::Multicast);
        for id in 1..=3 {
            network.add_node(id);
        }
        for _ in 0..100 {
            network.tick();
        }
        assert!(network.get_node(1).unwrap().known_peers().contains(&3));

        assert!(network.set_node_faulty(3, true));
        let before = network.in_flight_actions().len();
        assert!(network.remove_node(3));

        assert_eq!(network.in_flight_actions().len(), before);
        assert!(network
            .in_flight_actions()
            .iter()
            .all(|action| action.action_type() != ActionType::MulticastLeave));
    }

    #[test]
    fn test_network_delivery_to_unknown_node_is_noop() {
        let mut network = Network::builder().with_seed(1).build();
        network.add_node(1);

        network.dispatch_action(ping(1, 7));
        for _ in 0..30 {
            network.tick();
        }

        assert!(network.in_flight_actions().is_empty());
        assert_eq!(network.get_all_node_ids(), vec![1]);
    }

    #[test]
    fn test_network_full_packet_loss_drops_everything() {
        let sink = MockRenderSink::new();
        let mut network = create_network(&sink);
        network.set_packet_loss(1.0).unwrap();
        network.add_node(1);
        network.add_node(2);

        assert!(network.in_flight_actions().iter().all(|a| a.is_lost()));
        for _ in 0..30 {
            network.tick();
        }

        assert!(network.get_node(1).unwrap().known_peers().is_empty());
        assert!(sink
            .edges()
            .values()
            .all(|style| matches!(style, EdgeStyle::Action { lost: true, .. })));
    }

    #[test]
    fn test_network_event_filter_rerenders_actions() {
        let sink = MockRenderSink::new();
        let mut network = create_network(&sink);
        let id = network.dispatch_action(ping(1, 2));
        assert!(sink.edges().contains_key(&ElementId::Action(id)));

        network.add_event_filter(ActionType::Ping);
        assert!(!sink.edges().contains_key(&ElementId::Action(id)));
        let hidden = network.dispatch_action(ping(2, 1));
        assert!(!sink.edges().contains_key(&ElementId::Action(hidden)));

        network.clear_event_filter();
        assert!(sink.edges().contains_key(&ElementId::Action(id)));
        assert!(sink.edges().contains_key(&ElementId::Action(hidden)));
    }

    #[test]
    fn test_network_overlay_mode_rerenders_labels() {
        let sink = MockRenderSink::new();
        let mut network = create_network(&sink);
        network.add_node(1);
        network.add_node(2);

        assert_eq!(sink.nodes()[&ElementId::Node(1)].0, "Node id 1");

        network.set_overlay_mode(OverlayMode::Incarnation);
        assert_eq!(sink.nodes()[&ElementId::Node(1)].0, "Node id 1 (inc 0)");

        network.set_overlay_mode(OverlayMode::Membership);
        assert_eq!(
            sink.nodes()[&ElementId::Node(2)].0,
            "Node id 2 [1 known, 0 suspected]"
        );
    }

    #[test]
    fn test_network_faulty_and_removed_nodes_are_rendered() {
        let sink = MockRenderSink::new();
        let mut network = create_network(&sink);
        network.add_node(1);
        network.add_node(2);

        assert!(network.set_node_faulty(1, true));
        assert!(!network.set_node_faulty(1, true));
        assert_eq!(sink.nodes()[&ElementId::Node(1)].1, NodeStyle::Faulty);

        let mut rx = network.subscribe();
        assert!(network.remove_node(2));
        assert!(!network.remove_node(2));
        assert!(!sink.nodes().contains_key(&ElementId::Node(2)));
        assert_eq!(rx.try_recv().unwrap(), Event::NodeLeft { node: 2 });
    }

    #[test]
    fn test_network_partition_marks_crossing_actions_lost() {
        let sink = MockRenderSink::new();
        let positions = StaticPositions::new();
        let mut network = Network::builder()
            .with_seed(42)
            .with_render_sink(sink.clone())
            .with_position_source(positions.clone())
            .build();

        let partition = network.add_partition(1).clone();
        positions.set(partition.start_anchor(), Position::new(0.0, -100.0));
        positions.set(partition.end_anchor(), Position::new(0.0, 100.0));
        positions.set(ElementId::Node(1), Position::new(-50.0, 0.0));
        positions.set(ElementId::Node(2), Position::new(50.0, 0.0));

        network.dispatch_action(ping(1, 2));
        assert!(!network.in_flight_actions()[0].is_lost());

        assert!(network.set_partition_active(1, true));
        assert!(!network.set_partition_active(1, true));
        assert_eq!(
            sink.edges()[&ElementId::Partition(1)],
            EdgeStyle::Partition
        );

        network.dispatch_action(ping(1, 2));
        assert!(network.in_flight_actions()[1].is_lost());

        assert!(network.set_partition_active(1, false));
        network.dispatch_action(ping(1, 2));
        assert!(!network.in_flight_actions()[2].is_lost());

        assert!(network.remove_partition(1).is_some());
        assert!(network.get_partition(1).is_none());
        assert!(!sink.edges().contains_key(&ElementId::Partition(1)));
        assert!(!sink.nodes().contains_key(&partition.start_anchor()));
    }

    #[test]
    fn test_network_dissemination_change_resets_nodes() {
        let config = SwimConfig::builder().with_ping_interval(5).build();
        let mut network = Network::builder().with_seed(3).with_config(config).build();
        network.add_node(1);
        network.add_node(2);
        network.add_node(3);

        for _ in 0..20 {
            network.tick();
        }
        assert!(network
            .get_all_node_ids()
            .into_iter()
            .any(|id| !network.get_node(id).unwrap().rumor_mill().rumors().is_empty()));

        network.set_dissemination_approach(DisseminationApproach::Multicast);

        for id in network.get_all_node_ids() {
            let node = network.get_node(id).unwrap();
            assert!(node.expectations().is_empty());
            assert!(node.rumor_mill().rumors().is_empty());
        }
    }
}
