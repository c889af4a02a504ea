use std::time::Duration;

/// Default number of ticks an action spends in transit.
const DEFAULT_NETWORK_LATENCY: u64 = 30;

/// Default number of ticks between each probe round of a node.
const DEFAULT_PING_INTERVAL: u64 = 100;

/// Default number of ticks to wait for an ACK after a direct PING.
/// Must exceed one round trip (twice the network latency).
const DEFAULT_PING_TIMEOUT: u64 = 90;

/// Default number of ticks to wait for a relayed ACK after sending PING-REQs.
/// Must exceed two round trips.
const DEFAULT_PING_REQ_TIMEOUT: u64 = 180;

/// Default number of ticks a suspicion may stay unrefuted before the suspect is declared dead.
const DEFAULT_SUSPECT_TIMEOUT: u64 = 300;

/// Default number of ticks between two checks of a node's expectations.
const DEFAULT_EXPECTATION_CHECK_INTERVAL: u64 = 10;

/// Default number of nodes asked to probe a suspect on a node's behalf.
const DEFAULT_PING_REQ_GROUP_SIZE: usize = 2;

/// Default number of rumors piggybacked on a single action.
const DEFAULT_MAX_GOSSIP_PER_ACTION: usize = 6;

/// Default capacity of a node's rumor buffer.
const DEFAULT_GOSSIP_BUFFER_SIZE: usize = 30;

/// Default number of times a rumor is shared before it is forgotten.
/// Should be `n * log(x)` for a cluster of size `x`; the simulated clusters are small.
const DEFAULT_MAX_SHARES: u32 = 8;

/// Default wall-clock time between two ticks at simulation speed 1.
const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Shortest wall-clock tick the runner accepts.
const MIN_TICK_INTERVAL: Duration = Duration::from_micros(1);

/// Builder for creating a [`SwimConfig`] with customized protocol timing.
/// Every interval and timeout is measured in ticks.
#[derive(Clone, Debug)]
pub struct SwimConfigBuilder {
    /// The number of ticks an action spends in transit.
    network_latency: u64,
    /// The number of ticks between consecutive probe rounds.
    ping_interval: u64,
    /// The number of ticks to wait for an ACK after sending a PING.
    ping_timeout: u64,
    /// The number of ticks to wait for an ACK after sending PING-REQs.
    ping_req_timeout: u64,
    /// The number of ticks a suspicion stays unrefuted before escalating.
    suspect_timeout: u64,
    /// The number of ticks between expectation checks.
    expectation_check_interval: u64,
    /// The number of other nodes asked to perform a PING-REQ.
    ping_req_group_size: usize,
    /// The maximum number of rumors piggybacked on an action.
    max_gossip_per_action: usize,
    /// The capacity of each node's rumor buffer.
    gossip_buffer_size: usize,
    /// The number of times a rumor is shared before it is forgotten.
    max_shares: u32,
    /// The wall-clock duration of one tick at speed 1.
    tick_interval: Duration,
}

impl SwimConfigBuilder {
    /// Creates a new [`SwimConfigBuilder`] with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the builder and returns a fully constructed [`SwimConfig`].
    pub fn build(self) -> SwimConfig {
        SwimConfig {
            network_latency: self.network_latency.max(1),
            ping_interval: self.ping_interval.max(1),
            ping_timeout: self.ping_timeout,
            ping_req_timeout: self.ping_req_timeout,
            suspect_timeout: self.suspect_timeout,
            expectation_check_interval: self.expectation_check_interval.max(1),
            ping_req_group_size: self.ping_req_group_size,
            max_gossip_per_action: self.max_gossip_per_action,
            gossip_buffer_size: self.gossip_buffer_size.max(1),
            max_shares: self.max_shares.max(1),
            tick_interval: self.tick_interval.max(MIN_TICK_INTERVAL),
        }
    }

    /// Sets the number of ticks an action spends in transit.
    pub fn with_network_latency(mut self, network_latency: u64) -> Self {
        self.network_latency = network_latency;
        self
    }

    /// Sets the interval between each probe round of a node.
    pub fn with_ping_interval(mut self, ping_interval: u64) -> Self {
        self.ping_interval = ping_interval;
        self
    }

    /// Sets the timeout for awaiting an ACK to a PING message.
    pub fn with_ping_timeout(mut self, ping_timeout: u64) -> Self {
        self.ping_timeout = ping_timeout;
        self
    }

    /// Sets the timeout for awaiting an ACK to a PING-REQ message.
    pub fn with_ping_req_timeout(mut self, ping_req_timeout: u64) -> Self {
        self.ping_req_timeout = ping_req_timeout;
        self
    }

    /// Sets the time a suspicion may stay unrefuted.
    pub fn with_suspect_timeout(mut self, suspect_timeout: u64) -> Self {
        self.suspect_timeout = suspect_timeout;
        self
    }

    /// Sets the interval between expectation checks.
    pub fn with_expectation_check_interval(mut self, expectation_check_interval: u64) -> Self {
        self.expectation_check_interval = expectation_check_interval;
        self
    }

    /// Sets the number of nodes involved in a PING-REQ operation when a node is unresponsive.
    pub fn with_ping_req_group_size(mut self, ping_req_group_size: usize) -> Self {
        self.ping_req_group_size = ping_req_group_size;
        self
    }

    /// Sets the maximum number of rumors piggybacked on an action.
    pub fn with_max_gossip_per_action(mut self, max_gossip_per_action: usize) -> Self {
        self.max_gossip_per_action = max_gossip_per_action;
        self
    }

    /// Sets the capacity of each node's rumor buffer.
    pub fn with_gossip_buffer_size(mut self, gossip_buffer_size: usize) -> Self {
        self.gossip_buffer_size = gossip_buffer_size;
        self
    }

    /// Sets the number of times a rumor is shared before it is forgotten.
    pub fn with_max_shares(mut self, max_shares: u32) -> Self {
        self.max_shares = max_shares;
        self
    }

    /// Sets the wall-clock duration of one tick at speed 1.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }
}

impl Default for SwimConfigBuilder {
    fn default() -> Self {
        Self {
            network_latency: DEFAULT_NETWORK_LATENCY,
            ping_interval: DEFAULT_PING_INTERVAL,
            ping_timeout: DEFAULT_PING_TIMEOUT,
            ping_req_timeout: DEFAULT_PING_REQ_TIMEOUT,
            suspect_timeout: DEFAULT_SUSPECT_TIMEOUT,
            expectation_check_interval: DEFAULT_EXPECTATION_CHECK_INTERVAL,
            ping_req_group_size: DEFAULT_PING_REQ_GROUP_SIZE,
            max_gossip_per_action: DEFAULT_MAX_GOSSIP_PER_ACTION,
            gossip_buffer_size: DEFAULT_GOSSIP_BUFFER_SIZE,
            max_shares: DEFAULT_MAX_SHARES,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Protocol timing and gossip limits shared by every node of a simulation.
#[derive(Clone, Debug)]
pub struct SwimConfig {
    network_latency: u64,
    ping_interval: u64,
    ping_timeout: u64,
    ping_req_timeout: u64,
    suspect_timeout: u64,
    expectation_check_interval: u64,
    ping_req_group_size: usize,
    max_gossip_per_action: usize,
    gossip_buffer_size: usize,
    max_shares: u32,
    tick_interval: Duration,
}

impl SwimConfig {
    /// Creates a new [`SwimConfig`] with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new [`SwimConfigBuilder`] to construct a [`SwimConfig`].
    pub fn builder() -> SwimConfigBuilder {
        SwimConfigBuilder::new()
    }

    pub fn network_latency(&self) -> u64 {
        self.network_latency
    }

    pub fn ping_interval(&self) -> u64 {
        self.ping_interval
    }

    pub fn ping_timeout(&self) -> u64 {
        self.ping_timeout
    }

    pub fn ping_req_timeout(&self) -> u64 {
        self.ping_req_timeout
    }

    pub fn suspect_timeout(&self) -> u64 {
        self.suspect_timeout
    }

    pub fn expectation_check_interval(&self) -> u64 {
        self.expectation_check_interval
    }

    pub fn ping_req_group_size(&self) -> usize {
        self.ping_req_group_size
    }

    pub fn max_gossip_per_action(&self) -> usize {
        self.max_gossip_per_action
    }

    pub fn gossip_buffer_size(&self) -> usize {
        self.gossip_buffer_size
    }

    pub fn max_shares(&self) -> u32 {
        self.max_shares
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

impl Default for SwimConfig {
    fn default() -> Self {
        SwimConfigBuilder::new().build()
    }
}
