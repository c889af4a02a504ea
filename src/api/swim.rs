use std::sync::Arc;

use tokio::sync::broadcast::{Receiver, Sender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::event::Event;
use crate::core::network::Network;
use crate::init_tracing;

use super::config::SwimConfig;

/// Drives a [`Network`] on a wall-clock cadence.
///
/// Each period of [`SwimConfig::tick_interval`] advances the simulation by the
/// current simulation speed; fractional speeds accumulate across periods and a
/// speed of `0` pauses it. The network stays reachable through
/// [`SwimSimulation::network`] while running.
#[derive(Clone, Debug)]
pub struct SwimSimulation {
    network: Arc<Mutex<Network>>,
    config: SwimConfig,
    events: Sender<Event>,
}

impl SwimSimulation {
    pub fn new(network: Network) -> Self {
        let config = network.config().clone();
        let events = network.event_sender();

        Self {
            network: Arc::new(Mutex::new(network)),
            config,
            events,
        }
    }

    pub fn config(&self) -> &SwimConfig {
        &self.config
    }

    pub fn subscribe(&self) -> Receiver<Event> {
        self.events.subscribe()
    }

    pub fn network(&self) -> Arc<Mutex<Network>> {
        self.network.clone()
    }

    pub async fn run(&self) -> JoinHandle<()> {
        init_tracing();

        tracing::info!("[simulation] starting with {:?}", self.config);
        let network = self.network.clone();
        let tick_interval = self.config.tick_interval();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut pending_ticks = 0.0;

            loop {
                interval.tick().await;

                let mut network = network.lock().await;
                let speed = network.settings().simulation_speed();
                for _ in 0..ticks_due(&mut pending_ticks, speed) {
                    network.tick();
                }
            }
        })
    }
}

/// Adds one period's worth of `speed` to `pending` and takes the whole ticks out.
fn ticks_due(pending: &mut f64, speed: f64) -> u64 {
    *pending += speed;
    let due = pending.floor();
    *pending -= due;
    due as u64
}
