use std::time::Duration;

use swim_sim::api::{config::SwimConfig, swim::SwimSimulation};
use swim_sim::{Event, Network};

use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

const CLUSTER_SIZE: u64 = 5;
const CRASHED_NODE: u64 = CLUSTER_SIZE;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .with_span_events(FmtSpan::FULL)
        .with_level(true)
        .init();

    let config = SwimConfig::builder()
        .with_tick_interval(Duration::from_micros(250))
        .build();
    let mut network = Network::builder().with_seed(7).with_config(config).build();
    for id in 1..=CLUSTER_SIZE {
        network.add_node(id);
    }

    let simulation = SwimSimulation::new(network);
    let mut rx = simulation.subscribe();
    let handle = simulation.run().await;

    // let the cluster converge before crashing a node
    tokio::time::sleep(Duration::from_secs(1)).await;
    simulation
        .network()
        .lock()
        .await
        .set_node_faulty(CRASHED_NODE, true);

    let deadline = tokio::time::sleep(Duration::from_secs(10));
    tokio::pin!(deadline);
    let mut confirmations = 0;

    while confirmations < CLUSTER_SIZE - 1 {
        tokio::select! {
            _ = &mut deadline => {
                tracing::warn!(
                    "[simulation] gave up waiting for {} to be declared dead",
                    CRASHED_NODE
                );
                break;
            }
            event = rx.recv() => match event {
                Ok(Event::NodeDeceased { by, deceased }) if deceased == CRASHED_NODE => {
                    tracing::info!("[simulation] {} removed {}", by, deceased);
                    confirmations += 1;
                }
                Ok(event) => tracing::debug!("[simulation] {:?}", event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[simulation] skipped {} events", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    handle.abort();

    let network = simulation.network();
    let network = network.lock().await;
    for id in network.get_all_node_ids() {
        if let Some(node) = network.get_node(id) {
            tracing::info!(
                "[{}] tick {}, knows {:?}, suspects {:?}",
                id,
                network.get_current_tick(),
                node.known_peers(),
                node.suspected_peers()
            );
        }
    }
}
