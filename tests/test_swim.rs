use std::time::Duration;

use swim_sim::{
    api::{config::SwimConfig, swim::SwimSimulation},
    Event, Network,
};

macro_rules! assert_event {
    ($event:pat, $rx:expr, $ms:expr) => {
        let result = tokio::time::timeout(Duration::from_millis($ms), async {
            loop {
                match $rx.recv().await {
                    Ok($event) => break,
                    Ok(_) => continue,
                    Err(_) => panic!(),
                }
            }
        })
        .await;

        if result.is_err() {
            panic!()
        }
    };
}

fn create_config(suspect_timeout: u64) -> SwimConfig {
    SwimConfig::builder()
        .with_network_latency(2)
        .with_ping_interval(10)
        .with_ping_timeout(6)
        .with_ping_req_timeout(12)
        .with_suspect_timeout(suspect_timeout)
        .with_expectation_check_interval(1)
        .with_tick_interval(Duration::from_millis(1))
        .build()
}

fn create_simulation(size: u64) -> SwimSimulation {
    create_simulation_with_config(size, create_config(20))
}

fn create_simulation_with_config(size: u64, config: SwimConfig) -> SwimSimulation {
    let mut network = Network::builder().with_seed(5).with_config(config).build();
    for id in 1..=size {
        network.add_node(id);
    }
    SwimSimulation::new(network)
}

#[tokio::test]
async fn test_swim_simulation_advances_ticks() {
    let simulation = create_simulation(3);

    let handle = simulation.run().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let tick = simulation.network().lock().await.get_current_tick();
    assert!(tick > 0);

    handle.abort();
}

#[tokio::test]
async fn test_swim_simulation_zero_speed_pauses() {
    let simulation = create_simulation(3);
    simulation
        .network()
        .lock()
        .await
        .set_simulation_speed(0.0)
        .unwrap();

    let handle = simulation.run().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(simulation.network().lock().await.get_current_tick(), 0);

    simulation
        .network()
        .lock()
        .await
        .set_simulation_speed(1.0)
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(simulation.network().lock().await.get_current_tick() > 0);

    handle.abort();
}

#[tokio::test]
async fn test_swim_simulation_node_suspected_event() {
    let simulation = create_simulation(4);
    let mut rx = simulation.subscribe();

    let handle = simulation.run().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    simulation.network().lock().await.set_node_faulty(4, true);

    assert_event!(Event::NodeSuspected { suspect: 4, .. }, rx, 3000);

    handle.abort();
}

#[tokio::test]
async fn test_swim_simulation_node_deceased_event() {
    let simulation = create_simulation(4);
    let mut rx = simulation.subscribe();

    let handle = simulation.run().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    simulation.network().lock().await.set_node_faulty(4, true);

    assert_event!(Event::NodeDeceased { deceased: 4, .. }, rx, 5000);

    handle.abort();
}

#[tokio::test]
async fn test_swim_simulation_node_recovered_event() {
    let simulation = create_simulation_with_config(3, create_config(5000));
    let mut rx = simulation.subscribe();

    let handle = simulation.run().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    simulation.network().lock().await.set_node_faulty(3, true);

    assert_event!(Event::NodeSuspected { suspect: 3, .. }, rx, 3000);

    simulation.network().lock().await.set_node_faulty(3, false);

    assert_event!(Event::NodeRecovered { recovered: 3, .. }, rx, 3000);

    handle.abort();
}
