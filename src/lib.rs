use lazy_static::lazy_static;
use tracing_subscriber::EnvFilter;

pub mod api;

mod core;
pub use crate::core::{
    action::{Action, ActionKind, NodeAction},
    config::{ConfigChanged, NetworkConfig},
    disseminate::RumorBuffer,
    event::Event,
    expectation::{Expectation, ExpectationKind},
    mill::RumorMill,
    network::{Network, NetworkBuilder},
    node::SwimNode,
    partition::{segments_intersect, Partition, Position, PositionSource, StaticPositions},
    render::{AnchorEnd, EdgeStyle, ElementId, NodeStyle, NoopRenderSink, RenderSink},
    rumor::{Rumor, RumorType},
    types::{
        ActionId, ActionType, DisseminationApproach, NodeId, OverlayMode, PartitionId,
        PingApproach, Tick,
    },
};

pub mod error;
pub use error::{Error, Result};

#[cfg(any(test, feature = "test-util"))]
#[path = "./test-utils/mod.rs"]
#[doc(hidden)]
mod test_utils;

lazy_static! {
    static ref TRACING: () = {
        // a subscriber installed by the embedding binary takes precedence
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    };
}

fn init_tracing() {
    lazy_static::initialize(&TRACING);
}
