use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Identifier of a simulated node.
pub type NodeId = u64;

/// Identifier of an in-flight action, unique for the lifetime of a [`Network`](crate::Network).
pub type ActionId = u64;

/// Identifier of a network partition.
pub type PartitionId = u64;

/// Logical clock value.
pub type Tick = u64;

macro_rules! named_variants {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(Error::UnknownVariant {
                        message: format!("'{other}' is not a valid {}", stringify!($ty)),
                        location: snafu::location!(),
                    }),
                }
            }
        }
    };
}

/// The kind of a protocol message, used for render filtering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionType {
    Ping,
    Ack,
    PingReq,
    Join,
    MulticastJoin,
    MulticastLeave,
    MulticastDeath,
}

named_variants!(ActionType {
    Ping => "ping",
    Ack => "ack",
    PingReq => "ping_req",
    Join => "join",
    MulticastJoin => "multicast_join",
    MulticastLeave => "multicast_leave",
    MulticastDeath => "multicast_death",
});

/// How a node picks whom to probe every ping interval.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PingApproach {
    /// Every known peer.
    All,
    /// One uniformly random known peer.
    #[default]
    Random,
    /// Cycle through a shuffled snapshot of the known peers.
    RoundRobin,
}

named_variants!(PingApproach {
    All => "all",
    Random => "random",
    RoundRobin => "round_robin",
});

/// How membership changes travel through the cluster.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisseminationApproach {
    Multicast,
    Gossip,
    #[default]
    GossipWithSuspicion,
}

named_variants!(DisseminationApproach {
    Multicast => "multicast",
    Gossip => "gossip",
    GossipWithSuspicion => "gossip_with_suspicion",
});

impl DisseminationApproach {
    pub fn is_gossip(&self) -> bool {
        !matches!(self, DisseminationApproach::Multicast)
    }
}

/// What the node labels show next to the node name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverlayMode {
    #[default]
    None,
    Incarnation,
    Membership,
}

named_variants!(OverlayMode {
    None => "none",
    Incarnation => "incarnation",
    Membership => "membership",
});

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::{ActionType, DisseminationApproach, OverlayMode, PingApproach};

    #[test]
    fn test_types_parse_names() {
        for action_type in ActionType::ALL {
            assert_eq!(
                action_type.as_str().parse::<ActionType>().unwrap(),
                *action_type
            );
        }
        assert_eq!(
            "round_robin".parse::<PingApproach>().unwrap(),
            PingApproach::RoundRobin
        );
        assert_eq!(
            "gossip_with_suspicion"
                .parse::<DisseminationApproach>()
                .unwrap(),
            DisseminationApproach::GossipWithSuspicion
        );
        assert_eq!(OverlayMode::Membership.to_string(), "membership");
    }

    #[test]
    fn test_types_parse_unknown_variant() {
        let result = "broadcast".parse::<DisseminationApproach>();
        assert!(matches!(result, Err(Error::UnknownVariant { .. })));
    }

    #[test]
    fn test_types_dissemination_is_gossip() {
        assert!(!DisseminationApproach::Multicast.is_gossip());
        assert!(DisseminationApproach::Gossip.is_gossip());
        assert!(DisseminationApproach::GossipWithSuspicion.is_gossip());
    }
}
