use std::collections::BTreeSet;

use crate::error::{Error, Result};

use super::types::{ActionType, DisseminationApproach, OverlayMode, PingApproach};

/// A runtime setting that changed; the [`Network`](crate::Network) reacts to it synchronously.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigChanged {
    PingApproach,
    DisseminationApproach,
    PacketLoss,
    SimulationSpeed,
    EventFilter,
    OverlayMode,
    Physics,
}

/// Simulation parameters that may be tuned while the simulation runs.
///
/// Every setter returns `None` when the value is unchanged, otherwise the
/// [`ConfigChanged`] describing what needs resetting.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    ping_approach: PingApproach,
    dissemination_approach: DisseminationApproach,
    packet_loss: f64,
    simulation_speed: f64,
    event_type_filter: BTreeSet<ActionType>,
    overlay_mode: OverlayMode,
    physics_enabled: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ping_approach: PingApproach::default(),
            dissemination_approach: DisseminationApproach::default(),
            packet_loss: 0.0,
            simulation_speed: 1.0,
            event_type_filter: BTreeSet::new(),
            overlay_mode: OverlayMode::default(),
            physics_enabled: true,
        }
    }
}

impl NetworkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ping_approach(&self) -> PingApproach {
        self.ping_approach
    }

    pub fn dissemination_approach(&self) -> DisseminationApproach {
        self.dissemination_approach
    }

    /// Probability in `0.0..=1.0` that an action is lost at dispatch.
    pub fn packet_loss(&self) -> f64 {
        self.packet_loss
    }

    /// Multiplier of the tick cadence, `0.0` pauses the simulation.
    pub fn simulation_speed(&self) -> f64 {
        self.simulation_speed
    }

    /// Action types hidden from rendering.
    pub fn event_type_filter(&self) -> &BTreeSet<ActionType> {
        &self.event_type_filter
    }

    pub fn is_filtered(&self, action_type: ActionType) -> bool {
        self.event_type_filter.contains(&action_type)
    }

    pub fn overlay_mode(&self) -> OverlayMode {
        self.overlay_mode
    }

    pub fn physics_enabled(&self) -> bool {
        self.physics_enabled
    }

    pub fn set_ping_approach(&mut self, ping_approach: PingApproach) -> Option<ConfigChanged> {
        replace(
            &mut self.ping_approach,
            ping_approach,
            ConfigChanged::PingApproach,
        )
    }

    pub fn set_dissemination_approach(
        &mut self,
        dissemination_approach: DisseminationApproach,
    ) -> Option<ConfigChanged> {
        replace(
            &mut self.dissemination_approach,
            dissemination_approach,
            ConfigChanged::DisseminationApproach,
        )
    }

    pub fn set_packet_loss(&mut self, packet_loss: f64) -> Result<Option<ConfigChanged>> {
        if !(0.0..=1.0).contains(&packet_loss) {
            return Err(Error::InvalidConfig {
                message: format!("packet loss must be within 0.0..=1.0, got {packet_loss}"),
                location: snafu::location!(),
            });
        }

        Ok(replace(
            &mut self.packet_loss,
            packet_loss,
            ConfigChanged::PacketLoss,
        ))
    }

    pub fn set_simulation_speed(&mut self, simulation_speed: f64) -> Result<Option<ConfigChanged>> {
        if !simulation_speed.is_finite() || simulation_speed < 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "simulation speed must be a finite non-negative number, got {simulation_speed}"
                ),
                location: snafu::location!(),
            });
        }

        Ok(replace(
            &mut self.simulation_speed,
            simulation_speed,
            ConfigChanged::SimulationSpeed,
        ))
    }

    pub fn add_event_filter(&mut self, action_type: ActionType) -> Option<ConfigChanged> {
        self.event_type_filter
            .insert(action_type)
            .then_some(ConfigChanged::EventFilter)
    }

    pub fn remove_event_filter(&mut self, action_type: ActionType) -> Option<ConfigChanged> {
        self.event_type_filter
            .remove(&action_type)
            .then_some(ConfigChanged::EventFilter)
    }

    pub fn clear_event_filter(&mut self) -> Option<ConfigChanged> {
        if self.event_type_filter.is_empty() {
            return None;
        }

        self.event_type_filter.clear();
        Some(ConfigChanged::EventFilter)
    }

    pub fn set_overlay_mode(&mut self, overlay_mode: OverlayMode) -> Option<ConfigChanged> {
        replace(
            &mut self.overlay_mode,
            overlay_mode,
            ConfigChanged::OverlayMode,
        )
    }

    pub fn set_physics_enabled(&mut self, physics_enabled: bool) -> Option<ConfigChanged> {
        replace(
            &mut self.physics_enabled,
            physics_enabled,
            ConfigChanged::Physics,
        )
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T, change: ConfigChanged) -> Option<ConfigChanged> {
    if *slot == value {
        return None;
    }

    *slot = value;
    Some(change)
}
