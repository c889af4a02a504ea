//! # Simulation API Module
//!
//! Entry points for configuring and running a simulation.
//!
//! ## Modules
//!
//! - [`config`]: protocol timing and gossip limits, built with [`config::SwimConfigBuilder`].
//! - [`swim`]: the [`swim::SwimSimulation`] runner driving a [`Network`](crate::Network)
//!   on a wall-clock cadence.
pub mod config;
pub mod swim;
