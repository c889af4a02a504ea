//! # Core Module
//!
//! The `core` module contains the simulation engine: the [`network`] driver that
//! owns the clock and routes actions, the per-node SWIM state machine, gossip
//! dissemination through rumor buffers, partitions and the render seam.
pub(crate) mod action;
pub(crate) mod config;
pub(crate) mod disseminate;
pub(crate) mod event;
pub(crate) mod expectation;
pub(crate) mod mill;
pub(crate) mod network;
pub(crate) mod node;
pub(crate) mod partition;
pub(crate) mod render;
pub(crate) mod rumor;
pub(crate) mod types;
