//! # Render Sink
//!
//! The simulation does not draw anything itself. Nodes, in-flight actions and
//! partitions are reported to a [`RenderSink`] supplied by the visualization
//! shell, fire-and-forget.
use super::types::{ActionId, ActionType, NodeId, PartitionId};

/// Which end of a partition segment an anchor marks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnchorEnd {
    Start,
    End,
}

/// Identity of anything the render sink or the position source knows about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    Node(NodeId),
    PartitionAnchor(PartitionId, AnchorEnd),
    Partition(PartitionId),
    Action(ActionId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeStyle {
    Active,
    Faulty,
    Left,
    Dead,
    PartitionAnchor,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeStyle {
    Action { action_type: ActionType, lost: bool },
    Partition,
}

/// Receives drawing commands from the simulation.
pub trait RenderSink {
    fn upsert_node(&mut self, id: ElementId, label: &str, style: NodeStyle);

    fn remove_node(&mut self, id: ElementId);

    fn upsert_edge(
        &mut self,
        id: ElementId,
        from: ElementId,
        to: ElementId,
        label: &str,
        style: EdgeStyle,
    );

    fn remove_edge(&mut self, id: ElementId);
}

/// Discards every command, for headless runs.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopRenderSink;

impl RenderSink for NoopRenderSink {
    fn upsert_node(&mut self, _id: ElementId, _label: &str, _style: NodeStyle) {}

    fn remove_node(&mut self, _id: ElementId) {}

    fn upsert_edge(
        &mut self,
        _id: ElementId,
        _from: ElementId,
        _to: ElementId,
        _label: &str,
        _style: EdgeStyle,
    ) {
    }

    fn remove_edge(&mut self, _id: ElementId) {}
}
