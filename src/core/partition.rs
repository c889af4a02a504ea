use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};

use super::action::Action;
use super::render::{AnchorEnd, EdgeStyle, ElementId, NodeStyle, RenderSink};
use super::types::PartitionId;

/// A point in the coordinate space shared by nodes and partition anchors.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Answers where an element currently is; layout is owned by the visualization.
pub trait PositionSource {
    fn position_of(&self, id: ElementId) -> Option<Position>;
}

/// Shareable in-memory [`PositionSource`].
///
/// Clones share the same table, so a handle kept outside the
/// [`Network`](crate::Network) can move elements around while it runs.
#[derive(Clone, Debug, Default)]
pub struct StaticPositions {
    positions: Arc<RwLock<HashMap<ElementId, Position>>>,
}

impl StaticPositions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, id: ElementId, position: Position) {
        let mut positions = self
            .positions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        positions.insert(id, position);
    }

    pub fn remove(&self, id: ElementId) {
        let mut positions = self
            .positions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        positions.remove(&id);
    }
}

impl PositionSource for StaticPositions {
    fn position_of(&self, id: ElementId) -> Option<Position> {
        let positions = self
            .positions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        positions.get(&id).copied()
    }
}

/// A simulated network boundary between two anchors.
///
/// While active, every action whose path crosses the segment between the anchors
/// is lost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    id: PartitionId,
    active: bool,
}

impl Partition {
    pub fn new(id: PartitionId) -> Self {
        Self { id, active: false }
    }

    pub fn id(&self) -> PartitionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start_anchor(&self) -> ElementId {
        ElementId::PartitionAnchor(self.id, AnchorEnd::Start)
    }

    pub fn end_anchor(&self) -> ElementId {
        ElementId::PartitionAnchor(self.id, AnchorEnd::End)
    }

    /// Returns `true` if the flag actually changed.
    pub fn set_active(&mut self, active: bool) -> bool {
        let changed = self.active != active;
        self.active = active;
        changed
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        sink.upsert_node(
            self.start_anchor(),
            &format!("Partition {} Start", self.id),
            NodeStyle::PartitionAnchor,
        );
        sink.upsert_node(
            self.end_anchor(),
            &format!("Partition {} End", self.id),
            NodeStyle::PartitionAnchor,
        );

        if self.active {
            sink.upsert_edge(
                ElementId::Partition(self.id),
                self.start_anchor(),
                self.end_anchor(),
                "",
                EdgeStyle::Partition,
            );
        } else {
            sink.remove_edge(ElementId::Partition(self.id));
        }
    }

    pub fn remove(&self, sink: &mut dyn RenderSink) {
        sink.remove_node(self.start_anchor());
        sink.remove_node(self.end_anchor());
        sink.remove_edge(ElementId::Partition(self.id));
    }

    /// Tests whether `action` crosses this partition.
    ///
    /// Inactive partitions never intersect. If any position is unavailable a
    /// warning is logged and the action is let through.
    pub fn action_intersects_with_partition(
        &self,
        action: &Action,
        positions: &dyn PositionSource,
    ) -> bool {
        if !self.active {
            return false;
        }

        match self.try_intersects(action, positions) {
            Ok(intersects) => intersects,
            Err(e) => {
                tracing::warn!("[partition {}] {e}", self.id);
                false
            }
        }
    }

    fn try_intersects(&self, action: &Action, positions: &dyn PositionSource) -> Result<bool> {
        let locate = |id: ElementId| {
            positions
                .position_of(id)
                .ok_or_else(|| Error::UnavailablePosition {
                    message: format!("no position for {id:?} while testing action {}", action.id()),
                    location: snafu::location!(),
                })
        };

        let partition_start = locate(self.start_anchor())?;
        let partition_end = locate(self.end_anchor())?;
        let sender = locate(ElementId::Node(action.from()))?;
        let receiver = locate(ElementId::Node(action.to()))?;

        Ok(segments_intersect(
            partition_start,
            partition_end,
            sender,
            receiver,
        ))
    }
}

/// Parametric intersection test of segments `a1-a2` and `b1-b2`.
///
/// Parallel and collinear segments are treated as not intersecting; touching at an
/// endpoint counts as intersecting.
pub fn segments_intersect(a1: Position, a2: Position, b1: Position, b2: Position) -> bool {
    let (ux, uy) = (a2.x - a1.x, a2.y - a1.y);
    let (vx, vy) = (b2.x - b1.x, b2.y - b1.y);
    let (wx, wy) = (a1.x - b1.x, a1.y - b1.y);

    let denominator = vy * ux - vx * uy;
    if denominator == 0.0 {
        return false;
    }

    let ua = (vx * wy - vy * wx) / denominator;
    let ub = (ux * wy - uy * wx) / denominator;

    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}
