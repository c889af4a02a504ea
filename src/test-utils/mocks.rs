use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::core::render::{EdgeStyle, ElementId, NodeStyle, RenderSink};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum RenderCommand {
    UpsertNode {
        id: ElementId,
        label: String,
        style: NodeStyle,
    },
    RemoveNode {
        id: ElementId,
    },
    UpsertEdge {
        id: ElementId,
        from: ElementId,
        to: ElementId,
        label: String,
        style: EdgeStyle,
    },
    RemoveEdge {
        id: ElementId,
    },
}

/// Records every render command; clones share the same log.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockRenderSink {
    commands: Arc<Mutex<Vec<RenderCommand>>>,
}

impl MockRenderSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn commands(&self) -> Vec<RenderCommand> {
        let commands = self.commands.lock().unwrap();
        (*commands).clone()
    }

    fn add_command(&self, command: RenderCommand) {
        let mut commands = self.commands.lock().unwrap();
        commands.push(command);
    }

    /// The latest label and style of every node still drawn.
    pub(crate) fn nodes(&self) -> BTreeMap<ElementId, (String, NodeStyle)> {
        let mut nodes = BTreeMap::new();
        for command in self.commands() {
            match command {
                RenderCommand::UpsertNode { id, label, style } => {
                    nodes.insert(id, (label, style));
                }
                RenderCommand::RemoveNode { id } => {
                    nodes.remove(&id);
                }
                _ => {}
            }
        }
        nodes
    }

    /// The latest style of every edge still drawn.
    pub(crate) fn edges(&self) -> BTreeMap<ElementId, EdgeStyle> {
        let mut edges = BTreeMap::new();
        for command in self.commands() {
            match command {
                RenderCommand::UpsertEdge { id, style, .. } => {
                    edges.insert(id, style);
                }
                RenderCommand::RemoveEdge { id } => {
                    edges.remove(&id);
                }
                _ => {}
            }
        }
        edges
    }
}

impl RenderSink for MockRenderSink {
    fn upsert_node(&mut self, id: ElementId, label: &str, style: NodeStyle) {
        self.add_command(RenderCommand::UpsertNode {
            id,
            label: label.to_string(),
            style,
        });
    }

    fn remove_node(&mut self, id: ElementId) {
        self.add_command(RenderCommand::RemoveNode { id });
    }

    fn upsert_edge(
        &mut self,
        id: ElementId,
        from: ElementId,
        to: ElementId,
        label: &str,
        style: EdgeStyle,
    ) {
        self.add_command(RenderCommand::UpsertEdge {
            id,
            from,
            to,
            label: label.to_string(),
            style,
        });
    }

    fn remove_edge(&mut self, id: ElementId) {
        self.add_command(RenderCommand::RemoveEdge { id });
    }
}

#[cfg(test)]
mod tests {
    use crate::core::render::{ElementId, NodeStyle, RenderSink};
    use crate::test_utils::mocks::{MockRenderSink, RenderCommand};

    #[test]
    fn test_mock_render_sink_replays_commands() {
        let sink = MockRenderSink::new();
        let mut handle = sink.clone();

        handle.upsert_node(ElementId::Node(1), "Node id 1", NodeStyle::Active);
        handle.upsert_node(ElementId::Node(2), "Node id 2", NodeStyle::Active);
        handle.upsert_node(ElementId::Node(1), "Node id 1", NodeStyle::Faulty);
        handle.remove_node(ElementId::Node(2));

        assert_eq!(sink.commands().len(), 4);
        assert_eq!(
            sink.commands()[3],
            RenderCommand::RemoveNode {
                id: ElementId::Node(2)
            }
        );

        let nodes = sink.nodes();
        assert_eq!(nodes.len(), 1);
        assert_eq!(
            nodes[&ElementId::Node(1)],
            ("Node id 1".to_string(), NodeStyle::Faulty)
        );
    }
}
