use std::collections::HashSet;
use topograph_core::{EdgeId, NodeId};

use crate::graph::model::Graph;

pub const DIMMED_NODE_OPACITY: f32 = 0.3;
// Edges are thinner than nodes, so they dim harder.
pub const DIMMED_EDGE_OPACITY: f32 = 0.2;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Edge(EdgeId),
}

/// Emphasis assignment derived from one selection. Replaced wholesale on
/// every transition, never merged with the previous state.
#[derive(Debug, Clone, Default)]
pub struct HighlightState {
    pub selection: Selection,
    pub emphasized_nodes: HashSet<NodeId>,
    pub emphasized_edges: HashSet<EdgeId>,
}

impl HighlightState {
    pub fn cleared() -> Self {
        Self::default()
    }

    /// The clicked node plus its direct in/out neighborhood. An id that is
    /// not in the working subgraph clears the selection instead.
    pub fn select_node(graph: &Graph, id: &NodeId) -> Self {
        if !graph.contains_node(id) {
            return Self::cleared();
        }
        let nb = graph.neighbors(id);
        let mut nodes: HashSet<NodeId> = HashSet::new();
        nodes.insert(id.clone());
        nodes.extend(nb.incoming_nodes);
        nodes.extend(nb.outgoing_nodes);

        let mut edges: HashSet<EdgeId> = HashSet::new();
        edges.extend(nb.incoming_edges);
        edges.extend(nb.outgoing_edges);

        Self {
            selection: Selection::Node(id.clone()),
            emphasized_nodes: nodes,
            emphasized_edges: edges,
        }
    }

    /// The clicked edge plus its two endpoints.
    pub fn select_edge(graph: &Graph, id: &EdgeId) -> Self {
        let Some(edge) = graph.edge(id) else {
            return Self::cleared();
        };
        Self {
            selection: Selection::Edge(id.clone()),
            emphasized_nodes: HashSet::from([edge.source.clone(), edge.target.clone()]),
            emphasized_edges: HashSet::from([id.clone()]),
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.selection == Selection::None
    }

    pub fn node_opacity(&self, id: &NodeId) -> f32 {
        if self.is_cleared() || self.emphasized_nodes.contains(id) {
            1.0
        } else {
            DIMMED_NODE_OPACITY
        }
    }

    pub fn edge_opacity(&self, id: &EdgeId) -> f32 {
        if self.is_cleared() || self.emphasized_edges.contains(id) {
            1.0
        } else {
            DIMMED_EDGE_OPACITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topograph_core::{GraphEdge, GraphNode, NodeKind, Relation};

    fn id(s: &str) -> NodeId {
        NodeId(s.to_string())
    }

    fn eid(s: &str) -> EdgeId {
        EdgeId(s.to_string())
    }

    fn sample() -> Graph {
        // a -> b -> c, plus unrelated d.
        Graph::build(
            vec![
                GraphNode::new("a", NodeKind::Service, "a"),
                GraphNode::new("b", NodeKind::Service, "b"),
                GraphNode::new("c", NodeKind::Service, "c"),
                GraphNode::new("d", NodeKind::Service, "d"),
            ],
            vec![
                GraphEdge::new("e1", "a", "b", Relation::DependsOn),
                GraphEdge::new("e2", "b", "c", Relation::DependsOn),
            ],
        )
    }

    #[test]
    fn node_selection_emphasizes_direct_neighborhood() {
        let g = sample();
        let hs = HighlightState::select_node(&g, &id("b"));
        assert_eq!(
            hs.emphasized_nodes,
            HashSet::from([id("a"), id("b"), id("c")])
        );
        assert_eq!(hs.emphasized_edges, HashSet::from([eid("e1"), eid("e2")]));
        assert_eq!(hs.node_opacity(&id("d")), DIMMED_NODE_OPACITY);
        assert_eq!(hs.node_opacity(&id("a")), 1.0);
    }

    #[test]
    fn edge_selection_emphasizes_endpoints_only() {
        let g = sample();
        let hs = HighlightState::select_edge(&g, &eid("e1"));
        assert_eq!(hs.emphasized_nodes, HashSet::from([id("a"), id("b")]));
        assert_eq!(hs.emphasized_edges, HashSet::from([eid("e1")]));
        assert_eq!(hs.edge_opacity(&eid("e2")), DIMMED_EDGE_OPACITY);
    }

    #[test]
    fn reselection_replaces_rather_than_unions() {
        let g = Graph::build(
            vec![
                GraphNode::new("a", NodeKind::Service, "a"),
                GraphNode::new("a-only", NodeKind::Service, "a-only"),
                GraphNode::new("b", NodeKind::Service, "b"),
                GraphNode::new("b-only", NodeKind::Service, "b-only"),
            ],
            vec![
                GraphEdge::new("e1", "a", "a-only", Relation::DependsOn),
                GraphEdge::new("e2", "b", "b-only", Relation::DependsOn),
            ],
        );
        let _first = HighlightState::select_node(&g, &id("a"));
        let second = HighlightState::select_node(&g, &id("b"));
        assert!(!second.emphasized_nodes.contains(&id("a-only")));
        assert_eq!(second.emphasized_nodes, HashSet::from([id("b"), id("b-only")]));
    }

    #[test]
    fn unknown_id_clears_selection() {
        let g = sample();
        assert!(HighlightState::select_node(&g, &id("ghost")).is_cleared());
        assert!(HighlightState::select_edge(&g, &eid("ghost")).is_cleared());
    }

    #[test]
    fn cleared_state_is_fully_opaque() {
        let hs = HighlightState::cleared();
        assert_eq!(hs.node_opacity(&id("a")), 1.0);
        assert_eq!(hs.edge_opacity(&eid("e1")), 1.0);
    }

    #[test]
    fn emphasized_edges_touch_emphasized_nodes() {
        let g = sample();
        for node in g.nodes() {
            let hs = HighlightState::select_node(&g, &node.id);
            for eid in &hs.emphasized_edges {
                let e = g.edge(eid).expect("edge");
                assert!(
                    hs.emphasized_nodes.contains(&e.source)
                        || hs.emphasized_nodes.contains(&e.target)
                );
            }
        }
    }
}
