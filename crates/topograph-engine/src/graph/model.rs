use smallvec::SmallVec;
use std::collections::HashMap;
use topograph_core::{EdgeId, GraphEdge, GraphNode, NodeId};
use tracing::warn;

pub type EdgeList = SmallVec<[EdgeId; 4]>;

/// Immutable, indexed graph. Structural change means building a new value;
/// nothing in the engine mutates nodes or edges in place.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_index: HashMap<NodeId, usize>,
    edge_index: HashMap<EdgeId, usize>,
    outgoing: HashMap<NodeId, EdgeList>,
    incoming: HashMap<NodeId, EdgeList>,
    diagnostics: Vec<String>,
}

/// Incident edges and adjacent nodes of one node, split by direction.
#[derive(Debug, Default, Clone)]
pub struct Neighborhood {
    pub incoming_edges: EdgeList,
    pub outgoing_edges: EdgeList,
    pub incoming_nodes: Vec<NodeId>,
    pub outgoing_nodes: Vec<NodeId>,
}

impl Graph {
    /// Validates and indexes in O(V+E). Duplicate node ids keep the first
    /// occurrence; edges with a dangling endpoint or duplicate id are
    /// dropped. Both are diagnostics, never errors.
    pub fn build(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut g = Graph::default();

        for node in nodes {
            if g.node_index.contains_key(&node.id) {
                let msg = format!("duplicate node id {:?} dropped", node.id.0);
                warn!(node = %node.id.0, "duplicate node id dropped");
                g.diagnostics.push(msg);
                continue;
            }
            g.node_index.insert(node.id.clone(), g.nodes.len());
            g.nodes.push(node);
        }

        for edge in edges {
            if g.edge_index.contains_key(&edge.id) {
                let msg = format!("duplicate edge id {:?} dropped", edge.id.0);
                warn!(edge = %edge.id.0, "duplicate edge id dropped");
                g.diagnostics.push(msg);
                continue;
            }
            let missing = if !g.node_index.contains_key(&edge.source) {
                Some(&edge.source)
            } else if !g.node_index.contains_key(&edge.target) {
                Some(&edge.target)
            } else {
                None
            };
            if let Some(endpoint) = missing {
                let msg = format!(
                    "edge {:?} dropped: endpoint {:?} not in graph",
                    edge.id.0, endpoint.0
                );
                warn!(edge = %edge.id.0, endpoint = %endpoint.0, "edge dropped: missing endpoint");
                g.diagnostics.push(msg);
                continue;
            }

            g.edge_index.insert(edge.id.clone(), g.edges.len());
            g.outgoing
                .entry(edge.source.clone())
                .or_default()
                .push(edge.id.clone());
            g.incoming
                .entry(edge.target.clone())
                .or_default()
                .push(edge.id.clone());
            g.edges.push(edge);
        }

        g
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes in input order. Input order is irrelevant for correctness but
    /// is the deterministic tie-break for layout.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge_index.contains_key(id)
    }

    pub fn outgoing_edges(&self, id: &NodeId) -> &[EdgeId] {
        self.outgoing.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn incoming_edges(&self, id: &NodeId) -> &[EdgeId] {
        self.incoming.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn neighbors(&self, id: &NodeId) -> Neighborhood {
        let mut out = Neighborhood::default();
        for eid in self.incoming_edges(id) {
            if let Some(e) = self.edge(eid) {
                out.incoming_edges.push(eid.clone());
                out.incoming_nodes.push(e.source.clone());
            }
        }
        for eid in self.outgoing_edges(id) {
            if let Some(e) = self.edge(eid) {
                out.outgoing_edges.push(eid.clone());
                out.outgoing_nodes.push(e.target.clone());
            }
        }
        out
    }

    /// Validation messages collected during `build` (dropped edges, dupes).
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }
}
