use std::collections::HashSet;
use topograph_core::{attr, GraphNode, NodeKind};
use tracing::debug;

use crate::graph::model::Graph;

/// Conjunction of optional constraints. Each set is OR within itself,
/// AND across constraints; the empty predicate matches everything.
#[derive(Debug, Default, Clone)]
pub struct FilterPredicate {
    pub kinds: HashSet<NodeKind>,
    pub namespaces: HashSet<String>,
    pub statuses: HashSet<String>,
    pub domains: HashSet<String>,
    /// `Some(true)` keeps nodes with riskCount > 0, `Some(false)` keeps
    /// nodes without risk, `None` keeps both.
    pub has_risk: Option<bool>,
    pub text: String,
}

impl FilterPredicate {
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
            && self.namespaces.is_empty()
            && self.statuses.is_empty()
            && self.domains.is_empty()
            && self.has_risk.is_none()
            && self.text.trim().is_empty()
    }

    pub fn matches(&self, node: &GraphNode) -> bool {
        if !self.kinds.is_empty() && !self.kinds.contains(&node.kind) {
            return false;
        }
        if !self.namespaces.is_empty() {
            match node.attr_str(attr::NAMESPACE) {
                Some(ns) if self.namespaces.contains(ns) => {}
                _ => return false,
            }
        }
        if !self.statuses.is_empty() {
            match node.attr_str(attr::STATUS) {
                Some(s) if self.statuses.contains(s) => {}
                _ => return false,
            }
        }
        if !self.domains.is_empty() {
            match node.attr_str(attr::DOMAIN) {
                Some(d) if self.domains.contains(d) => {}
                _ => return false,
            }
        }
        if let Some(wants_risk) = self.has_risk {
            let risky = node.attr_u64(attr::RISK_COUNT).unwrap_or(0) > 0;
            if risky != wants_risk {
                return false;
            }
        }
        let text = self.text.trim();
        if !text.is_empty() {
            let q = text.to_lowercase();
            let label_ok = node.label.to_lowercase().contains(&q);
            let id_ok = node.id.0.to_lowercase().contains(&q);
            if !label_ok && !id_ok {
                return false;
            }
        }
        true
    }
}

/// Derives the working subgraph: nodes passing the predicate plus edges
/// whose endpoints both pass. Edges are never shown dangling.
pub fn apply_filter(graph: &Graph, predicate: &FilterPredicate) -> Graph {
    if predicate.is_empty() {
        return graph.clone();
    }

    let nodes: Vec<_> = graph
        .nodes()
        .iter()
        .filter(|n| predicate.matches(n))
        .cloned()
        .collect();
    let kept: HashSet<_> = nodes.iter().map(|n| n.id.clone()).collect();
    let edges: Vec<_> = graph
        .edges()
        .iter()
        .filter(|e| kept.contains(&e.source) && kept.contains(&e.target))
        .cloned()
        .collect();

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        "filter recomputed working subgraph"
    );
    Graph::build(nodes, edges)
}
