use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub String);

/// Closed tag set for node kinds. Rendering styles and fixed node sizes
/// are keyed off this enum, never off free-form strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Namespace,
    Service,
    Rpc,
    RpcGroup,
    Host,
    Pod,
    Deployment,
    Workload,
    ConfigMap,
    Volume,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Service => "service",
            Self::Rpc => "rpc",
            Self::RpcGroup => "rpc-group",
            Self::Host => "host",
            Self::Pod => "pod",
            Self::Deployment => "deployment",
            Self::Workload => "workload",
            Self::ConfigMap => "config-map",
            Self::Volume => "volume",
        }
    }

    /// Fixed render size per kind (width, height). Sizes are not computed
    /// from content; the renderer truncates labels to fit.
    pub fn default_size(self) -> NodeSize {
        match self {
            Self::Namespace => NodeSize { width: 180.0, height: 60.0 },
            Self::Service => NodeSize { width: 140.0, height: 50.0 },
            Self::Rpc => NodeSize { width: 110.0, height: 36.0 },
            Self::RpcGroup => NodeSize { width: 150.0, height: 44.0 },
            Self::Host => NodeSize { width: 160.0, height: 54.0 },
            Self::Pod => NodeSize { width: 120.0, height: 44.0 },
            Self::Deployment => NodeSize { width: 150.0, height: 50.0 },
            Self::Workload => NodeSize { width: 140.0, height: 48.0 },
            Self::ConfigMap => NodeSize { width: 120.0, height: 40.0 },
            Self::Volume => NodeSize { width: 120.0, height: 40.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NodeSize {
    pub width: f32,
    pub height: f32,
}

/// Closed tag set for edge relations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    DependsOn,
    Contains,
    Invokes,
    RunsOn,
    Selects,
    Mounts,
    Claims,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DependsOn => "depends_on",
            Self::Contains => "contains",
            Self::Invokes => "invokes",
            Self::RunsOn => "runs_on",
            Self::Selects => "selects",
            Self::Mounts => "mounts",
            Self::Claims => "claims",
        }
    }

    /// Baseline stroke/width/dash per relation. The animation scheduler
    /// snapshots and restores these exact values around transient overrides.
    pub fn baseline_style(self) -> EdgeStyle {
        match self {
            Self::DependsOn => EdgeStyle::solid("#6b7a8f", 1.5),
            Self::Invokes => EdgeStyle::solid("#2f7ed8", 1.5),
            Self::Contains => EdgeStyle::dashed("#9aa5b1", 1.0, [4.0, 4.0]),
            Self::RunsOn => EdgeStyle::dashed("#8a6d3b", 1.0, [2.0, 3.0]),
            Self::Selects => EdgeStyle::dashed("#3b8a6d", 1.0, [4.0, 2.0]),
            Self::Mounts => EdgeStyle::solid("#7a5fa0", 1.0),
            Self::Claims => EdgeStyle::solid("#a05f7a", 1.0),
        }
    }
}

/// Stroke/width/dash triple handed to the renderer for one edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeStyle {
    pub stroke: String,
    pub width: f32,
    pub dash: Option<[f32; 2]>,
}

impl EdgeStyle {
    pub fn solid(stroke: &str, width: f32) -> Self {
        Self { stroke: stroke.to_string(), width, dash: None }
    }

    pub fn dashed(stroke: &str, width: f32, dash: [f32; 2]) -> Self {
        Self { stroke: stroke.to_string(), width, dash: Some(dash) }
    }
}

/// Well-known attribute keys the filter engine understands. The attribute
/// bag stays open; anything else is display-only passthrough.
pub mod attr {
    pub const NAMESPACE: &str = "namespace";
    pub const STATUS: &str = "status";
    pub const DOMAIN: &str = "domain";
    pub const RISK_COUNT: &str = "riskCount";
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub size: Option<NodeSize>,
}

impl GraphNode {
    pub fn new(id: &str, kind: NodeKind, label: &str) -> Self {
        Self {
            id: NodeId(id.to_string()),
            kind,
            label: label.to_string(),
            attributes: BTreeMap::new(),
            size: None,
        }
    }

    pub fn size(&self) -> NodeSize {
        self.size.unwrap_or_else(|| self.kind.default_size())
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        self.attributes.get(key).and_then(|v| v.as_u64())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub relation: Relation,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub metrics: Option<BTreeMap<String, f64>>,
}

impl GraphEdge {
    pub fn new(id: &str, source: &str, target: &str, relation: Relation) -> Self {
        Self {
            id: EdgeId(id.to_string()),
            source: NodeId(source.to_string()),
            target: NodeId(target.to_string()),
            relation,
            label: None,
            metrics: None,
        }
    }
}

/// Topology document as fetched by the data layer. `statistics` and
/// `metadata` are opaque to the engine and passed through for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyDoc {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    #[serde(default)]
    pub statistics: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topology_doc_from_json() {
        let raw = r#"{
            "nodes": [
                {"id": "svc-a", "kind": "service", "label": "checkout",
                 "attributes": {"namespace": "shop", "status": "healthy", "riskCount": 2}},
                {"id": "rpc-1", "kind": "rpc", "label": "Charge"}
            ],
            "edges": [
                {"id": "e1", "source": "svc-a", "target": "rpc-1", "relation": "invokes"}
            ],
            "statistics": {"nodeCount": 2},
            "metadata": null
        }"#;
        let doc: TopologyDoc = serde_json::from_str(raw).expect("parse doc");
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[0].kind, NodeKind::Service);
        assert_eq!(doc.nodes[0].attr_str(attr::NAMESPACE), Some("shop"));
        assert_eq!(doc.nodes[0].attr_u64(attr::RISK_COUNT), Some(2));
        assert_eq!(doc.edges[0].relation, Relation::Invokes);
        assert!(doc.statistics.is_some());
    }

    #[test]
    fn node_size_falls_back_to_kind_default() {
        let n = GraphNode::new("h1", NodeKind::Host, "node-1");
        assert_eq!(n.size(), NodeKind::Host.default_size());
    }

    #[test]
    fn kind_tags_roundtrip_kebab_case() {
        let encoded = serde_json::to_string(&NodeKind::RpcGroup).expect("serialize");
        assert_eq!(encoded, "\"rpc-group\"");
        let decoded: NodeKind = serde_json::from_str("\"rpc-group\"").expect("deserialize");
        assert_eq!(decoded, NodeKind::RpcGroup);
    }
}
