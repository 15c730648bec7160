use std::collections::HashMap;
use topograph_core::{EdgeId, EdgeStyle, GraphEdge, GraphNode, NodeId, TopologyDoc};
use tracing::debug;

use crate::graph::animate::{AnimationScheduler, CancelToken, FrameParams};
use crate::graph::filter::{apply_filter, FilterPredicate};
use crate::graph::highlight::HighlightState;
use crate::graph::layout::{layout, BoundingBox, LayoutOptions, LayoutResult, LayoutStrategy};
use crate::graph::model::Graph;
use crate::util::config::EngineConfig;

/// One topology view: full graph, working subgraph, layout, highlight,
/// edge styles and the animation scheduler. All operations are synchronous
/// and derive new state from immutable inputs; the renderer reads the
/// accessors after each call.
pub struct TopologyEngine {
    model: Graph,
    working: Graph,
    filter: FilterPredicate,
    strategy: LayoutStrategy,
    options: LayoutOptions,
    layout: LayoutResult,
    highlight: HighlightState,
    styles: HashMap<EdgeId, EdgeStyle>,
    scheduler: AnimationScheduler,
    search_hit_limit: usize,
    statistics: Option<serde_json::Value>,
    metadata: Option<serde_json::Value>,
}

impl Default for TopologyEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl TopologyEngine {
    pub fn new(cfg: &EngineConfig) -> Self {
        let strategy = cfg.strategy;
        let options = cfg.layout_options();
        Self {
            model: Graph::default(),
            working: Graph::default(),
            filter: FilterPredicate::default(),
            strategy,
            options,
            layout: LayoutResult::empty(strategy, options),
            highlight: HighlightState::cleared(),
            styles: HashMap::new(),
            scheduler: AnimationScheduler::default(),
            search_hit_limit: cfg.search_hit_limit,
            statistics: None,
            metadata: None,
        }
    }

    /// Replaces the graph with the content of a fetched topology document.
    /// `statistics`/`metadata` are kept verbatim for display.
    pub fn load_doc(&mut self, doc: TopologyDoc) {
        self.statistics = doc.statistics;
        self.metadata = doc.metadata;
        self.set_graph(doc.nodes, doc.edges);
    }

    /// Structural change is whole-graph replacement; there is no in-place
    /// node or edge mutation.
    pub fn set_graph(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) {
        self.model = Graph::build(nodes, edges);
        self.highlight = HighlightState::cleared();
        self.rebuild_working();
    }

    /// Recomputes the working subgraph and re-runs layout. Any current
    /// selection is cleared so a stale highlight can never reference a
    /// now-hidden node.
    pub fn set_filter(&mut self, predicate: FilterPredicate) -> &LayoutResult {
        self.filter = predicate;
        self.highlight = HighlightState::cleared();
        self.rebuild_working();
        &self.layout
    }

    /// Re-applying with unchanged strategy and options yields identical
    /// positions (layout is pure).
    pub fn set_layout_strategy(
        &mut self,
        strategy: LayoutStrategy,
        options: LayoutOptions,
    ) -> &LayoutResult {
        self.strategy = strategy;
        self.options = options;
        self.layout = layout(&self.working, self.strategy, &self.options);
        &self.layout
    }

    pub fn select_node(&mut self, id: &NodeId) -> &HighlightState {
        self.scheduler.cancel_all(&mut self.styles);
        self.highlight = HighlightState::select_node(&self.working, id);
        if !self.highlight.is_cleared() {
            let nb = self.working.neighbors(id);
            let mut ants: Vec<EdgeId> = nb.incoming_edges.to_vec();
            ants.extend(nb.outgoing_edges.iter().cloned());
            self.scheduler.start_marching_ants(ants);
            // Downstream emphasis: the pulse only runs along outgoing edges.
            self.scheduler
                .start_flow_pulse(nb.outgoing_edges.to_vec(), &self.styles);
        }
        &self.highlight
    }

    pub fn select_edge(&mut self, id: &EdgeId) -> &HighlightState {
        self.scheduler.cancel_all(&mut self.styles);
        self.highlight = HighlightState::select_edge(&self.working, id);
        if !self.highlight.is_cleared() {
            self.scheduler.start_marching_ants(vec![id.clone()]);
        }
        &self.highlight
    }

    pub fn clear_selection(&mut self) -> &HighlightState {
        self.scheduler.cancel_all(&mut self.styles);
        self.highlight = HighlightState::cleared();
        &self.highlight
    }

    /// One scheduler tick. The host loop should only keep ticking while
    /// `has_active_animations()` holds.
    pub fn advance_frame(&mut self) -> FrameParams {
        self.scheduler.advance_frame(&mut self.styles)
    }

    pub fn has_active_animations(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn animation_token(&self) -> CancelToken {
        self.scheduler.token()
    }

    /// Case-insensitive substring hits over label and id, sorted by id.
    pub fn search_hits(&self, query: &str) -> Vec<NodeId> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<NodeId> = self
            .working
            .nodes()
            .iter()
            .filter(|n| n.id.0.to_lowercase().contains(&q) || n.label.to_lowercase().contains(&q))
            .map(|n| n.id.clone())
            .collect();
        hits.sort();
        hits.truncate(self.search_hit_limit.max(1));
        hits
    }

    pub fn working(&self) -> &Graph {
        &self.working
    }

    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn edge_style(&self, id: &EdgeId) -> Option<&EdgeStyle> {
        self.styles.get(id)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.layout.bounding_box()
    }

    pub fn statistics(&self) -> Option<&serde_json::Value> {
        self.statistics.as_ref()
    }

    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    pub fn diagnostics(&self) -> &[String] {
        self.model.diagnostics()
    }

    /// Teardown: trips the cancel token and restores every edge style.
    pub fn dispose(&mut self) {
        self.scheduler.dispose(&mut self.styles);
    }

    fn rebuild_working(&mut self) {
        // The working subgraph is changing: pending animations are cancelled
        // (with restore) before their target edges can disappear.
        self.scheduler.cancel_all(&mut self.styles);
        self.working = apply_filter(&self.model, &self.filter);
        self.styles = self
            .working
            .edges()
            .iter()
            .map(|e| (e.id.clone(), e.relation.baseline_style()))
            .collect();
        self.layout = layout(&self.working, self.strategy, &self.options);
        debug!(
            nodes = self.working.node_count(),
            edges = self.working.edge_count(),
            "working subgraph rebuilt"
        );
    }
}
