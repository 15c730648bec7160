use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use topograph_core::NodeId;
use tracing::debug;

use crate::graph::model::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    #[default]
    Layered,
    /// Heuristic ring placement, not an iterative simulation. Kept under
    /// this name so callers can swap in a real force layout later.
    ForcePlacement,
    Grid,
    Circular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub direction: Direction,
    /// Spacing between siblings within a layer (cross axis).
    pub node_spacing: f32,
    /// Spacing between layers (rank axis).
    pub rank_spacing: f32,
    pub margin: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Circular radius as a fraction of min(canvas_w, canvas_h) / 2.
    pub circle_scale: f32,
    /// Fixed ring radius for the force-placement heuristic.
    pub force_radius: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::TopBottom,
            node_spacing: 60.0,
            rank_spacing: 100.0,
            margin: 40.0,
            canvas_width: 1200.0,
            canvas_height: 800.0,
            circle_scale: 0.8,
            force_radius: 220.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Positions for every node of the input graph, plus the strategy and
/// options that produced them. Never partial.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    positions: HashMap<NodeId, Position>,
    pub strategy: LayoutStrategy,
    pub options: LayoutOptions,
}

impl LayoutResult {
    pub fn empty(strategy: LayoutStrategy, options: LayoutOptions) -> Self {
        Self {
            positions: HashMap::new(),
            strategy,
            options,
        }
    }

    pub fn position(&self, id: &NodeId) -> Option<Position> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Position)> {
        self.positions.iter()
    }

    /// Bounding box of all positioned nodes, for viewport fitting.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut it = self.positions.values();
        let first = it.next()?;
        let mut bb = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in it {
            bb.min_x = bb.min_x.min(p.x);
            bb.min_y = bb.min_y.min(p.y);
            bb.max_x = bb.max_x.max(p.x);
            bb.max_y = bb.max_y.max(p.y);
        }
        Some(bb)
    }
}

/// Pure and deterministic: the same graph content and options always yield
/// the same positions.
pub fn layout(graph: &Graph, strategy: LayoutStrategy, options: &LayoutOptions) -> LayoutResult {
    let mut result = LayoutResult::empty(strategy, *options);
    if graph.is_empty() {
        return result;
    }
    if graph.node_count() == 1 {
        // Single node sits at the canvas center regardless of strategy.
        let id = graph.nodes()[0].id.clone();
        result.positions.insert(
            id,
            Position {
                x: options.canvas_width / 2.0,
                y: options.canvas_height / 2.0,
            },
        );
        return result;
    }

    result.positions = match strategy {
        LayoutStrategy::Layered => layered_positions(graph, options),
        LayoutStrategy::ForcePlacement => ring_positions(graph, options.force_radius, 0.0, options),
        LayoutStrategy::Grid => grid_positions(graph, options),
        LayoutStrategy::Circular => {
            let radius =
                options.canvas_width.min(options.canvas_height) / 2.0 * options.circle_scale;
            ring_positions(graph, radius, -std::f32::consts::FRAC_PI_2, options)
        }
    };

    debug!(
        strategy = ?strategy,
        nodes = result.len(),
        "layout recomputed"
    );
    result
}

/// Assigns a layer to every node: DFS from zero-in-degree roots in input
/// order, first-assigned layer wins. The visited guard makes back-edges
/// no-ops, so cyclic graphs terminate; anything unreachable from a root
/// (isolated or purely-cyclic components) lands on layer 0.
fn assign_layers(graph: &Graph) -> HashMap<NodeId, usize> {
    let mut layer: HashMap<NodeId, usize> = HashMap::new();
    let mut stack: Vec<(NodeId, usize)> = Vec::new();

    for node in graph.nodes().iter().rev() {
        if graph.incoming_edges(&node.id).is_empty() {
            stack.push((node.id.clone(), 0));
        }
    }

    while let Some((id, depth)) = stack.pop() {
        if layer.contains_key(&id) {
            continue;
        }
        layer.insert(id.clone(), depth);
        for eid in graph.outgoing_edges(&id).iter().rev() {
            if let Some(e) = graph.edge(eid) {
                if !layer.contains_key(&e.target) {
                    stack.push((e.target.clone(), depth + 1));
                }
            }
        }
    }

    for node in graph.nodes() {
        layer.entry(node.id.clone()).or_insert(0);
    }
    layer
}

fn layered_positions(graph: &Graph, opts: &LayoutOptions) -> HashMap<NodeId, Position> {
    let layer = assign_layers(graph);

    // Bucket by layer in input order. No crossing-minimization pass.
    let mut buckets: BTreeMap<usize, Vec<NodeId>> = BTreeMap::new();
    for node in graph.nodes() {
        let l = layer.get(&node.id).copied().unwrap_or(0);
        buckets.entry(l).or_default().push(node.id.clone());
    }

    let mut positions = HashMap::new();
    for (l, ids) in buckets {
        let rank = opts.margin + l as f32 * opts.rank_spacing;
        let span = (ids.len() - 1) as f32 * opts.node_spacing;
        for (i, id) in ids.into_iter().enumerate() {
            let along = i as f32 * opts.node_spacing;
            let pos = match opts.direction {
                Direction::TopBottom => Position {
                    x: (opts.canvas_width - span) / 2.0 + along,
                    y: rank,
                },
                Direction::BottomTop => Position {
                    x: (opts.canvas_width - span) / 2.0 + along,
                    y: opts.canvas_height - rank,
                },
                Direction::LeftRight => Position {
                    x: rank,
                    y: (opts.canvas_height - span) / 2.0 + along,
                },
                Direction::RightLeft => Position {
                    x: opts.canvas_width - rank,
                    y: (opts.canvas_height - span) / 2.0 + along,
                },
            };
            positions.insert(id, pos);
        }
    }
    positions
}

fn ring_positions(
    graph: &Graph,
    radius: f32,
    start_angle: f32,
    opts: &LayoutOptions,
) -> HashMap<NodeId, Position> {
    let cx = opts.canvas_width / 2.0;
    let cy = opts.canvas_height / 2.0;
    let n = graph.node_count() as f32;
    let mut positions = HashMap::new();
    for (i, node) in graph.nodes().iter().enumerate() {
        let t = start_angle + std::f32::consts::TAU * (i as f32) / n;
        positions.insert(
            node.id.clone(),
            Position {
                x: cx + radius * t.cos(),
                y: cy + radius * t.sin(),
            },
        );
    }
    positions
}

fn grid_positions(graph: &Graph, opts: &LayoutOptions) -> HashMap<NodeId, Position> {
    let n = graph.node_count();
    let cols = (n as f32).sqrt().ceil() as usize;

    // Cell size from the largest node plus spacing, so no two cells overlap.
    let mut cell_w = 0.0f32;
    let mut cell_h = 0.0f32;
    for node in graph.nodes() {
        let size = node.size();
        cell_w = cell_w.max(size.width);
        cell_h = cell_h.max(size.height);
    }
    cell_w += opts.node_spacing;
    cell_h += opts.node_spacing;

    let mut positions = HashMap::new();
    for (i, node) in graph.nodes().iter().enumerate() {
        let row = i / cols;
        let col = i % cols;
        positions.insert(
            node.id.clone(),
            Position {
                x: opts.margin + col as f32 * cell_w,
                y: opts.margin + row as f32 * cell_h,
            },
        );
    }
    positions
}
