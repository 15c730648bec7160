//! Topology graph layout & interaction engine.
//!
//! The pure data-and-algorithm layer behind an interactive dependency
//! topology view: layout strategies over arbitrary directed graphs,
//! filter-derived working subgraphs, selection highlighting, and a
//! frame-driven animation scheduler. Rendering, hit-testing, and data
//! fetching live outside this crate; it never touches pixels.

pub mod graph;
pub mod state;
pub mod util;

pub use graph::animate::{AnimationScheduler, CancelToken, FrameParams};
pub use graph::filter::{apply_filter, FilterPredicate};
pub use graph::highlight::{HighlightState, Selection};
pub use graph::layout::{
    layout, BoundingBox, Direction, LayoutOptions, LayoutResult, LayoutStrategy, Position,
};
pub use graph::model::{Graph, Neighborhood};
pub use state::TopologyEngine;
pub use util::config::EngineConfig;
