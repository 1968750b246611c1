//! 2-D graph layout.
//!
//! The engine runs a layered, left-to-right drawing pass so the graph reads
//! in execution order with branches fanning out vertically, then repairs
//! whatever the pass left behind: unplaced nodes get deterministic grid
//! positions, and any two nodes closer than the configured minimum distance
//! are pushed apart.

mod layered;
mod repair;

use crate::{
    config::LayoutConfig,
    diagnostics::Diagnostic,
    model::{Graph, NodeKind},
};

/// Bounding box by node kind. Triggers and conditionals render smaller than
/// leaf action nodes on the target engine's canvas, which affects spacing
/// but not rank assignment.
pub(crate) fn footprint(kind: NodeKind) -> (f64, f64) {
    match kind {
        NodeKind::Trigger => (160.0, 60.0),
        NodeKind::Conditional => (200.0, 100.0),
        NodeKind::Leaf => (240.0, 80.0),
    }
}

/// Assigns final coordinates to every node of a graph.
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
        }
    }

    /// Runs the layered pass and both post-passes. Never fails; nodes the
    /// pass could not place are reported as diagnostics after receiving
    /// fallback positions.
    pub fn layout(
        &self,
        graph: &mut Graph,
    ) -> Vec<Diagnostic> {
        layered::apply(graph, &self.config);
        let diagnostics = repair::reposition_unplaced(graph, &self.config);
        repair::enforce_min_distance(graph, &self.config);
        diagnostics
    }
}
