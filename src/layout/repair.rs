//! Layout post-passes: grid fallback for unplaced nodes and minimum-distance
//! overlap repair.

use tracing::warn;

use crate::{
    config::LayoutConfig,
    diagnostics::Diagnostic,
    model::{Graph, TRIGGER_NAME},
};

/// Extra distance beyond the minimum when separating a pair, so float error
/// cannot leave the pair marginally in violation again.
const REPAIR_SLACK: f64 = 1.0;

/// Gives every non-trigger node still at the origin a deterministic
/// row/column grid position. A node ends up here only when the layered pass
/// never reached it; the build must not silently lose a node's position.
pub(crate) fn reposition_unplaced(
    graph: &mut Graph,
    config: &LayoutConfig,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut cell = 0usize;

    for node in graph.nodes.iter_mut() {
        if node.name == TRIGGER_NAME || node.position != [0.0, 0.0] {
            continue;
        }
        let row = cell / config.fallback_columns;
        let col = cell % config.fallback_columns;
        node.position = [config.grid_x + col as f64 * config.grid_x, row as f64 * config.grid_y];
        cell += 1;

        warn!(node = %node.name, "node missed by layout, placed on fallback grid");
        diagnostics.push(Diagnostic::LayoutFallback {
            node: node.name.clone(),
        });
    }

    diagnostics
}

/// Pushes apart every pair of nodes closer than the configured minimum,
/// moving the second node of the pair directly away from the first along
/// the line connecting their centers. Coincident nodes separate along x.
/// Repeats until no pair violates the threshold, bounded by the node count.
pub(crate) fn enforce_min_distance(
    graph: &mut Graph,
    config: &LayoutConfig,
) {
    let min = config.min_distance;
    let n = graph.nodes.len();

    for _ in 0..n {
        let mut moved = false;

        for i in 0..n {
            for j in (i + 1)..n {
                let [x1, y1] = graph.nodes[i].position;
                let [x2, y2] = graph.nodes[j].position;
                let dx = x1 - x2;
                let dy = y1 - y2;
                let distance = (dx * dx + dy * dy).sqrt();

                if distance >= min {
                    continue;
                }

                graph.nodes[j].position = if distance > 0.0 {
                    [x1 - dx / distance * (min + REPAIR_SLACK), y1 - dy / distance * (min + REPAIR_SLACK)]
                } else {
                    [x1 + min + REPAIR_SLACK, y1]
                };
                moved = true;
            }
        }

        if !moved {
            break;
        }
    }
}
