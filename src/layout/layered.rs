//! Layered (Sugiyama-style) drawing pass.
//!
//! Ranks come from the longest path from the sources; ranks map to x
//! positions, and in-rank order comes from weighted barycenter sweeps.
//! True-branch edges carry more weight than false-branch edges so the true
//! path stays straighter.

use std::{cmp::Ordering, collections::HashMap};

use petgraph::{
    Direction,
    algo::toposort,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use tracing::warn;

use crate::{
    config::LayoutConfig,
    layout::footprint,
    model::{Graph, NodeKind, NodeName, PORT_TRUE},
};

const TRUE_EDGE_WEIGHT: f64 = 2.0;
const FALSE_EDGE_WEIGHT: f64 = 1.0;
/// Alternating down/up orderings. Small graphs settle within a few sweeps.
const ORDERING_SWEEPS: usize = 4;

/// Assigns coordinates to every node the pass can reach. On a cyclic input
/// the pass is abandoned and all nodes keep their prior positions for the
/// fallback grid to fix up.
pub(crate) fn apply(
    graph: &mut Graph,
    config: &LayoutConfig,
) {
    if graph.nodes.is_empty() {
        return;
    }

    let mut dg: DiGraph<NodeName, f64> = DiGraph::new();
    let mut indices: HashMap<NodeName, NodeIndex> = HashMap::new();
    for node in &graph.nodes {
        indices.insert(node.name.clone(), dg.add_node(node.name.clone()));
    }
    for edge in graph.edges() {
        let (Some(&from), Some(&to)) = (indices.get(&edge.from), indices.get(&edge.to)) else {
            continue;
        };
        let weight = if edge.output_port == PORT_TRUE {
            TRUE_EDGE_WEIGHT
        } else {
            FALSE_EDGE_WEIGHT
        };
        dg.add_edge(from, to, weight);
    }

    let order = match toposort(&dg, None) {
        Ok(order) => order,
        Err(_) => {
            warn!("input graph is cyclic, abandoning layered pass");
            return;
        }
    };

    let mut ranks = assign_ranks(&dg, &order);
    for sweep in 0..ORDERING_SWEEPS {
        reorder_ranks(&dg, &mut ranks, sweep % 2 == 0);
    }
    place(graph, &dg, &ranks, config);
}

/// Longest path from the sources, grouped into per-rank node lists in
/// topological order.
fn assign_ranks(
    dg: &DiGraph<NodeName, f64>,
    order: &[NodeIndex],
) -> Vec<Vec<NodeIndex>> {
    let mut rank_of: HashMap<NodeIndex, usize> = HashMap::new();
    for &idx in order {
        let rank = dg.edges_directed(idx, Direction::Incoming).map(|e| rank_of[&e.source()] + 1).max().unwrap_or(0);
        rank_of.insert(idx, rank);
    }

    let depth = rank_of.values().max().copied().unwrap_or(0);
    let mut ranks = vec![Vec::new(); depth + 1];
    for &idx in order {
        ranks[rank_of[&idx]].push(idx);
    }
    ranks
}

/// One barycenter sweep. Downward sweeps order each rank by its incoming
/// neighbors, upward sweeps by its outgoing neighbors. Barycenter ties are
/// broken by the heaviest adjacent edge, so a conditional's true branch
/// sits above its false branch; remaining ties keep the current order.
fn reorder_ranks(
    dg: &DiGraph<NodeName, f64>,
    ranks: &mut [Vec<NodeIndex>],
    down: bool,
) {
    let mut ordinal: HashMap<NodeIndex, f64> = HashMap::new();
    for rank in ranks.iter() {
        for (i, &idx) in rank.iter().enumerate() {
            ordinal.insert(idx, i as f64);
        }
    }

    let indices: Vec<usize> = if down {
        (1..ranks.len()).collect()
    } else {
        (0..ranks.len().saturating_sub(1)).rev().collect()
    };

    for r in indices {
        let direction = if down { Direction::Incoming } else { Direction::Outgoing };

        let mut keyed: Vec<(f64, f64, usize, NodeIndex)> = ranks[r]
            .iter()
            .enumerate()
            .map(|(i, &idx)| {
                let mut total = 0.0;
                let mut weighted = 0.0;
                let mut heaviest = 0.0f64;
                for edge in dg.edges_directed(idx, direction) {
                    let neighbor = if down { edge.source() } else { edge.target() };
                    weighted += edge.weight() * ordinal[&neighbor];
                    total += edge.weight();
                    heaviest = heaviest.max(*edge.weight());
                }
                let barycenter = if total > 0.0 { weighted / total } else { i as f64 };
                (barycenter, -heaviest, i, idx)
            })
            .collect();

        keyed.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
                .then(a.2.cmp(&b.2))
        });
        ranks[r] = keyed.into_iter().map(|(_, _, _, idx)| idx).collect();
        for (i, &idx) in ranks[r].iter().enumerate() {
            ordinal.insert(idx, i as f64);
        }
    }
}

/// Converts ranks and in-rank order into rounded top-left coordinates.
/// Ranks advance along x by the widest node in the previous rank plus the
/// configured separation; nodes stack along y by their own heights.
fn place(
    graph: &mut Graph,
    dg: &DiGraph<NodeName, f64>,
    ranks: &[Vec<NodeIndex>],
    config: &LayoutConfig,
) {
    let kinds: HashMap<String, NodeKind> = graph.nodes.iter().map(|n| (n.name.clone(), n.kind)).collect();

    let mut x_cursor = config.margin_x;
    for rank in ranks {
        let max_width = rank.iter().map(|&idx| footprint(kinds[&dg[idx]]).0).fold(0.0, f64::max);
        let x_center = x_cursor + max_width / 2.0;

        let mut y_cursor = config.margin_y;
        for &idx in rank {
            let name = &dg[idx];
            let (width, height) = footprint(kinds[name]);
            let y_center = y_cursor + height / 2.0;
            if let Some(node) = graph.node_mut(name) {
                node.position = [(x_center - width / 2.0).round(), (y_center - height / 2.0).round()];
            }
            y_cursor += height + config.node_sep;
        }

        x_cursor += max_width + config.rank_sep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::Vars,
        model::{Node, PORT_FALSE},
    };

    fn node(
        id: u32,
        name: &str,
        kind: NodeKind,
    ) -> Node {
        Node {
            id: id.to_string(),
            name: name.to_string(),
            type_key: "n8n-nodes-base.function".to_string(),
            type_version: 1.0,
            position: [0.0, 0.0],
            parameters: Vars::new(),
            kind,
        }
    }

    #[test]
    fn test_rank_is_longest_path() {
        // Trigger -> a -> b -> d and Trigger -> d: d ranks after b, not
        // directly after the trigger
        let mut graph = Graph::new("test");
        graph.add_node(node(1, "Trigger", NodeKind::Trigger));
        graph.add_node(node(2, "a", NodeKind::Leaf));
        graph.add_node(node(3, "b", NodeKind::Leaf));
        graph.add_node(node(4, "d", NodeKind::Leaf));
        graph.add_connection("Trigger", "a", PORT_TRUE, 0);
        graph.add_connection("a", "b", PORT_TRUE, 0);
        graph.add_connection("b", "d", PORT_TRUE, 0);
        graph.add_connection("Trigger", "d", PORT_TRUE, 0);

        apply(&mut graph, &LayoutConfig::default());

        let b_x = graph.node("b").unwrap().position[0];
        let d_x = graph.node("d").unwrap().position[0];
        assert!(d_x > b_x, "d at {} should rank past b at {}", d_x, b_x);
    }

    #[test]
    fn test_true_branch_ordered_above_false_branch() {
        let mut graph = Graph::new("test");
        graph.add_node(node(1, "Trigger", NodeKind::Trigger));
        graph.add_node(node(2, "if.check", NodeKind::Conditional));
        // insertion order deliberately false-first; edge weighting must not
        // let it leapfrog the heavier true edge into a crossing
        graph.add_node(node(3, "f1", NodeKind::Leaf));
        graph.add_node(node(4, "t1", NodeKind::Leaf));
        graph.add_connection("Trigger", "if.check", PORT_TRUE, 0);
        graph.add_connection("if.check", "f1", PORT_FALSE, 0);
        graph.add_connection("if.check", "t1", PORT_TRUE, 0);

        apply(&mut graph, &LayoutConfig::default());

        let t1 = graph.node("t1").unwrap().position;
        let f1 = graph.node("f1").unwrap().position;
        assert_eq!(t1[0], f1[0]);
        assert!(t1[1] < f1[1], "true branch at y {} should sit above false branch at y {}", t1[1], f1[1]);
    }

    #[test]
    fn test_disconnected_node_still_placed() {
        let mut graph = Graph::new("test");
        graph.add_node(node(1, "Trigger", NodeKind::Trigger));
        graph.add_node(node(2, "lonely", NodeKind::Leaf));

        apply(&mut graph, &LayoutConfig::default());

        assert_ne!(graph.node("lonely").unwrap().position, [0.0, 0.0]);
    }
}
