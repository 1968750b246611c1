//! Reachability check over a produced graph.

use std::collections::{HashSet, VecDeque};

use tracing::warn;

use crate::{
    diagnostics::Diagnostic,
    model::{Graph, TRIGGER_NAME},
};

/// Reports nodes unreachable from the trigger.
///
/// Orphans never block graph production: an intentionally dead branch is
/// valid input, so the result is a diagnostics list, not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphValidator;

impl GraphValidator {
    pub fn new() -> Self {
        Self
    }

    /// Breadth-first traversal from the trigger across all output ports;
    /// every unvisited node becomes an `Orphan` diagnostic.
    pub fn validate(
        &self,
        graph: &Graph,
    ) -> Vec<Diagnostic> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        visited.insert(TRIGGER_NAME);
        queue.push_back(TRIGGER_NAME);

        while let Some(name) = queue.pop_front() {
            let Some(ports) = graph.connections.get(name) else {
                continue;
            };
            for targets in &ports.main {
                for target in targets {
                    if visited.insert(target.node.as_str()) {
                        queue.push_back(target.node.as_str());
                    }
                }
            }
        }

        graph
            .nodes
            .iter()
            .filter(|node| !visited.contains(node.name.as_str()))
            .map(|node| {
                warn!(node = %node.name, "node is unreachable from the trigger");
                Diagnostic::Orphan {
                    node: node.name.clone(),
                }
            })
            .collect()
    }
}
