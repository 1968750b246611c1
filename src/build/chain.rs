//! The chain-head state machine that routes each action into the graph.
//!
//! Four lane heads track the last node on each logical thread of execution
//! (main, parallel, true branch, false branch) so a later action can chain
//! onto whichever lane its mode designates without naming an explicit
//! predecessor. The state is a plain value owned by one builder instance,
//! created fresh per build and discarded afterwards.

use std::collections::BTreeMap;

use crate::{
    FlowforgeError, Result,
    model::{ConnectionTarget, ExecutionMode, NodeKind, NodeName, NodePorts, PORT_FALSE, PORT_TRUE, TRIGGER_NAME},
};

/// Lane heads plus the active conditional context.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainState {
    /// Last node on the main sequential lane.
    pub main_head: NodeName,
    /// Last node on the parallel lane, if any.
    pub parallel_head: Option<NodeName>,
    /// Last node on the true branch of the active conditional.
    pub true_branch_head: Option<NodeName>,
    /// Last node on the false branch of the active conditional.
    pub false_branch_head: Option<NodeName>,
    /// The conditional node branch modes currently attach to.
    pub active_conditional: Option<NodeName>,
}

impl Default for ChainState {
    fn default() -> Self {
        Self {
            main_head: TRIGGER_NAME.to_string(),
            parallel_head: None,
            true_branch_head: None,
            false_branch_head: None,
            active_conditional: None,
        }
    }
}

/// Consumes the ordered action list and produces the per-port edge lists.
#[derive(Debug, Default)]
pub struct FlowGraphBuilder {
    state: ChainState,
    connections: BTreeMap<NodeName, NodePorts>,
}

impl FlowGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lane heads, for inspection in tests and tracing.
    pub fn state(&self) -> &ChainState {
        &self.state
    }

    /// Routes one new node into the graph: computes the source node/port for
    /// its incoming edge from `(mode, state)`, emits the edge, and advances
    /// the lane heads.
    ///
    /// `index` is the action's position in the input list, used to report
    /// contract violations back to the caller.
    pub fn connect(
        &mut self,
        index: usize,
        mode: ExecutionMode,
        kind: NodeKind,
        name: &str,
    ) -> Result<()> {
        let (source, output_port) = self.source_for(index, mode)?;
        self.add_connection(&source, name, output_port);
        self.advance(mode, kind, name);
        Ok(())
    }

    /// Source node and output port for a new node's incoming edge, purely a
    /// function of mode and current state. Identical for conditional and
    /// leaf nodes.
    fn source_for(
        &self,
        index: usize,
        mode: ExecutionMode,
    ) -> Result<(NodeName, usize)> {
        match mode {
            ExecutionMode::Sequential => Ok((self.state.main_head.clone(), PORT_TRUE)),
            // First parallel action branches off the trigger; later ones
            // chain after the previous parallel action, preserving relative
            // order without serializing behind the main chain.
            ExecutionMode::Parallel => {
                let source = self.state.parallel_head.clone().unwrap_or_else(|| TRIGGER_NAME.to_string());
                Ok((source, PORT_TRUE))
            }
            ExecutionMode::BranchTrue => self.branch_source(index, mode, self.state.true_branch_head.as_ref(), PORT_TRUE),
            ExecutionMode::BranchFalse => self.branch_source(index, mode, self.state.false_branch_head.as_ref(), PORT_FALSE),
        }
    }

    /// Branch lanes chain onto their own head at port 0; the first node of a
    /// branch attaches to the active conditional at the branch's port. A
    /// branch mode with no conditional in scope is a contract violation.
    fn branch_source(
        &self,
        index: usize,
        mode: ExecutionMode,
        branch_head: Option<&NodeName>,
        branch_port: usize,
    ) -> Result<(NodeName, usize)> {
        if let Some(head) = branch_head {
            return Ok((head.clone(), PORT_TRUE));
        }
        match &self.state.active_conditional {
            Some(conditional) => Ok((conditional.clone(), branch_port)),
            None => Err(FlowforgeError::validation(index, format!("{} used with no active conditional", mode.as_ref()))),
        }
    }

    fn add_connection(
        &mut self,
        from: &str,
        to: &str,
        output_port: usize,
    ) {
        self.connections.entry(from.to_string()).or_default().add(output_port, ConnectionTarget::new(to, 0));
    }

    /// Post-edge state update. A conditional opens a fresh branch context
    /// regardless of how it was reached; leaf nodes advance the lane their
    /// mode designates.
    fn advance(
        &mut self,
        mode: ExecutionMode,
        kind: NodeKind,
        name: &str,
    ) {
        if kind == NodeKind::Conditional {
            self.state.active_conditional = Some(name.to_string());
            self.state.true_branch_head = None;
            self.state.false_branch_head = None;
            return;
        }

        match mode {
            ExecutionMode::Sequential => {
                self.state.main_head = name.to_string();
                // Returning to the main lane abandons in-flight side lanes
                self.state.parallel_head = None;
                self.state.true_branch_head = None;
                self.state.false_branch_head = None;
            }
            ExecutionMode::Parallel => {
                self.state.parallel_head = Some(name.to_string());
            }
            ExecutionMode::BranchTrue => {
                self.state.true_branch_head = Some(name.to_string());
                // A stale opposite head must not capture later same-branch actions
                self.state.false_branch_head = None;
            }
            ExecutionMode::BranchFalse => {
                self.state.false_branch_head = Some(name.to_string());
                self.state.true_branch_head = None;
            }
        }
    }

    /// Hands the accumulated per-port edge lists to the graph.
    pub fn into_connections(self) -> BTreeMap<NodeName, NodePorts> {
        self.connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets<'a>(
        builder: &'a FlowGraphBuilder,
        from: &str,
        port: usize,
    ) -> Vec<&'a str> {
        builder.connections.get(from).map(|p| p.port(port).iter().map(|t| t.node.as_str()).collect()).unwrap_or_default()
    }

    // ==================== sequential ====================

    #[test]
    fn test_sequential_chains_from_trigger() {
        let mut builder = FlowGraphBuilder::new();
        builder.connect(0, ExecutionMode::Sequential, NodeKind::Leaf, "a.x").unwrap();
        builder.connect(1, ExecutionMode::Sequential, NodeKind::Leaf, "b.y").unwrap();

        assert_eq!(targets(&builder, "Trigger", PORT_TRUE), vec!["a.x"]);
        assert_eq!(targets(&builder, "a.x", PORT_TRUE), vec!["b.y"]);
        assert_eq!(builder.state().main_head, "b.y");
    }

    #[test]
    fn test_sequential_clears_side_lanes() {
        let mut builder = FlowGraphBuilder::new();
        builder.connect(0, ExecutionMode::Parallel, NodeKind::Leaf, "p1").unwrap();
        builder.connect(1, ExecutionMode::Sequential, NodeKind::Conditional, "if.check").unwrap();
        builder.connect(2, ExecutionMode::BranchTrue, NodeKind::Leaf, "t1").unwrap();
        builder.connect(3, ExecutionMode::Sequential, NodeKind::Leaf, "s1").unwrap();

        let state = builder.state();
        assert_eq!(state.main_head, "s1");
        assert_eq!(state.parallel_head, None);
        assert_eq!(state.true_branch_head, None);
        assert_eq!(state.false_branch_head, None);
    }

    // ==================== parallel ====================

    #[test]
    fn test_parallel_actions_chain_in_input_order() {
        let mut builder = FlowGraphBuilder::new();
        builder.connect(0, ExecutionMode::Parallel, NodeKind::Leaf, "p1").unwrap();
        builder.connect(1, ExecutionMode::Parallel, NodeKind::Leaf, "p2").unwrap();

        // first parallel action branches off the trigger, the second chains
        // after the first rather than fanning out from the trigger again
        assert_eq!(targets(&builder, "Trigger", PORT_TRUE), vec!["p1"]);
        assert_eq!(targets(&builder, "p1", PORT_TRUE), vec!["p2"]);
    }

    #[test]
    fn test_parallel_does_not_advance_main_lane() {
        let mut builder = FlowGraphBuilder::new();
        builder.connect(0, ExecutionMode::Sequential, NodeKind::Leaf, "s1").unwrap();
        builder.connect(1, ExecutionMode::Parallel, NodeKind::Leaf, "p1").unwrap();
        builder.connect(2, ExecutionMode::Sequential, NodeKind::Leaf, "s2").unwrap();

        assert_eq!(targets(&builder, "s1", PORT_TRUE), vec!["s2"]);
    }

    // ==================== branching ====================

    #[test]
    fn test_branches_fan_out_from_conditional_ports() {
        let mut builder = FlowGraphBuilder::new();
        builder.connect(0, ExecutionMode::Sequential, NodeKind::Conditional, "if.check").unwrap();
        builder.connect(1, ExecutionMode::BranchTrue, NodeKind::Leaf, "t1").unwrap();
        builder.connect(2, ExecutionMode::BranchFalse, NodeKind::Leaf, "f1").unwrap();

        assert_eq!(targets(&builder, "if.check", PORT_TRUE), vec!["t1"]);
        assert_eq!(targets(&builder, "if.check", PORT_FALSE), vec!["f1"]);
    }

    #[test]
    fn test_same_branch_continues_on_lane() {
        let mut builder = FlowGraphBuilder::new();
        builder.connect(0, ExecutionMode::Sequential, NodeKind::Conditional, "if.check").unwrap();
        builder.connect(1, ExecutionMode::BranchTrue, NodeKind::Leaf, "t1").unwrap();
        builder.connect(2, ExecutionMode::BranchTrue, NodeKind::Leaf, "t2").unwrap();

        // continuation of the lane, not a second edge out of the conditional
        assert_eq!(targets(&builder, "if.check", PORT_TRUE), vec!["t1"]);
        assert_eq!(targets(&builder, "t1", PORT_TRUE), vec!["t2"]);
    }

    #[test]
    fn test_branch_after_opposite_branch_returns_to_conditional() {
        let mut builder = FlowGraphBuilder::new();
        builder.connect(0, ExecutionMode::Sequential, NodeKind::Conditional, "if.check").unwrap();
        builder.connect(1, ExecutionMode::BranchTrue, NodeKind::Leaf, "t1").unwrap();
        builder.connect(2, ExecutionMode::BranchFalse, NodeKind::Leaf, "f1").unwrap();
        builder.connect(3, ExecutionMode::BranchTrue, NodeKind::Leaf, "t2").unwrap();

        // entering branch_false cleared the true head, so t2 re-attaches to
        // the conditional's true port
        assert_eq!(targets(&builder, "if.check", PORT_TRUE), vec!["t1", "t2"]);
    }

    #[test]
    fn test_new_conditional_resets_branch_context() {
        let mut builder = FlowGraphBuilder::new();
        builder.connect(0, ExecutionMode::Sequential, NodeKind::Conditional, "if.a").unwrap();
        builder.connect(1, ExecutionMode::BranchTrue, NodeKind::Leaf, "t1").unwrap();
        builder.connect(2, ExecutionMode::BranchTrue, NodeKind::Conditional, "if.b").unwrap();
        builder.connect(3, ExecutionMode::BranchTrue, NodeKind::Leaf, "t2").unwrap();

        // the second conditional was reached via the true lane of the first
        assert_eq!(targets(&builder, "t1", PORT_TRUE), vec!["if.b"]);
        // and opens its own branch context: t2 hangs off if.b, not t1
        assert_eq!(targets(&builder, "if.b", PORT_TRUE), vec!["t2"]);
        assert_eq!(builder.state().active_conditional.as_deref(), Some("if.b"));
    }

    #[test]
    fn test_branch_without_conditional_fails_with_index() {
        let mut builder = FlowGraphBuilder::new();
        builder.connect(0, ExecutionMode::Sequential, NodeKind::Leaf, "a.x").unwrap();
        let err = builder.connect(1, ExecutionMode::BranchTrue, NodeKind::Leaf, "t1").unwrap_err();

        assert_eq!(
            err,
            FlowforgeError::Validation {
                index: 1,
                message: "branch_true used with no active conditional".to_string(),
            }
        );
    }

    #[test]
    fn test_branch_false_without_conditional_fails() {
        let mut builder = FlowGraphBuilder::new();
        let err = builder.connect(0, ExecutionMode::BranchFalse, NodeKind::Leaf, "f1").unwrap_err();
        assert!(matches!(err, FlowforgeError::Validation { index: 0, .. }));
    }
}
